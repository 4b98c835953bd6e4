use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "worker_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Doctor,
    Nurse,
    Paramedic,
    Technician,
    SupportStaff,
    Pharmacist,
    Therapist,
    Administrative,
    Hca,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Doctor,
        Role::Nurse,
        Role::Paramedic,
        Role::Technician,
        Role::SupportStaff,
        Role::Pharmacist,
        Role::Therapist,
        Role::Administrative,
        Role::Hca,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
            Role::Paramedic => "PARAMEDIC",
            Role::Technician => "TECHNICIAN",
            Role::SupportStaff => "SUPPORT_STAFF",
            Role::Pharmacist => "PHARMACIST",
            Role::Therapist => "THERAPIST",
            Role::Administrative => "ADMINISTRATIVE",
            Role::Hca => "HCA",
        }
    }

    /// Administrative staff run the manager dashboard.
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Administrative)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}
