use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub auth_subject: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub picture: Option<String>,
    pub additional_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub auth_subject: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub picture: Option<String>,
    pub additional_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfilePatch {
    pub name: Option<String>,
    pub additional_data: Option<String>,
}
