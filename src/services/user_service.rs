use std::sync::Arc;

use crate::database::repository::Repository;
use crate::dto::user_dto::{RegisterUserRequest, RegisterUserResponse, UpdateUserRequest};
use crate::error::{ClockError, Error, Result};
use crate::middleware::auth::Identity;
use crate::models::user::{NewUser, User};

/// Loads the caller's user row, failing with `NotRegistered` when the
/// identity has not completed registration yet.
pub(crate) async fn registered_user(repo: &dyn Repository, identity: &Identity) -> Result<User> {
    repo.find_user_by_subject(&identity.subject)
        .await?
        .ok_or(Error::Clock(ClockError::NotRegistered))
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn Repository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn current_user(&self, identity: &Identity) -> Result<Option<User>> {
        self.repo.find_user_by_subject(&identity.subject).await
    }

    pub async fn require_manager(&self, identity: &Identity) -> Result<User> {
        let user = registered_user(self.repo.as_ref(), identity).await?;
        if !user.role.is_manager() {
            tracing::warn!(user_id = %user.id, role = %user.role, "manager route refused");
            return Err(Error::Forbidden("Manager access required".into()));
        }
        Ok(user)
    }

    pub async fn register(
        &self,
        identity: &Identity,
        req: RegisterUserRequest,
    ) -> Result<RegisterUserResponse> {
        if let Some(existing) = self.repo.find_user_by_subject(&identity.subject).await? {
            return Ok(already_registered(existing));
        }

        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or(identity.name.as_deref())
            .map(str::to_string)
            .ok_or_else(|| Error::BadRequest("A display name is required".into()))?;
        let email = identity
            .email
            .clone()
            .ok_or_else(|| Error::BadRequest("Identity provider did not supply an email".into()))?;

        let new_user = NewUser {
            auth_subject: identity.subject.clone(),
            name,
            email,
            role: req.role,
            picture: identity.picture.clone(),
            additional_data: req.additional_data,
        };

        match self.repo.insert_user(new_user).await? {
            Some(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "user registered");
                Ok(RegisterUserResponse {
                    user,
                    is_new_user: true,
                    message: "User registered successfully".into(),
                })
            }
            // Lost a registration race against the same subject.
            None => {
                let user = registered_user(self.repo.as_ref(), identity).await?;
                Ok(already_registered(user))
            }
        }
    }

    pub async fn update_profile(&self, identity: &Identity, req: UpdateUserRequest) -> Result<User> {
        self.repo
            .update_user_profile(&identity.subject, req.into())
            .await?
            .ok_or(Error::Clock(ClockError::NotRegistered))
    }
}

fn already_registered(user: User) -> RegisterUserResponse {
    RegisterUserResponse {
        user,
        is_new_user: false,
        message: "User already registered".into(),
    }
}
