// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DynStore,
    models::auth::{
        CreateUserPayload, NewUser, Role, User, UserChanges, UserStatus, UpdateUserPayload,
    },
    services::auth::AuthService,
};

/// Regras de proteção do super admin: não pode ser desativado nem rebaixado.
pub fn check_super_admin_changes(target: &User, changes: &UserChanges) -> Result<(), AppError> {
    if !target.is_super_admin {
        return Ok(());
    }
    if changes.status == Some(UserStatus::Inactive) {
        return Err(AppError::ActionDenied(
            "The super admin cannot be deactivated.".to_string(),
        ));
    }
    if changes.role.is_some_and(|role| role != Role::Admin) || changes.is_admin == Some(false) {
        return Err(AppError::ActionDenied(
            "The super admin cannot be demoted.".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    store: DynStore,
    auth_service: AuthService,
}

impl UserService {
    pub fn new(store: DynStore, auth_service: AuthService) -> Self {
        Self { store, auth_service }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.store.list_users().await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.store.find_user(id).await?.ok_or(AppError::NotFound("User"))
    }

    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let password_hash = self.auth_service.hash_password(&payload.password).await?;

        let user = self
            .store
            .create_user(&NewUser {
                username: payload.username.trim().to_string(),
                email: payload.email.trim().to_lowercase(),
                password_hash,
                full_name: payload.full_name,
                role: payload.role,
                status: UserStatus::Active,
                is_admin: payload.is_admin.unwrap_or(payload.role == Role::Admin),
                is_super_admin: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Usuário criado");
        Ok(user)
    }

    pub async fn update_user(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User, AppError> {
        let target = self.get_user(id).await?;

        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(self.auth_service.hash_password(password).await?),
            None => None,
        };
        let changes = UserChanges {
            email: payload.email.map(|e| e.trim().to_lowercase()),
            full_name: payload.full_name,
            role: payload.role,
            status: payload.status,
            is_admin: payload.is_admin,
            password_hash,
        };
        check_super_admin_changes(&target, &changes)?;

        self.store
            .update_user(id, &changes)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn delete_user(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        if actor.id == id {
            return Err(AppError::ActionDenied(
                "You cannot delete your own account.".to_string(),
            ));
        }

        let target = self.get_user(id).await?;
        if target.is_super_admin {
            return Err(AppError::ActionDenied(
                "The super admin cannot be deleted.".to_string(),
            ));
        }

        self.store.delete_user(id).await?;
        tracing::info!(user_id = %id, deleted_by = %actor.id, "Usuário removido");
        Ok(())
    }
}
