// src/db/user_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PgStore, UserRepository},
    models::auth::{NewUser, Role, User, UserChanges, UserStatus},
};

// Converte violação de chave única no erro certo, pelo nome da constraint
fn map_user_conflict(e: sqlx::Error, username: Option<&str>, email: Option<&str>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => AppError::Conflict(format!(
                    "Username '{}' is already taken.",
                    username.unwrap_or_default()
                )),
                Some("users_email_key") => AppError::Conflict(format!(
                    "Email '{}' is already in use.",
                    email.unwrap_or_default()
                )),
                _ => AppError::Conflict("User already exists.".to_string()),
            };
        }
    }
    e.into()
}

#[async_trait]
impl UserRepository for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, full_name,
                role, status, is_admin, is_super_admin
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.status)
        .bind(user.is_admin)
        .bind(user.is_super_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_user_conflict(e, Some(&user.username), Some(&user.email)))
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError> {
        // COALESCE: campo ausente (NULL) mantém o valor atual
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email         = COALESCE($2, email),
                full_name     = COALESCE($3, full_name),
                role          = COALESCE($4, role),
                status        = COALESCE($5, status),
                is_admin      = COALESCE($6, is_admin),
                password_hash = COALESCE($7, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.full_name)
        .bind(changes.role as Option<Role>)
        .bind(changes.status as Option<UserStatus>)
        .bind(changes.is_admin)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_user_conflict(e, None, changes.email.as_deref()))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
