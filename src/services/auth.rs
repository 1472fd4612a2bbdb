// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::OnceCell;

use crate::{
    common::error::AppError,
    db::DynStore,
    models::auth::{Claims, Session, User, UserChanges},
};

/// Gera o hash bcrypt fora do runtime async (é CPU pesado).
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();

    // Executa a verificação em um thread separado
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    store: DynStore,
    session_secret: String,
    session_ttl: Duration,
    bcrypt_cost: u32,
    // Hash de referência para username inexistente, no mesmo custo dos reais
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(store: DynStore, session_secret: String, session_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            store,
            session_secret,
            session_ttl: Duration::hours(session_ttl_hours),
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        hash_password(password, self.bcrypt_cost).await
    }

    /// Valida usuário e senha e devolve o token de sessão.
    /// Qualquer falha vira o mesmo InvalidCredentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User), AppError> {
        let Some(mut user) = self.store.find_user_by_username(username.trim()).await? else {
            // Mesmo custo de bcrypt de um usuário real: o tempo não denuncia o username
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| hash_password("sweetbite-dummy-password", self.bcrypt_cost))
                .await?;
            verify_password(password, dummy).await?;
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active() {
            tracing::warn!(user_id = %user.id, "Login recusado: usuário inativo");
            return Err(AppError::InvalidCredentials);
        }

        self.store.touch_last_login(user.id).await?;
        user.last_login = Some(Utc::now());

        let token = self.create_token(&user)?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Login efetuado");
        Ok((token, user))
    }

    /// Resolve o token na sessão atual. O usuário precisa existir,
    /// estar ativo e ainda ter o papel gravado no token.
    pub async fn authenticate(&self, token: &str) -> Result<Session, AppError> {
        let claims = self.decode_token(token)?;

        let user = self
            .store
            .find_user(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active() || user.role != claims.role {
            return Err(AppError::Unauthorized);
        }

        Ok(Session {
            role: claims.role,
            is_admin: claims.is_admin && user.is_admin,
            user,
        })
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(current_password, &user.password_hash).await? {
            return Err(AppError::BadRequest("Current password is incorrect.".to_string()));
        }

        let changes = UserChanges {
            password_hash: Some(self.hash_password(new_password).await?),
            ..UserChanges::default()
        };
        self.store
            .update_user(user.id, &changes)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        tracing::info!(user_id = %user.id, "Senha alterada");
        Ok(())
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        let claims = Claims {
            sub: user.id,
            role: user.role,
            is_admin: user.is_admin,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.session_secret.as_ref()),
        )?)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.session_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::{MemoryStore, UserRepository},
        models::auth::{NewUser, Role, UserStatus},
    };

    async fn service_with_user(role: Role) -> (AuthService, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(&NewUser {
                username: "maria".to_string(),
                email: "maria@sweetbite.com".to_string(),
                password_hash: hash_password("correct-horse", 4).await.unwrap(),
                full_name: None,
                role,
                status: UserStatus::Active,
                is_admin: false,
                is_super_admin: false,
            })
            .await
            .unwrap();
        let service = AuthService::new(store, "test-secret".to_string(), 1, 4);
        (service, user)
    }

    #[tokio::test]
    async fn login_issues_a_token_that_authenticates() {
        let (service, user) = service_with_user(Role::Staff).await;

        let (token, logged) = service.login("maria", "correct-horse").await.unwrap();
        assert_eq!(logged.id, user.id);
        assert!(logged.last_login.is_some());

        let session = service.authenticate(&token).await.unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(session.role, Role::Staff);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (service, _) = service_with_user(Role::Staff).await;

        let wrong = service.login("maria", "nope").await.unwrap_err();
        let unknown = service.login("joana", "correct-horse").await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_username_still_pays_for_a_bcrypt_check() {
        let (service, _) = service_with_user(Role::Staff).await;
        assert!(service.dummy_hash.get().is_none());

        let err = service.login("joana", "correct-horse").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let dummy = service.dummy_hash.get().unwrap();
        assert!(dummy.starts_with("$2b$04$"));
        assert!(!verify_password("correct-horse", dummy).await.unwrap());
    }

    #[tokio::test]
    async fn session_is_rejected_after_role_change_or_deactivation() {
        let (service, user) = service_with_user(Role::Manager).await;
        let (token, _) = service.login("maria", "correct-horse").await.unwrap();

        service
            .store
            .update_user(
                user.id,
                &UserChanges {
                    role: Some(Role::Staff),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            service.authenticate(&token).await,
            Err(AppError::Unauthorized)
        ));

        assert!(matches!(
            service.authenticate("not-a-token").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let (service, user) = service_with_user(Role::Admin).await;

        let err = service
            .change_password(&user, "wrong", "new-password-123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        service
            .change_password(&user, "correct-horse", "new-password-123")
            .await
            .unwrap();
        assert!(service.login("maria", "new-password-123").await.is_ok());
        assert!(service.login("maria", "correct-horse").await.is_err());
    }
}
