use crate::auth::{create_token, hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::user::user_models::User;
use crate::user::user_repository::UserRepository;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expiration_hours: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(User, String)> {
        let email = email.trim().to_lowercase();

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(password)?;

        let user = self
            .user_repo
            .create(name.trim(), &email, &password_hash)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("User already exists".into()),
                other => other,
            })?;

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = email.trim().to_lowercase();

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication("Invalid credentials".into()));
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        create_token(user.id, &user.email, &self.jwt_secret, self.jwt_expiration_hours)
    }
}
