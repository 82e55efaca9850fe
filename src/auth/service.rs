// src/auth/service.rs

use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use super::jwt::create_token;
use super::password::{hash_password, verify_password};
use super::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserWithPassword};

pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let user = self.get_user_by_email(&req.email).await?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(anyhow!("Invalid credentials"));
        }

        let token = create_token(user.id, &user.email)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        if req.name.trim().is_empty() {
            return Err(anyhow!("Name must not be empty"));
        }
        if !req.email.contains('@') {
            return Err(anyhow!("Invalid email address"));
        }
        if self.email_exists(&req.email).await? {
            return Err(anyhow!("Email already registered"));
        }

        let password_hash = hash_password(&req.password)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.email)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        let user = self.get_user_by_id(result.last_insert_rowid()).await?;
        let token = create_token(user.id, &user.email)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Confirm that the user behind a verified token still exists.
    pub async fn verify_user_id(&self, user_id: i64) -> Result<User> {
        let user = self.get_user_by_id(user_id).await?;
        Ok(user.into())
    }

    pub async fn update_profile(&self, user_id: i64, req: UpdateProfileRequest) -> Result<User> {
        let now = Utc::now();

        if let Some(ref name) = req.name {
            sqlx::query("UPDATE users SET name = ?, updated_at = ? WHERE id = ?")
                .bind(name.trim())
                .bind(now)
                .bind(user_id)
                .execute(&self.db)
                .await?;
        }

        if let Some(ref email) = req.email {
            if !email.contains('@') {
                return Err(anyhow!("Invalid email address"));
            }
            sqlx::query("UPDATE users SET email = ?, updated_at = ? WHERE id = ?")
                .bind(email)
                .bind(now)
                .bind(user_id)
                .execute(&self.db)
                .await?;
        }

        if let Some(ref password) = req.password {
            let new_hash = hash_password(password)?;
            sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(&new_hash)
                .bind(now)
                .bind(user_id)
                .execute(&self.db)
                .await?;
        }

        let user = self.get_user_by_id(user_id).await?;
        Ok(user.into())
    }

    /// Delete the account; sleep data is removed by foreign-key cascade.
    pub async fn delete_account(&self, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<UserWithPassword> {
        sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.db)
            .await
            .map_err(|_| anyhow!("Invalid credentials"))
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<UserWithPassword> {
        sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .map_err(|_| anyhow!("User not found"))
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.db)
            .await?;

        Ok(count.0 > 0)
    }
}
