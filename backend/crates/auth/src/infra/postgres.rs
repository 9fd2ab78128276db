//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::AuthResult;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                wallet_address,
                nonce,
                last_sign_in,
                is_admin,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (wallet_address) DO NOTHING
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.wallet_address.as_str())
        .bind(user.nonce.as_str())
        .bind(user.last_sign_in)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                wallet_address,
                nonce,
                last_sign_in,
                is_admin,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_wallet_address(&self, address: &WalletAddress) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                wallet_address,
                nonce,
                last_sign_in,
                is_admin,
                created_at,
                updated_at
            FROM users
            WHERE wallet_address = $1
            "#,
        )
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                nonce = $2,
                last_sign_in = $3,
                is_admin = $4,
                updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.nonce.as_str())
        .bind(user.last_sign_in)
        .bind(user.is_admin)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    wallet_address: String,
    nonce: String,
    last_sign_in: Option<DateTime<Utc>>,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            wallet_address: WalletAddress::from_db(self.wallet_address),
            nonce: Nonce::from_db(self.nonce),
            last_sign_in: self.last_sign_in,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
