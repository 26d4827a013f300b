//! PostgreSQL repository implementations.
//!
//! One pooled repository backs both the account and session traits. The
//! accounts table carries the role discriminator plus nullable columns for
//! whichever profile variant the row holds.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::{
    Account, AdminProfile, CustomerProfile, DEFAULT_ADMIN_PERMISSIONS, RoleProfile,
};
use crate::domain::entity::session::Session;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{
    AccountId, AccountRole, Email, FullName, PasswordHash, PhoneNumber,
};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL-backed account and session repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired_sessions(&self) -> AccountResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

fn map_insert_error(err: sqlx::Error) -> AccountError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AccountError::EmailTaken;
        }
    }
    AccountError::Database(err)
}

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    username,
    email,
    password_hash,
    role,
    full_name,
    phone_number,
    shipping_address,
    billing_address,
    marketing_opt_in,
    permissions,
    enabled,
    created_at,
    updated_at
"#;

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let row = AccountRow::from_account(account);

        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                username,
                email,
                password_hash,
                role,
                full_name,
                phone_number,
                shipping_address,
                billing_address,
                marketing_opt_in,
                permissions,
                enabled,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(row.account_id)
        .bind(&row.username)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.role)
        .bind(&row.full_name)
        .bind(&row.phone_number)
        .bind(&row.shipping_address)
        .bind(&row.billing_address)
        .bind(row.marketing_opt_in)
        .bind(&row.permissions)
        .bind(row.enabled)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn update(&self, account: &Account) -> AccountResult<()> {
        let row = AccountRow::from_account(account);

        sqlx::query(
            r#"
            UPDATE accounts SET
                username = $2,
                email = $3,
                password_hash = $4,
                role = $5,
                full_name = $6,
                phone_number = $7,
                shipping_address = $8,
                billing_address = $9,
                marketing_opt_in = $10,
                permissions = $11,
                enabled = $12,
                updated_at = $13
            WHERE account_id = $1
            "#,
        )
        .bind(row.account_id)
        .bind(&row.username)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.role)
        .bind(&row.full_name)
        .bind(&row.phone_number)
        .bind(&row.shipping_address)
        .bind(&row.billing_address)
        .bind(row.marketing_opt_in)
        .bind(&row.permissions)
        .bind(row.enabled)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE lower(email) = lower($1)"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE lower(username) = lower($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_all(&self) -> AccountResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_account()).collect()
    }

    async fn delete_by_id(&self, account_id: &AccountId) -> AccountResult<()> {
        sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAccountRepository {
    async fn create(&self, session: &Session) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                account_id,
                role,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id)
        .bind(session.account_id.as_uuid())
        .bind(session.role.code())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AccountResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                account_id,
                role,
                created_at,
                expires_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn delete(&self, session_id: Uuid) -> AccountResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AccountResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        self.cleanup_expired_sessions().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    full_name: Option<String>,
    phone_number: Option<String>,
    shipping_address: Option<String>,
    billing_address: Option<String>,
    marketing_opt_in: bool,
    permissions: Option<String>,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn from_account(account: &Account) -> Self {
        let (full_name, phone_number, shipping_address, billing_address, marketing_opt_in) =
            match &account.profile {
                RoleProfile::Customer(p) => (
                    Some(p.full_name.as_str().to_string()),
                    Some(p.phone_number.as_str().to_string()),
                    p.shipping_address.clone(),
                    p.billing_address.clone(),
                    p.marketing_opt_in,
                ),
                RoleProfile::Admin(_) => (None, None, None, None, false),
            };

        let permissions = match &account.profile {
            RoleProfile::Admin(p) => Some(p.permissions.clone()),
            RoleProfile::Customer(_) => None,
        };

        Self {
            account_id: *account.account_id.as_uuid(),
            username: account.username.clone(),
            email: account.email.as_str().to_string(),
            password_hash: account.password_hash.as_phc_string().to_string(),
            role: account.role().code().to_string(),
            full_name,
            phone_number,
            shipping_address,
            billing_address,
            marketing_opt_in,
            permissions,
            enabled: account.enabled,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }

    fn into_account(self) -> AccountResult<Account> {
        let role = AccountRole::from_code(&self.role)
            .ok_or_else(|| AccountError::Internal(format!("Invalid role code: {}", self.role)))?;

        let profile = match role {
            AccountRole::Customer => RoleProfile::Customer(CustomerProfile {
                full_name: FullName::from_db(self.full_name.unwrap_or_default()),
                phone_number: PhoneNumber::from_db(self.phone_number.unwrap_or_default()),
                shipping_address: self.shipping_address,
                billing_address: self.billing_address,
                marketing_opt_in: self.marketing_opt_in,
            }),
            AccountRole::Admin => RoleProfile::Admin(AdminProfile {
                permissions: self
                    .permissions
                    .unwrap_or_else(|| DEFAULT_ADMIN_PERMISSIONS.to_string()),
            }),
        };

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            username: self.username,
            email: Email::from_db(self.email),
            password_hash: PasswordHash::from_phc_string(self.password_hash)?,
            profile,
            enabled: self.enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    account_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AccountResult<Session> {
        let role = AccountRole::from_code(&self.role)
            .ok_or_else(|| AccountError::Internal(format!("Invalid role code: {}", self.role)))?;

        Ok(Session {
            session_id: self.session_id,
            account_id: AccountId::from_uuid(self.account_id),
            role,
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}
