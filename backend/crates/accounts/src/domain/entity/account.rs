//! Account entity.
//!
//! One registered identity. Role-specific data lives in a tagged
//! [`RoleProfile`] variant, so the role tag and its payload cannot drift
//! apart; `Account::role()` is derived from the variant.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    AccountId, AccountRole, Email, FullName, PasswordHash, PhoneNumber,
};

/// Default permission string granted to new admins.
pub const DEFAULT_ADMIN_PERMISSIONS: &str = "MANAGE_ALL";

/// Customer-specific profile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub full_name: FullName,
    pub phone_number: PhoneNumber,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub marketing_opt_in: bool,
}

/// Admin-specific profile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProfile {
    pub permissions: String,
}

/// Role payload attached to an account. The variant is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleProfile {
    Customer(CustomerProfile),
    Admin(AdminProfile),
}

impl RoleProfile {
    pub fn role(&self) -> AccountRole {
        match self {
            RoleProfile::Customer(_) => AccountRole::Customer,
            RoleProfile::Admin(_) => AccountRole::Admin,
        }
    }
}

/// Account entity.
#[derive(Debug, Clone)]
pub struct Account {
    /// Assigned at construction, immutable.
    pub account_id: AccountId,
    /// Unique. Set equal to the email at registration.
    pub username: String,
    /// Unique, the primary lookup key for sign-in and reset flows.
    pub email: Email,
    /// Always the hasher's output, never a raw password.
    pub password_hash: PasswordHash,
    /// Role tag plus role-specific payload.
    pub profile: RoleProfile,
    /// Admin-managed flag. Blocks sign-in, not listing or deletion.
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a customer account. Username mirrors the email.
    pub fn new_customer(
        email: Email,
        password_hash: PasswordHash,
        full_name: FullName,
        phone_number: PhoneNumber,
    ) -> Self {
        Self::new(
            email,
            password_hash,
            RoleProfile::Customer(CustomerProfile {
                full_name,
                phone_number,
                shipping_address: None,
                billing_address: None,
                marketing_opt_in: false,
            }),
        )
    }

    /// Create an admin account with the default permission set.
    pub fn new_admin(email: Email, password_hash: PasswordHash) -> Self {
        Self::new(
            email,
            password_hash,
            RoleProfile::Admin(AdminProfile {
                permissions: DEFAULT_ADMIN_PERMISSIONS.to_string(),
            }),
        )
    }

    fn new(email: Email, password_hash: PasswordHash, profile: RoleProfile) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            username: email.as_str().to_string(),
            email,
            password_hash,
            profile,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self) -> AccountRole {
        self.profile.role()
    }

    /// Whether authentication may succeed for this account.
    pub fn can_sign_in(&self) -> bool {
        self.enabled
    }

    /// Name to show in listings: customer full name, else the username.
    pub fn display_name(&self) -> &str {
        match &self.profile {
            RoleProfile::Customer(p) => p.full_name.as_str(),
            RoleProfile::Admin(_) => &self.username,
        }
    }

    /// Replace the password hash.
    pub fn set_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Update customer profile fields. No effect on the role tag.
    ///
    /// For an admin account only the `updated_at` timestamp moves; admins
    /// have no name or phone fields.
    pub fn update_profile(&mut self, full_name: FullName, phone_number: PhoneNumber) {
        if let RoleProfile::Customer(profile) = &mut self.profile {
            profile.full_name = full_name;
            profile.phone_number = phone_number;
        }
        self.updated_at = Utc::now();
    }

    /// Flip the enabled flag. Returns the new state.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.updated_at = Utc::now();
        self.enabled
    }
}
