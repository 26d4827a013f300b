//! Use-case tests against an in-memory repository.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use platform::mailer::OtpMailer;

use crate::application::config::AccountsConfig;
use crate::application::{
    AuthenticateInput, AuthenticateUseCase, CheckSessionUseCase, ManageUsersUseCase,
    PasswordResetUseCase, RegisterInput, RegisterOutput, RegisterUseCase, SignOutUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};
use crate::application::token::sign_session_token;
use crate::domain::entity::{account::Account, session::Session};
use crate::domain::otp_store::OtpStore;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, AccountRole, Email};
use crate::error::{AccountError, AccountResult};

// ============================================================================
// In-memory doubles
// ============================================================================

#[derive(Clone, Default)]
struct InMemoryRepo {
    accounts: Arc<Mutex<HashMap<Uuid, Account>>>,
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl AccountRepository for InMemoryRepo {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let mut accounts = self.accounts.lock().unwrap();

        let taken = accounts.values().any(|a| {
            a.email.matches_ignore_case(account.email.as_str())
                || a.username.eq_ignore_ascii_case(&account.username)
        });
        if taken {
            return Err(AccountError::EmailTaken);
        }

        accounts.insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> AccountResult<()> {
        self.accounts
            .lock()
            .unwrap()
            .insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(account_id.as_uuid())
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email.matches_ignore_case(email.as_str()))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AccountResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_all(&self) -> AccountResult<Vec<Account>> {
        let mut all: Vec<Account> = self.accounts.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|a| a.created_at);
        Ok(all)
    }

    async fn delete_by_id(&self, account_id: &AccountId) -> AccountResult<()> {
        self.accounts.lock().unwrap().remove(account_id.as_uuid());
        Ok(())
    }
}

impl SessionRepository for InMemoryRepo {
    async fn create(&self, session: &Session) -> AccountResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AccountResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(&session_id).cloned())
    }

    async fn delete(&self, session_id: Uuid) -> AccountResult<()> {
        self.sessions.lock().unwrap().remove(&session_id);
        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AccountResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.account_id != *account_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingMailer {
    fn last_code(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, code)| code.clone())
            .expect("no mail was sent")
    }
}

impl OtpMailer for RecordingMailer {
    async fn send_otp(&self, email: &str, code: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> Arc<AccountsConfig> {
    Arc::new(AccountsConfig {
        cookie_secure: false,
        ..AccountsConfig::with_random_secret()
    })
}

async fn register_customer(
    repo: &Arc<InMemoryRepo>,
    config: &Arc<AccountsConfig>,
    email: &str,
) -> RegisterOutput {
    RegisterUseCase::new(repo.clone(), config.clone())
        .execute(RegisterInput {
            full_name: "Amaya Perera".to_string(),
            email: email.to_string(),
            password: "Valid1Pass!".to_string(),
            phone_number: "0712345678".to_string(),
            role: AccountRole::Customer,
        })
        .await
        .expect("registration failed")
}

async fn sign_in(
    repo: &Arc<InMemoryRepo>,
    config: &Arc<AccountsConfig>,
    identifier: &str,
    password: &str,
) -> AccountResult<crate::application::AuthenticateOutput> {
    AuthenticateUseCase::new(repo.clone(), repo.clone(), config.clone())
        .execute(AuthenticateInput {
            identifier: identifier.to_string(),
            password: password.to_string(),
        })
        .await
}

fn reset_use_case(
    repo: &Arc<InMemoryRepo>,
    config: &Arc<AccountsConfig>,
    otp_store: &Arc<OtpStore>,
    mailer: &Arc<RecordingMailer>,
) -> PasswordResetUseCase<InMemoryRepo, RecordingMailer> {
    PasswordResetUseCase::new(
        repo.clone(),
        otp_store.clone(),
        mailer.clone(),
        config.clone(),
    )
}

// ============================================================================
// Registration and sign-in
// ============================================================================

#[tokio::test]
async fn test_register_then_sign_in_round_trip() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;
    assert_eq!(registered.role, AccountRole::Customer);

    let output = sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .expect("sign-in failed");

    assert_eq!(output.account_id, registered.account_id);
    assert_eq!(output.role, AccountRole::Customer);
    assert_eq!(output.display_name, "Amaya Perera");
}

#[tokio::test]
async fn test_sign_in_identifier_is_case_insensitive() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "amaya@gmail.com").await;

    // username mirrors the email, and identifiers with '@' resolve by email
    let output = sign_in(&repo, &config, "Amaya@Gmail.com", "Valid1Pass!").await;
    assert!(output.is_ok());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let result = RegisterUseCase::new(repo.clone(), config.clone())
        .execute(RegisterInput {
            full_name: "Other Person".to_string(),
            email: "amaya@gmail.com".to_string(),
            password: "Other1Pass!".to_string(),
            phone_number: "0771234567".to_string(),
            role: AccountRole::Customer,
        })
        .await;

    assert!(matches!(result, Err(AccountError::EmailTaken)));
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let result = sign_in(&repo, &config, "amaya@gmail.com", "Wrong1Pass!").await;
    assert!(matches!(result, Err(AccountError::InvalidCredentials)));
}

#[tokio::test]
async fn test_unknown_email_indistinguishable_from_wrong_password() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let result = sign_in(&repo, &config, "nobody@gmail.com", "Valid1Pass!").await;
    assert!(matches!(result, Err(AccountError::InvalidCredentials)));
}

#[tokio::test]
async fn test_disabled_account_cannot_sign_in() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;

    let manage = ManageUsersUseCase::new(repo.clone(), repo.clone());
    let enabled = manage.toggle_enabled(&registered.account_id).await.unwrap();
    assert!(!enabled);

    let result = sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!").await;
    assert!(matches!(result, Err(AccountError::AccountDisabled)));

    // re-enabling restores access
    manage.toggle_enabled(&registered.account_id).await.unwrap();
    assert!(sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_bootstrap_admin_role_assignment() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = Arc::new(AccountsConfig {
        bootstrap_admin_email: Some("owner@gmail.com".to_string()),
        ..AccountsConfig::with_random_secret()
    });

    // the registration handler resolves the role from configuration; the
    // use case itself takes it verbatim
    let role = if config.is_bootstrap_admin("owner@gmail.com") {
        AccountRole::Admin
    } else {
        AccountRole::Customer
    };
    assert_eq!(role, AccountRole::Admin);

    let output = RegisterUseCase::new(repo.clone(), config.clone())
        .execute(RegisterInput {
            full_name: "Site Owner".to_string(),
            email: "owner@gmail.com".to_string(),
            password: "Valid1Pass!".to_string(),
            phone_number: "0712345678".to_string(),
            role,
        })
        .await
        .unwrap();

    assert_eq!(output.role, AccountRole::Admin);

    let signed_in = sign_in(&repo, &config, "owner@gmail.com", "Valid1Pass!")
        .await
        .unwrap();
    assert_eq!(signed_in.role, AccountRole::Admin);
    // admins have no full name; display name falls back to the username
    assert_eq!(signed_in.display_name, "owner@gmail.com");
}

#[tokio::test]
async fn test_validation_first_failure_is_reported() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    // bad name and bad email together: the name rule fires first
    let result = RegisterUseCase::new(repo.clone(), config.clone())
        .execute(RegisterInput {
            full_name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            phone_number: "123".to_string(),
            role: AccountRole::Customer,
        })
        .await;

    match result {
        Err(AccountError::Validation(msg)) => assert_eq!(msg, "Full name is required."),
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_profile_update() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;

    let use_case = UpdateProfileUseCase::new(repo.clone());
    let account = use_case
        .execute(UpdateProfileInput {
            account_id: registered.account_id,
            full_name: "Nimal Silva".to_string(),
            phone_number: "+94771234567".to_string(),
        })
        .await
        .unwrap()
        .expect("account exists");

    assert_eq!(account.display_name(), "Nimal Silva");

    // the change is persisted
    let reloaded = use_case.fetch(&registered.account_id).await.unwrap();
    assert_eq!(reloaded.display_name(), "Nimal Silva");
}

#[tokio::test]
async fn test_profile_update_for_missing_account_is_a_noop() {
    let repo = Arc::new(InMemoryRepo::default());

    let result = UpdateProfileUseCase::new(repo.clone())
        .execute(UpdateProfileInput {
            account_id: AccountId::new(),
            full_name: "Nimal Silva".to_string(),
            phone_number: "0712345678".to_string(),
        })
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(repo.accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_update_rejects_bad_phone() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;

    let result = UpdateProfileUseCase::new(repo.clone())
        .execute(UpdateProfileInput {
            account_id: registered.account_id,
            full_name: "Nimal Silva".to_string(),
            phone_number: "12345".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AccountError::Validation(_))));
}

// ============================================================================
// Password reset
// ============================================================================

#[tokio::test]
async fn test_full_password_reset_flow() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();
    let otp_store = Arc::new(OtpStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let reset = reset_use_case(&repo, &config, &otp_store, &mailer);
    reset.initiate("amaya@gmail.com").await.unwrap();

    let code = mailer.last_code();
    assert_eq!(code.len(), 6);

    reset
        .reset_with_otp("amaya@gmail.com", &code, "Fresh2Pass!")
        .await
        .unwrap();

    // old password no longer works, new one does
    assert!(matches!(
        sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!").await,
        Err(AccountError::InvalidCredentials)
    ));
    assert!(sign_in(&repo, &config, "amaya@gmail.com", "Fresh2Pass!")
        .await
        .is_ok());

    // the code was consumed
    let replay = reset
        .reset_with_otp("amaya@gmail.com", &code, "Third3Pass!")
        .await;
    assert!(matches!(replay, Err(AccountError::OtpInvalid)));
}

#[tokio::test]
async fn test_initiate_for_unknown_email() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();
    let otp_store = Arc::new(OtpStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    let reset = reset_use_case(&repo, &config, &otp_store, &mailer);
    let result = reset.initiate("nobody@gmail.com").await;

    assert!(matches!(result, Err(AccountError::NotFound)));
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_verify_otp_is_single_use() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();
    let otp_store = Arc::new(OtpStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let reset = reset_use_case(&repo, &config, &otp_store, &mailer);
    reset.initiate("amaya@gmail.com").await.unwrap();
    let code = mailer.last_code();

    assert!(reset.verify_otp("amaya@gmail.com", &code).await.is_ok());
    assert!(matches!(
        reset.verify_otp("amaya@gmail.com", &code).await,
        Err(AccountError::OtpInvalid)
    ));
}

#[tokio::test]
async fn test_invalid_new_password_does_not_burn_the_code() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();
    let otp_store = Arc::new(OtpStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let reset = reset_use_case(&repo, &config, &otp_store, &mailer);
    reset.initiate("amaya@gmail.com").await.unwrap();
    let code = mailer.last_code();

    let rejected = reset.reset_with_otp("amaya@gmail.com", &code, "weak").await;
    assert!(matches!(rejected, Err(AccountError::Validation(_))));

    // the code survives a rejected password and still works
    assert!(reset
        .reset_with_otp("amaya@gmail.com", &code, "Fresh2Pass!")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_wrong_code_rejected() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();
    let otp_store = Arc::new(OtpStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let reset = reset_use_case(&repo, &config, &otp_store, &mailer);
    reset.initiate("amaya@gmail.com").await.unwrap();

    let result = reset.verify_otp("amaya@gmail.com", "000000").await;
    assert!(matches!(result, Err(AccountError::OtpInvalid)));
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_session_check_after_sign_in() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;
    let signed_in = sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .unwrap();

    let check = CheckSessionUseCase::new(repo.clone(), config.clone());
    let info = check.execute(&signed_in.token).await.unwrap();

    assert_eq!(info.account_id, registered.account_id);
    assert_eq!(info.role, AccountRole::Customer);
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "amaya@gmail.com").await;
    let signed_in = sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .unwrap();

    let check = CheckSessionUseCase::new(repo.clone(), config.clone());

    let mut tampered = signed_in.token.clone();
    tampered.truncate(tampered.len() - 2);

    assert!(matches!(
        check.execute(&tampered).await,
        Err(AccountError::SessionInvalid)
    ));
}

#[tokio::test]
async fn test_sign_out_invalidates_session() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "amaya@gmail.com").await;
    let signed_in = sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .unwrap();

    SignOutUseCase::new(repo.clone(), config.clone())
        .execute(&signed_in.token)
        .await
        .unwrap();

    let check = CheckSessionUseCase::new(repo.clone(), config.clone());
    assert!(matches!(
        check.execute(&signed_in.token).await,
        Err(AccountError::SessionInvalid)
    ));
}

#[tokio::test]
async fn test_expired_session_is_rejected_and_reaped() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let mut session = Session::new(
        AccountId::new(),
        AccountRole::Customer,
        Duration::hours(12),
    );
    session.expires_at = Utc::now() - Duration::seconds(1);
    SessionRepository::create(repo.as_ref(), &session)
        .await
        .unwrap();

    let token = sign_session_token(session.session_id, &config.session_secret);

    let check = CheckSessionUseCase::new(repo.clone(), config.clone());
    assert!(matches!(
        check.execute(&token).await,
        Err(AccountError::SessionInvalid)
    ));

    // the row was deleted on the way out
    assert!(repo.sessions.lock().unwrap().is_empty());
}

// ============================================================================
// Admin user management
// ============================================================================

#[tokio::test]
async fn test_listing_counts_roles() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "a@gmail.com").await;
    register_customer(&repo, &config, "b@gmail.com").await;

    RegisterUseCase::new(repo.clone(), config.clone())
        .execute(RegisterInput {
            full_name: "Site Owner".to_string(),
            email: "owner@gmail.com".to_string(),
            password: "Valid1Pass!".to_string(),
            phone_number: "0712345678".to_string(),
            role: AccountRole::Admin,
        })
        .await
        .unwrap();

    let listing = ManageUsersUseCase::new(repo.clone(), repo.clone())
        .list()
        .await
        .unwrap();

    assert_eq!(listing.total, 3);
    assert_eq!(listing.admin_count, 1);
    assert_eq!(listing.customer_count, 2);
}

#[tokio::test]
async fn test_search_matches_name_and_email() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    register_customer(&repo, &config, "amaya@gmail.com").await;

    let manage = ManageUsersUseCase::new(repo.clone(), repo.clone());

    let by_name = manage.search("perera").await.unwrap();
    assert_eq!(by_name.len(), 1);

    let by_email = manage.search("AMAYA@").await.unwrap();
    assert_eq!(by_email.len(), 1);

    let no_match = manage.search("zzz").await.unwrap();
    assert!(no_match.is_empty());
}

#[tokio::test]
async fn test_disabling_revokes_sessions() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;
    let signed_in = sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .unwrap();

    ManageUsersUseCase::new(repo.clone(), repo.clone())
        .toggle_enabled(&registered.account_id)
        .await
        .unwrap();

    let check = CheckSessionUseCase::new(repo.clone(), config.clone());
    assert!(matches!(
        check.execute(&signed_in.token).await,
        Err(AccountError::SessionInvalid)
    ));
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let registered = register_customer(&repo, &config, "amaya@gmail.com").await;

    let manage = ManageUsersUseCase::new(repo.clone(), repo.clone());
    let result = manage
        .delete(&registered.account_id, &registered.account_id)
        .await;

    assert!(matches!(result, Err(AccountError::CannotDeleteSelf)));
}

#[tokio::test]
async fn test_delete_removes_account_and_sessions() {
    let repo = Arc::new(InMemoryRepo::default());
    let config = test_config();

    let target = register_customer(&repo, &config, "amaya@gmail.com").await;
    sign_in(&repo, &config, "amaya@gmail.com", "Valid1Pass!")
        .await
        .unwrap();

    let actor = register_customer(&repo, &config, "admin@gmail.com").await;

    ManageUsersUseCase::new(repo.clone(), repo.clone())
        .delete(&actor.account_id, &target.account_id)
        .await
        .unwrap();

    assert!(repo
        .accounts
        .lock()
        .unwrap()
        .values()
        .all(|a| a.account_id != target.account_id));
    assert!(repo.sessions.lock().unwrap().is_empty());

    // deleting again reports NotFound
    let again = ManageUsersUseCase::new(repo.clone(), repo.clone())
        .delete(&actor.account_id, &target.account_id)
        .await;
    assert!(matches!(again, Err(AccountError::NotFound)));
}

#[tokio::test]
async fn test_startup_cleanup_removes_only_expired_sessions() {
    let repo = Arc::new(InMemoryRepo::default());

    let live = Session::new(AccountId::new(), AccountRole::Customer, Duration::hours(1));
    let mut stale = Session::new(AccountId::new(), AccountRole::Customer, Duration::hours(1));
    stale.expires_at = Utc::now() - Duration::minutes(5);

    SessionRepository::create(repo.as_ref(), &live).await.unwrap();
    SessionRepository::create(repo.as_ref(), &stale).await.unwrap();

    let removed = repo.cleanup_expired().await.unwrap();
    assert_eq!(removed, 1);
    assert!(repo.sessions.lock().unwrap().contains_key(&live.session_id));
}
