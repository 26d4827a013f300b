//! Accounts Router

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

use platform::mailer::{ConsoleMailer, OtpMailer};

use crate::application::config::AccountsConfig;
use crate::domain::otp_store::OtpStore;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountsAppState};
use crate::presentation::middleware::{GateState, require_admin, require_session};

/// Create the accounts router with the PostgreSQL repository and the
/// console mailer.
pub fn accounts_router(
    repo: PgAccountRepository,
    otp_store: Arc<OtpStore>,
    config: AccountsConfig,
) -> Router {
    accounts_router_generic(repo, otp_store, ConsoleMailer, config)
}

/// Create an accounts router for any repository and mailer implementation
pub fn accounts_router_generic<R, M>(
    repo: R,
    otp_store: Arc<OtpStore>,
    mailer: M,
    config: AccountsConfig,
) -> Router
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        otp_store,
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    let gate = GateState {
        sessions: state.repo.clone(),
        config: state.config.clone(),
    };

    let session_routes = Router::new()
        .route(
            "/profile",
            get(handlers::profile::<R, M>).put(handlers::update_profile::<R, M>),
        )
        .layer(middleware::from_fn({
            let gate = gate.clone();
            move |req, next| require_session(gate.clone(), req, next)
        }));

    let admin_routes = Router::new()
        .route("/admin/users", get(handlers::list_users::<R, M>))
        .route("/admin/users/search", get(handlers::search_users::<R, M>))
        .route(
            "/admin/users/{id}/toggle",
            post(handlers::toggle_user_enabled::<R, M>),
        )
        .route("/admin/users/{id}", delete(handlers::delete_user::<R, M>))
        .layer(middleware::from_fn(move |req, next| {
            require_admin(gate.clone(), req, next)
        }));

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/signin", post(handlers::sign_in::<R, M>))
        .route("/signout", post(handlers::sign_out::<R, M>))
        .route("/status", get(handlers::session_status::<R, M>))
        .route("/password/forgot", post(handlers::forgot_password::<R, M>))
        .route("/password/verify-otp", post(handlers::verify_otp::<R, M>))
        .route("/password/reset", post(handlers::reset_password::<R, M>))
        .merge(session_routes)
        .merge(admin_routes)
        .with_state(state)
}
