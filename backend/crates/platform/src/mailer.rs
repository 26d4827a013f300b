//! Outbound one-time-code delivery.
//!
//! The reset flow only needs fire-and-forget delivery: a failed send is
//! logged but does not roll back code issuance.

/// Delivery channel for password-reset codes.
#[trait_variant::make(OtpMailer: Send)]
pub trait LocalOtpMailer {
    /// Deliver `code` to `email`. Must not block the caller on retries.
    async fn send_otp(&self, email: &str, code: &str);
}

/// Development mailer that writes the code to the log instead of sending
/// mail. Swap in an SMTP implementation behind the same trait for real
/// deployments.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl OtpMailer for ConsoleMailer {
    async fn send_otp(&self, email: &str, code: &str) {
        tracing::info!(
            email = %email,
            code = %code,
            "Password reset code issued (expires in 10 minutes)"
        );
    }
}
