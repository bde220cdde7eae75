//! Login, logout, identity and password-recovery flows.
//!
//! Every flow distinguishes two failure classes: `Err` means the remote call
//! (or local storage) failed; an [`AuthOutcome`] with `success == false`
//! means the backend answered and said no.

use std::sync::Arc;

use {
    convene_gateway::OperationGateway,
    convene_operations::{
        User,
        auth::{ChangePassword, ForgotPassword, Login, Me, VerifyOtp},
    },
    tracing::{info, warn},
};

use crate::{credentials::CredentialStore, error::Result};

/// Navigation targets the flows hand back.
pub mod routes {
    pub const HOME: &str = "/home";
    pub const LOGIN: &str = "/login";
    pub const VERIFY_OTP: &str = "/verify-otp";
    pub const CHANGE_PASSWORD: &str = "/change-password";
}

/// Result of an auth action the backend answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub redirect_to: Option<&'static str>,
    /// Server message, when it sent one.
    pub message: Option<String>,
}

impl AuthOutcome {
    fn ok(redirect_to: &'static str, message: Option<String>) -> Self {
        Self {
            success: true,
            redirect_to: Some(redirect_to),
            message,
        }
    }

    fn rejected(message: Option<String>) -> Self {
        Self {
            success: false,
            redirect_to: None,
            message,
        }
    }

    fn rejected_to(redirect_to: &'static str, message: Option<String>) -> Self {
        Self {
            redirect_to: Some(redirect_to),
            ..Self::rejected(message)
        }
    }
}

/// Answer of the navigation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub authenticated: bool,
    pub redirect_to: &'static str,
}

/// Drives the session through the gateway and records the results in the
/// credential store.
#[derive(Debug, Clone)]
pub struct AuthProvider {
    gateway: OperationGateway,
    credentials: Arc<CredentialStore>,
}

impl AuthProvider {
    pub fn new(gateway: OperationGateway, credentials: Arc<CredentialStore>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn gateway(&self) -> &OperationGateway {
        &self.gateway
    }

    /// Exchange credentials for a session. Nothing is persisted unless the
    /// backend reports `success: true`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let op = Login::new(email, password);
        let outcome = self.gateway.call(&op).await?;
        if !outcome.success {
            info!(email = %op.email, "login rejected");
            return Ok(AuthOutcome::rejected(outcome.message.flatten()));
        }

        let Some(token) = outcome.payload.token.flatten().filter(|t| !t.is_empty()) else {
            warn!(email = %op.email, "login reported success without a token");
            return Ok(AuthOutcome::rejected(outcome.message.flatten()));
        };
        self.credentials.set(&token, outcome.payload.user.flatten())?;
        Ok(AuthOutcome::ok(routes::HOME, outcome.message.flatten()))
    }

    pub fn logout(&self) -> Result<AuthOutcome> {
        self.credentials.clear()?;
        Ok(AuthOutcome::ok(routes::LOGIN, None))
    }

    /// Fetch the identity behind the current token.
    ///
    /// On failure the soft `need_auth` flag is set and the error returned;
    /// the session itself is left alone.
    pub async fn identity(&self) -> Result<User> {
        match self.gateway.call(&Me).await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.credentials.mark_needs_reauth()?;
                Err(e.into())
            },
        }
    }

    /// Guard for protected screens. Local only.
    pub fn check(&self) -> CheckOutcome {
        if self.credentials.is_authenticated() {
            CheckOutcome {
                authenticated: true,
                redirect_to: routes::HOME,
            }
        } else {
            CheckOutcome {
                authenticated: false,
                redirect_to: routes::LOGIN,
            }
        }
    }

    /// Any error reported by a guarded screen sends the user to login.
    pub fn on_error(&self, error: &dyn std::error::Error) -> AuthOutcome {
        warn!(error = %error, "guarded screen reported an error");
        AuthOutcome::rejected_to(routes::LOGIN, None)
    }

    pub fn permissions(&self) -> Vec<String> {
        vec!["admin".to_string()]
    }

    // ── Password recovery ────────────────────────────────────────────────

    /// Ask for a one-time code. The email is recorded once the backend
    /// answers, whatever it answers.
    pub async fn forgot_password(&self, email: &str) -> Result<AuthOutcome> {
        let op = ForgotPassword::new(email);
        let outcome = self.gateway.call(&op).await?;
        self.credentials.record_recovery_email(&op.email)?;
        if outcome.success {
            Ok(AuthOutcome::ok(routes::VERIFY_OTP, outcome.message.flatten()))
        } else {
            Ok(AuthOutcome::rejected(outcome.message.flatten()))
        }
    }

    /// Check `otp` against the recorded recovery email.
    ///
    /// The code is recorded and the flow moves on to the password screen
    /// whenever the backend answers, even with `success: false`; the final
    /// password update is where a bad code is refused.
    pub async fn verify_otp(&self, otp: &str) -> Result<AuthOutcome> {
        let op = VerifyOtp {
            email: self.credentials.recovery_email(),
            otp: Some(otp.to_string()),
        };
        let outcome = self.gateway.call(&op).await?;
        self.credentials.record_recovery_otp(otp)?;
        if !outcome.success {
            info!("one-time code rejected");
        }
        Ok(AuthOutcome {
            success: outcome.success,
            redirect_to: Some(routes::CHANGE_PASSWORD),
            message: outcome.message.flatten(),
        })
    }

    /// Set a new password using the recorded email and one-time code. A
    /// returned token starts a session straight away.
    pub async fn update_password(&self, password: &str) -> Result<AuthOutcome> {
        let op = ChangePassword {
            email: self.credentials.recovery_email(),
            otp: self.credentials.recovery_otp(),
            password: password.to_string(),
        };
        let outcome = self.gateway.call(&op).await?;
        if !outcome.success {
            return Ok(AuthOutcome::rejected(outcome.message.flatten()));
        }
        match outcome.payload.token.flatten().filter(|t| !t.is_empty()) {
            Some(token) => {
                self.credentials.set(&token, outcome.payload.user.flatten())?;
                Ok(AuthOutcome::ok(routes::HOME, outcome.message.flatten()))
            },
            None => Ok(AuthOutcome::ok(routes::LOGIN, outcome.message.flatten())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, convene_gateway::Anonymous};

    fn provider() -> AuthProvider {
        let credentials = Arc::new(CredentialStore::in_memory());
        let gateway =
            OperationGateway::http("http://127.0.0.1:9/graphql/", Arc::new(Anonymous)).unwrap();
        AuthProvider::new(gateway, credentials)
    }

    #[test]
    fn check_follows_token_presence() {
        let auth = provider();
        assert_eq!(auth.check(), CheckOutcome {
            authenticated: false,
            redirect_to: routes::LOGIN,
        });

        auth.credentials().set("abc123", None).unwrap();
        assert_eq!(auth.check(), CheckOutcome {
            authenticated: true,
            redirect_to: routes::HOME,
        });
    }

    #[test]
    fn logout_redirects_to_login() {
        let auth = provider();
        auth.credentials().set("abc123", None).unwrap();
        let outcome = auth.logout().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.redirect_to, Some(routes::LOGIN));
        assert!(!auth.check().authenticated);
    }

    #[test]
    fn on_error_always_redirects_to_login() {
        let auth = provider();
        auth.credentials().set("abc123", None).unwrap();
        let err = convene_gateway::Error::Status { status: 401 };
        let outcome = auth.on_error(&err);
        assert!(!outcome.success);
        assert_eq!(outcome.redirect_to, Some(routes::LOGIN));
        assert!(auth.credentials().is_authenticated());
    }

    #[test]
    fn permissions_are_constant() {
        assert_eq!(provider().permissions(), vec!["admin".to_string()]);
    }
}
