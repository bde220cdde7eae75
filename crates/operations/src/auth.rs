//! Session and password-recovery operations.

use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{MutationOutcome, Nullable, User, outcome_selection};

/// Payload of a successful `auth` or password reset: the new session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub token: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub user: Nullable<User>,
}

fn session_selection() -> Selection {
    outcome_selection(Selection::of(&["token"]).nested("user", User::identity_selection()))
}

/// `auth`: exchange email and password for a bearer token.
#[derive(Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl Login {
    /// The email is trimmed; the password is sent untouched.
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Operation for Login {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "auth";

    type Output = MutationOutcome<SessionPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("email", "String", self.email.as_str())
            .required("password", "String", self.password.as_str())
    }

    fn selection(&self) -> Selection {
        session_selection()
    }
}

/// `me`: the identity behind the current token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Me;

impl Operation for Me {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "me";

    type Output = User;

    fn selection(&self) -> Selection {
        User::me_selection()
    }
}

/// `forgotPassword`: ask the backend to mail a one-time code.
#[derive(Debug, Clone)]
pub struct ForgotPassword {
    pub email: String,
}

impl ForgotPassword {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
        }
    }
}

impl Operation for ForgotPassword {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "forgotPassword";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        Variables::new().required("email", "String", self.email.as_str())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

/// `verifyOtp`: check a one-time code against the recovery email.
///
/// Both values are optional so a missing recorded email is sent as `null`
/// and rejected remotely rather than locally.
#[derive(Debug, Clone)]
pub struct VerifyOtp {
    pub email: Option<String>,
    pub otp: Option<String>,
}

impl Operation for VerifyOtp {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "verifyOtp";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("email", "String", self.email.clone())
            .required("otp", "String", self.otp.clone())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

/// `userChangePassword`, the last recovery step. Sets a new password from
/// the recorded email and one-time code.
#[derive(Clone)]
pub struct ChangePassword {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub password: String,
}

impl std::fmt::Debug for ChangePassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePassword")
            .field("email", &self.email)
            .field("otp", &self.otp.as_ref().map(|_| "[REDACTED]"))
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Operation for ChangePassword {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "userChangePassword";

    type Output = MutationOutcome<SessionPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("email", "String", self.email.clone())
            .required("otp", "String", self.otp.clone())
            .required("password", "String", self.password.as_str())
    }

    fn selection(&self) -> Selection {
        session_selection()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::models::NullableExt, serde_json::json};

    #[test]
    fn login_trims_email_and_renders_mutation() {
        let op = Login::new("  a@b.com ", "x");
        let desc = op.descriptor();
        assert_eq!(desc.variables.get("email").unwrap().value, json!("a@b.com"));
        assert_eq!(
            desc.document(),
            "mutation ($email: String!, $password: String!) { auth(email: $email, password: $password) { success message token user { id firstName middleName lastName email phone isStaff isAdmin isActive } } }"
        );
    }

    #[test]
    fn login_debug_redacts_password() {
        let debug = format!("{:?}", Login::new("a@b.com", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn login_payload_decodes() {
        let out: MutationOutcome<SessionPayload> = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "token": "abc123",
            "user": { "id": 1, "email": "a@b.com" }
        }))
        .unwrap();
        assert!(out.success);
        assert_eq!(out.payload.token.value().map(String::as_str), Some("abc123"));
        assert_eq!(out.payload.user.value().unwrap().id, 1);
    }

    #[test]
    fn session_outcome_re_encodes_nulls_as_sent() {
        let payload = json!({
            "success": false,
            "message": null,
            "token": null,
            "user": { "id": 1, "middleName": null, "lastLogin": "2024-05-01" }
        });
        let out: MutationOutcome<SessionPayload> =
            serde_json::from_value(payload.clone()).unwrap();
        assert!(out.message.is_null());
        assert!(out.payload.token.is_null());
        assert_eq!(serde_json::to_value(&out).unwrap(), payload);
    }

    #[test]
    fn me_is_a_query_without_arguments() {
        assert_eq!(
            Me.descriptor().document(),
            "query { me { id firstName middleName lastName email phone isStaff isAdmin } }"
        );
    }

    #[test]
    fn verify_otp_sends_null_for_missing_email() {
        let op = VerifyOtp {
            email: None,
            otp: Some("123456".into()),
        };
        let vars = op.variables().to_json();
        assert_eq!(vars["email"], serde_json::Value::Null);
        assert_eq!(vars["otp"], "123456");
    }

    #[test]
    fn change_password_carries_email_otp_and_password() {
        let op = ChangePassword {
            email: Some("a@b.com".into()),
            otp: Some("654321".into()),
            password: "n3w".into(),
        };
        let vars = op.variables().to_json();
        assert_eq!(
            serde_json::Value::Object(vars),
            json!({ "email": "a@b.com", "otp": "654321", "password": "n3w" })
        );
        assert!(!format!("{op:?}").contains("654321"));
    }
}
