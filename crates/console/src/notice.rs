use std::fmt;

use {
    convene_auth::{AuthOutcome, routes},
    convene_gateway::TransportError,
    convene_operations::MutationOutcome,
};

/// Text shown for any transport failure.
pub const REQUEST_FAILED: &str = "Request failed";

/// User-visible reaction to a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The call went through and the backend accepted it.
    Success(Option<String>),
    /// The backend answered `success: false`.
    Rejected(String),
    /// The call itself failed.
    RequestFailed,
    /// Leave the current screen.
    Redirect(&'static str),
}

impl Notice {
    /// Classify a mutation result.
    pub fn from_mutation<P>(result: &Result<MutationOutcome<P>, TransportError>) -> Self {
        match result {
            Ok(outcome) if outcome.success => Self::Success(outcome.message().map(str::to_string)),
            Ok(outcome) => Self::Rejected(outcome.message_or(REQUEST_FAILED).to_string()),
            Err(_) => Self::RequestFailed,
        }
    }

    /// Classify an auth flow result. A successful flow becomes a redirect
    /// when it names one.
    pub fn from_auth(result: &convene_auth::Result<AuthOutcome>) -> Self {
        match result {
            Ok(AuthOutcome {
                success: true,
                redirect_to: Some(target),
                ..
            }) => Self::Redirect(*target),
            Ok(outcome) if outcome.success => Self::Success(outcome.message.clone()),
            Ok(outcome) => Self::Rejected(
                outcome
                    .message
                    .clone()
                    .unwrap_or_else(|| REQUEST_FAILED.to_string()),
            ),
            Err(_) => Self::RequestFailed,
        }
    }

    /// What a guarded screen shows when its check fails.
    pub fn unauthenticated() -> Self {
        Self::Redirect(routes::LOGIN)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::RequestFailed)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(Some(message)) => f.write_str(message),
            Self::Success(None) => f.write_str("Done"),
            Self::Rejected(message) => f.write_str(message),
            Self::RequestFailed => f.write_str(REQUEST_FAILED),
            Self::Redirect(target) => write!(f, "redirect to {target}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, convene_operations::NoPayload};

    fn outcome(success: bool, message: Option<&str>) -> MutationOutcome {
        MutationOutcome {
            success,
            message: message.map(|m| Some(m.to_string())),
            payload: NoPayload {},
            extra: Default::default(),
        }
    }

    #[test]
    fn transport_failure_is_generic() {
        let result: Result<MutationOutcome, _> = Err(TransportError::Status { status: 500 });
        let notice = Notice::from_mutation(&result);
        assert_eq!(notice, Notice::RequestFailed);
        assert_eq!(notice.to_string(), "Request failed");
    }

    #[test]
    fn rejection_shows_server_message() {
        let notice = Notice::from_mutation(&Ok(outcome(false, Some("Email already used"))));
        assert_eq!(notice, Notice::Rejected("Email already used".into()));
        assert!(notice.is_error());
    }

    #[test]
    fn rejection_without_message_falls_back() {
        let notice = Notice::from_mutation(&Ok(outcome(false, None)));
        assert_eq!(notice.to_string(), REQUEST_FAILED);
    }

    #[test]
    fn accepted_mutation_is_success() {
        let notice = Notice::from_mutation(&Ok(outcome(true, Some("User created"))));
        assert_eq!(notice, Notice::Success(Some("User created".into())));
        assert!(!notice.is_error());
    }

    #[test]
    fn auth_success_with_target_redirects() {
        let result = Ok(AuthOutcome {
            success: true,
            redirect_to: Some(routes::HOME),
            message: None,
        });
        assert_eq!(Notice::from_auth(&result), Notice::Redirect("/home"));
        assert_eq!(Notice::unauthenticated(), Notice::Redirect("/login"));
    }

    #[test]
    fn auth_transport_failure_is_generic() {
        let result: convene_auth::Result<AuthOutcome> =
            Err(convene_auth::Error::Transport(TransportError::Status { status: 502 }));
        assert_eq!(Notice::from_auth(&result), Notice::RequestFailed);
    }
}
