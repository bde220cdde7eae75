use secrecy::Secret;

/// Where the gateway reads the current bearer token from.
///
/// Read on every call; implementations must be cheap and must not block on
/// the network.
pub trait BearerSource: Send + Sync {
    fn bearer_token(&self) -> Option<Secret<String>>;
}

/// Never attaches a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl BearerSource for Anonymous {
    fn bearer_token(&self) -> Option<Secret<String>> {
        None
    }
}

/// Always attaches the same token.
#[derive(Clone)]
pub struct StaticBearer(Secret<String>);

impl StaticBearer {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }
}

impl std::fmt::Debug for StaticBearer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticBearer([REDACTED])")
    }
}

impl BearerSource for StaticBearer {
    fn bearer_token(&self) -> Option<Secret<String>> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn anonymous_has_no_token() {
        assert!(Anonymous.bearer_token().is_none());
    }

    #[test]
    fn static_bearer_returns_token_and_redacts_debug() {
        let bearer = StaticBearer::new("abc123");
        let token = bearer.bearer_token();
        assert_eq!(token.as_ref().map(|t| t.expose_secret().as_str()), Some("abc123"));
        assert!(!format!("{bearer:?}").contains("abc123"));
    }
}
