/// Transport-level failure of a gateway call.
///
/// Callers are expected to treat every variant the same way ("the request
/// failed"); the split exists for logs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("graphql error: {0}")]
    GraphQl(String),
    #[error("response carried no data for `{0}`")]
    MissingData(String),
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<String>("not-json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn status_error_mentions_code() {
        let err = Error::Status { status: 502 };
        assert_eq!(err.to_string(), "endpoint returned HTTP 502");
    }

    #[test]
    fn message_error() {
        let err = Error::message("endpoint unreachable");
        assert_eq!(err.to_string(), "endpoint unreachable");
        assert!(matches!(err, Error::Message { .. }));
    }
}
