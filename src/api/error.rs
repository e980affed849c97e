//! Lookup failure taxonomy
//!
//! The one distinction that matters to callers is transport vs. semantic
//! failure: only transport failures are worth retrying.

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Why the network exchange itself failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// DNS failure or host not reachable
    Unreachable,
    /// Connect or read timed out
    Timeout,
    /// TLS handshake or certificate failure
    Tls,
    /// Any other I/O failure while sending or reading
    Io,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Unreachable => write!(f, "host unreachable"),
            TransportKind::Timeout => write!(f, "timed out"),
            TransportKind::Tls => write!(f, "TLS failure"),
            TransportKind::Io => write!(f, "I/O error"),
        }
    }
}

/// Failure of a single remote lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The service answered but reported a negative result
    #[error("{0}")]
    Rejected(String),

    /// The exchange did not complete
    #[error("{kind}: {message}")]
    Transport { kind: TransportKind, message: String },

    /// Anything else (bad payload, unexpected status)
    #[error("{0}")]
    Unexpected(String),
}

impl LookupError {
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        LookupError::Transport {
            kind,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport { .. })
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();

        if err.is_timeout() {
            LookupError::transport(TransportKind::Timeout, message)
        } else if err.is_connect() {
            let kind = if mentions_tls(&err) {
                TransportKind::Tls
            } else {
                TransportKind::Unreachable
            };
            LookupError::transport(kind, message)
        } else if err.is_decode() || err.is_status() || err.is_builder() || err.is_redirect() {
            LookupError::Unexpected(message)
        } else if err.is_request() || err.is_body() {
            LookupError::transport(TransportKind::Io, message)
        } else {
            LookupError::Unexpected(message)
        }
    }
}

/// Walk the source chain looking for a TLS-level cause
fn mentions_tls(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_ascii_lowercase();
        if ["tls", "ssl", "certificate", "handshake"]
            .iter()
            .any(|needle| text.contains(needle))
        {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Leaf(&'static str);

    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl StdError for Leaf {}

    #[derive(Debug)]
    struct Wrapper(Leaf);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "error trying to connect")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_mentions_tls_follows_source_chain() {
        let err = Wrapper(Leaf("invalid peer certificate: UnknownIssuer"));
        assert!(mentions_tls(&err));

        let err = Wrapper(Leaf("dns error: failed to lookup address"));
        assert!(!mentions_tls(&err));
    }

    #[test]
    fn test_display() {
        let err = LookupError::transport(TransportKind::Timeout, "operation timed out");
        assert_eq!(err.to_string(), "timed out: operation timed out");
        assert!(err.is_transport());

        let err = LookupError::Rejected("Movie not found!".into());
        assert_eq!(err.to_string(), "Movie not found!");
        assert!(!err.is_transport());
    }
}
