//! Terminal result of a passphrase session.

use serde::Serialize;
use zeroize::Zeroizing;

/// Result delivered to the caller exactly once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// User confirmed the buffer as shown
    Confirmed {
        /// Entered passphrase, verbatim; wiped on drop
        passphrase: Zeroizing<String>,
    },
    /// User backed out of the empty screen, or input went away
    Cancelled,
}

impl Outcome {
    /// Builds a confirmed outcome.
    pub fn confirmed(passphrase: impl Into<String>) -> Self {
        Self::Confirmed {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }

    /// Short name used in logs and plain output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Confirmed { .. } => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// The confirmed passphrase, if any.
    pub fn passphrase(&self) -> Option<&str> {
        match self {
            Self::Confirmed { passphrase } => Some(passphrase.as_str()),
            Self::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json() {
        let confirmed = serde_json::to_value(Outcome::confirmed("a1")).unwrap();
        assert_eq!(
            confirmed,
            serde_json::json!({"status": "confirmed", "passphrase": "a1"})
        );

        let cancelled = serde_json::to_value(Outcome::Cancelled).unwrap();
        assert_eq!(cancelled, serde_json::json!({"status": "cancelled"}));
    }

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(Outcome::confirmed("").passphrase(), Some(""));
        assert_eq!(Outcome::Cancelled.passphrase(), None);
        assert_eq!(Outcome::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_confirmed_passphrase_is_wiped_on_drop() {
        let outcome = Outcome::confirmed("secret");
        let Outcome::Confirmed { passphrase } = &outcome else {
            panic!("expected a confirmed outcome");
        };
        let wiped: &Zeroizing<String> = passphrase;
        assert_eq!(wiped.as_str(), "secret");
    }
}
