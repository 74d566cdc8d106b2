//! Title: the namespace that identifies one parachain instance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Executor name suffix carried by paracross transactions on every chain.
pub const PARACROSS_EXECUTOR: &str = "paracross";

/// Separator between key components; never part of a title.
const KEY_SEPARATOR: char = '-';

/// A parachain namespace such as `user.p.test.`.
///
/// Executors belonging to the title are the title itself or any name that
/// extends it as a namespace prefix (`user.p.test.token`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Create a title.
    ///
    /// Rejects empty names and names containing `-`, which separates the
    /// title from the height in store keys.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidTitle("empty title".into()));
        }
        if name.contains(KEY_SEPARATOR) {
            return Err(CoreError::InvalidTitle(format!(
                "title {name:?} contains {KEY_SEPARATOR:?}"
            )));
        }
        Ok(Self(name))
    }

    /// Derive the title an executor name belongs to.
    ///
    /// The title is everything up to and including the last `.`:
    /// `p.user.guodun.token` belongs to `p.user.guodun.`.
    pub fn from_executor(executor: &str) -> Result<Self, CoreError> {
        match executor.rfind('.') {
            Some(idx) => Self::new(&executor[..=idx]),
            None => Err(CoreError::InvalidTitle(format!(
                "executor {executor:?} has no title prefix"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an executor name runs inside this title's namespace.
    pub fn owns_executor(&self, executor: &str) -> bool {
        if executor == self.0 {
            return true;
        }
        match executor.strip_prefix(self.0.as_str()) {
            Some(rest) => self.0.ends_with('.') || rest.starts_with('.'),
            None => false,
        }
    }

    /// The paracross executor name inside this title (`user.p.test.paracross`).
    pub fn paracross_executor(&self) -> String {
        if self.0.ends_with('.') {
            format!("{}{}", self.0, PARACROSS_EXECUTOR)
        } else {
            format!("{}.{}", self.0, PARACROSS_EXECUTOR)
        }
    }
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title({})", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether an executor name is a paracross executor: `paracross` on the main
/// chain or `<title>.paracross` on a parachain.
pub fn is_paracross_executor(executor: &str) -> bool {
    match executor.strip_suffix(PARACROSS_EXECUTOR) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_executor() {
        let title = Title::from_executor("p.user.guodun.token").unwrap();
        assert_eq!(title.as_str(), "p.user.guodun.");
        assert!(Title::from_executor("coins").is_err());
    }

    #[test]
    fn test_owns_executor() {
        let title = Title::new("user.p.test.").unwrap();
        assert!(title.owns_executor("user.p.test."));
        assert!(title.owns_executor("user.p.test.token"));
        assert!(title.owns_executor("user.p.test.paracross"));
        assert!(!title.owns_executor("user.p.testx.token"));
        assert!(!title.owns_executor("paracross"));
    }

    #[test]
    fn test_owns_executor_without_trailing_dot() {
        let title = Title::new("user.p.test").unwrap();
        assert!(title.owns_executor("user.p.test"));
        assert!(title.owns_executor("user.p.test.token"));
        assert!(!title.owns_executor("user.p.testnet.token"));
    }

    #[test]
    fn test_paracross_executor() {
        let title = Title::new("user.p.test.").unwrap();
        assert_eq!(title.paracross_executor(), "user.p.test.paracross");
        assert!(is_paracross_executor(&title.paracross_executor()));
        assert!(is_paracross_executor("paracross"));
        assert!(!is_paracross_executor("user.p.test.token"));
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(matches!(Title::new(""), Err(CoreError::InvalidTitle(_))));
    }

    #[test]
    fn test_key_separator_rejected() {
        assert!(matches!(
            Title::new("user.p.x-4"),
            Err(CoreError::InvalidTitle(_))
        ));
        assert!(Title::from_executor("user.p.x-4.token").is_err());
    }

    #[test]
    fn test_paracross_executor_needs_namespace_boundary() {
        assert!(is_paracross_executor("user.p.x.paracross"));
        assert!(!is_paracross_executor("user.p.x.fooparacross"));
        assert!(!is_paracross_executor("fooparacross"));
    }
}
