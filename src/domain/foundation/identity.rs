//! Client naming value objects.
//!
//! A [`BaseName`] is what the operator configures; an [`Identity`] is the
//! per-client name derived from it by appending a short random suffix.

use rand::Rng;
use std::fmt;

use super::ValidationError;

/// Number of random characters appended to the base name.
pub const SUFFIX_LEN: usize = 5;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Operator-supplied prefix shared by every client in the pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseName(String);

impl BaseName {
    /// Validates and wraps a base name.
    ///
    /// Rejects empty names and names containing whitespace, since the
    /// generated identity travels as a single token on the wire.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::empty_field("base_name"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "base_name",
                "must not contain whitespace",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name a single client presents to the remote endpoint.
///
/// Generated once when the client is created. Uniqueness across the pool is
/// probabilistic only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Derives `<base>_<suffix>` using the supplied randomness source.
    pub fn generate<R: Rng + ?Sized>(base: &BaseName, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("{}_{}", base.as_str(), suffix))
    }

    /// Wraps an identity reported by elsewhere (e.g. by tests or a session).
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn base_name_rejects_empty() {
        assert_eq!(
            BaseName::new(""),
            Err(ValidationError::empty_field("base_name"))
        );
    }

    #[test]
    fn base_name_rejects_whitespace() {
        assert!(BaseName::new("two words").is_err());
        assert!(BaseName::new("tab\there").is_err());
    }

    #[test]
    fn identity_appends_suffix_to_base() {
        let base = BaseName::new("bot").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let identity = Identity::generate(&base, &mut rng);

        let suffix = identity.as_str().strip_prefix("bot_").unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
    }

    #[test]
    fn identity_is_deterministic_for_a_seeded_source() {
        let base = BaseName::new("bot").unwrap();
        let a = Identity::generate(&base, &mut StdRng::seed_from_u64(42));
        let b = Identity::generate(&base, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn identity_compares_with_str() {
        let identity = Identity::from_string("bot_ab12c");
        assert!(identity == *"bot_ab12c");
        assert!(identity != *"Steve");
    }

    proptest! {
        #[test]
        fn suffix_is_lowercase_base36(seed in any::<u64>(), base in "[a-zA-Z0-9]{1,12}") {
            let base = BaseName::new(base).unwrap();
            let identity = Identity::generate(&base, &mut StdRng::seed_from_u64(seed));
            let prefix = format!("{}_", base);
            let suffix = identity.as_str().strip_prefix(prefix.as_str()).unwrap();
            prop_assert_eq!(suffix.len(), SUFFIX_LEN);
            prop_assert!(suffix.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        }
    }
}
