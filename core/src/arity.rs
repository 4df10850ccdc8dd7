//! Argument arity: how many values an argument binds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised while materializing a grammar from configuration.
///
/// These are fatal at schema build time and never occur mid-parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Arity spec token is not one of `"?"`, `"+"`, `"*"`, or a digit string.
    #[error("invalid arity spec: {0:?}")]
    InvalidArity(String),
}

/// Number of values an argument consumes.
///
/// Parsed from the spec token used in grammar configuration: a digit string
/// means [`Fixed`](ArgumentArity::Fixed), `"+"` one-or-more, `"*"`
/// zero-or-more, `"?"` an optional single value. `Fixed(0)` is a boolean
/// flag.
///
/// # Examples
///
/// ```
/// use command_bridge_core::ArgumentArity;
///
/// let arity: ArgumentArity = "+".parse().unwrap();
/// assert_eq!(arity, ArgumentArity::OneOrMore);
/// assert!(arity.accepts(3));
/// assert!(!arity.accepts(0));
///
/// let flag: ArgumentArity = "0".parse().unwrap();
/// assert!(flag.is_flag());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentArity {
    /// Exactly `n` values. `Fixed(0)` is a boolean flag.
    Fixed(usize),
    /// Zero or more values (`"*"`).
    ZeroOrMore,
    /// One or more values (`"+"`).
    OneOrMore,
    /// Zero or one value (`"?"`).
    Optional,
}

impl ArgumentArity {
    /// Minimum number of values this arity requires.
    pub fn min_count(&self) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::OneOrMore => 1,
            Self::ZeroOrMore | Self::Optional => 0,
        }
    }

    /// Maximum number of values, or `None` when unbounded.
    pub fn max_count(&self) -> Option<usize> {
        match self {
            Self::Fixed(n) => Some(*n),
            Self::Optional => Some(1),
            Self::ZeroOrMore | Self::OneOrMore => None,
        }
    }

    /// Returns `true` when `count` bound values satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_count() && self.max_count().is_none_or(|max| count <= max)
    }

    /// Exact value count when one exists (`Fixed(n)`), otherwise `None`.
    pub fn exact_count(&self) -> Option<usize> {
        match self {
            Self::Fixed(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns `true` for `Fixed(0)`, the boolean-flag arity.
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Fixed(0))
    }

    /// Returns `true` when this arity may bind more than one value.
    pub fn is_multiple(&self) -> bool {
        match self {
            Self::Fixed(n) => *n > 1,
            Self::ZeroOrMore | Self::OneOrMore => true,
            Self::Optional => false,
        }
    }

    /// The spec token this arity serializes as.
    pub fn spec(&self) -> String {
        match self {
            Self::Fixed(n) => n.to_string(),
            Self::ZeroOrMore => "*".to_string(),
            Self::OneOrMore => "+".to_string(),
            Self::Optional => "?".to_string(),
        }
    }
}

impl FromStr for ArgumentArity {
    type Err = ConfigError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec {
            "?" => Ok(Self::Optional),
            "+" => Ok(Self::OneOrMore),
            "*" => Ok(Self::ZeroOrMore),
            _ if !spec.is_empty() && spec.bytes().all(|b| b.is_ascii_digit()) => spec
                .parse::<usize>()
                .map(Self::Fixed)
                .map_err(|_| ConfigError::InvalidArity(spec.to_string())),
            _ => Err(ConfigError::InvalidArity(spec.to_string())),
        }
    }
}

impl fmt::Display for ArgumentArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec())
    }
}

// Grammar files carry the spec token form ("1", "+", "*", "?"), so serde
// round-trips through strings rather than an enum representation.
impl Serialize for ArgumentArity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.spec())
    }
}

impl<'de> Deserialize<'de> for ArgumentArity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        spec.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_tokens() {
        assert_eq!("0".parse::<ArgumentArity>(), Ok(ArgumentArity::Fixed(0)));
        assert_eq!("1".parse::<ArgumentArity>(), Ok(ArgumentArity::Fixed(1)));
        assert_eq!("3".parse::<ArgumentArity>(), Ok(ArgumentArity::Fixed(3)));
        assert_eq!("+".parse::<ArgumentArity>(), Ok(ArgumentArity::OneOrMore));
        assert_eq!("*".parse::<ArgumentArity>(), Ok(ArgumentArity::ZeroOrMore));
        assert_eq!("?".parse::<ArgumentArity>(), Ok(ArgumentArity::Optional));
    }

    #[test]
    fn test_parse_rejects_malformed_spec() {
        for bad in ["", "x", "1x", "-1", "++"] {
            assert_eq!(
                bad.parse::<ArgumentArity>(),
                Err(ConfigError::InvalidArity(bad.to_string())),
                "spec {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_bounds() {
        assert!(ArgumentArity::Fixed(2).accepts(2));
        assert!(!ArgumentArity::Fixed(2).accepts(1));
        assert!(!ArgumentArity::Fixed(2).accepts(3));

        assert!(ArgumentArity::OneOrMore.accepts(1));
        assert!(ArgumentArity::OneOrMore.accepts(10));
        assert!(!ArgumentArity::OneOrMore.accepts(0));

        assert!(ArgumentArity::ZeroOrMore.accepts(0));
        assert!(ArgumentArity::ZeroOrMore.accepts(5));

        assert!(ArgumentArity::Optional.accepts(0));
        assert!(ArgumentArity::Optional.accepts(1));
        assert!(!ArgumentArity::Optional.accepts(2));
    }

    #[test]
    fn test_flag_detection() {
        assert!(ArgumentArity::Fixed(0).is_flag());
        assert!(!ArgumentArity::Fixed(1).is_flag());
        assert!(!ArgumentArity::Optional.is_flag());
    }

    #[test]
    fn test_serde_round_trip() {
        for spec in ["0", "2", "+", "*", "?"] {
            let arity: ArgumentArity = spec.parse().unwrap();
            let json = serde_json::to_string(&arity).unwrap();
            assert_eq!(json, format!("\"{spec}\""));
            let back: ArgumentArity = serde_json::from_str(&json).unwrap();
            assert_eq!(back, arity);
        }
    }
}
