//! The token type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a grid cell at some resolution.
///
/// Tokens are opaque strings; equality is exact string equality. A `Token` is
/// not necessarily well-formed: use [`GridIndex::is_valid`](super::GridIndex::is_valid)
/// before relying on its structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_display_is_raw_string() {
        let token = Token::new("8928308280fffff");
        assert_eq!(token.to_string(), "8928308280fffff");
        assert_eq!(token.as_str(), "8928308280fffff");
    }

    #[test]
    fn test_token_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Token::from("abc"), 1);
        assert_eq!(map.get("abc"), Some(&1));
        assert_eq!(map.get("ABC"), None);
    }

    #[test]
    fn test_token_serializes_as_plain_string() {
        let json = serde_json::to_string(&Token::from("89283082803ffff")).unwrap();
        assert_eq!(json, "\"89283082803ffff\"");
    }
}
