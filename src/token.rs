use std::fmt;

use crate::error::*;

/// A compact JWS produced by a codec's sign step.
///
/// The token is only meaningful to the codec that produced it. Conversions
/// between the textual and the byte form are explicit and checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedToken(String);

impl EncodedToken {
    /// Take ownership of raw token bytes, rejecting anything that is not UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let token = String::from_utf8(bytes)
            .map_err(|e| BenchError::MalformedToken(e.utf8_error().to_string()))?;
        Ok(EncodedToken(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for EncodedToken {
    fn from(token: String) -> Self {
        EncodedToken(token)
    }
}

impl From<&str> for EncodedToken {
    fn from(token: &str) -> Self {
        EncodedToken(token.to_string())
    }
}

impl AsRef<str> for EncodedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let token = EncodedToken::from("a.b.c");
        let bytes = token.clone().into_bytes();
        assert_eq!(bytes, b"a.b.c");
        assert_eq!(EncodedToken::from_bytes(bytes).unwrap(), token);
        assert_eq!(token.len(), 5);
    }

    #[test]
    fn invalid_utf8_is_a_malformed_token() {
        let err = EncodedToken::from_bytes(vec![b'a', 0xff, b'.']).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BenchError>(),
            Some(BenchError::MalformedToken(_))
        ));
    }
}
