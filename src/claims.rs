use coarsetime::{Clock, Duration, UnixTimeStamp};
use serde::{Deserialize, Serialize};

use crate::serde_additions;

/// Subject identifier used by the benchmark payload.
pub const SAMPLE_SUBJECT_ID: &str = "12345";

/// Username used by the benchmark payload.
pub const SAMPLE_USERNAME: &str = "dxvgef";

/// Default validity window of freshly signed tokens.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3;

/// Default validity window of the token checked by verification loops.
pub const DEFAULT_VERIFY_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Application data carried under the `data` claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

/// The claims shared by every benchmarked codec.
///
/// On the wire this is `{"data":{"id":...,"username":...},"exp":...}`.
/// Only `expires_at` is expected to change during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsPayload {
    #[serde(default)]
    pub data: UserData,

    /// Time the claims expire at, with a one second resolution
    #[serde(rename = "exp", with = "self::serde_additions::unix_timestamp")]
    pub expires_at: UnixTimeStamp,
}

impl ClaimsPayload {
    /// Create a payload for `id` and `username`, expiring in `valid_for`.
    pub fn new(id: impl ToString, username: impl ToString, valid_for: Duration) -> Self {
        let mut claims = ClaimsPayload {
            data: UserData {
                id: id.to_string(),
                username: username.to_string(),
            },
            expires_at: UnixTimeStamp::from_secs(0),
        };
        claims.refresh(valid_for);
        claims
    }

    /// The fixed payload used by the benchmarks.
    pub fn sample(valid_for: Duration) -> Self {
        Self::new(SAMPLE_SUBJECT_ID, SAMPLE_USERNAME, valid_for)
    }

    /// Set an explicit expiration time.
    pub fn expiring_at(mut self, unix_timestamp: UnixTimeStamp) -> Self {
        self.expires_at = truncate_to_secs(unix_timestamp);
        self
    }

    /// Move the expiration to `valid_for` from now.
    pub fn refresh(&mut self, valid_for: Duration) {
        self.expires_at = truncate_to_secs(Clock::now_since_epoch() + valid_for);
    }
}

// Tokens carry whole seconds; keeping the in-memory value aligned makes
// a verified payload compare equal to the one that was signed.
fn truncate_to_secs(t: UnixTimeStamp) -> UnixTimeStamp {
    UnixTimeStamp::from_secs(t.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        let claims = ClaimsPayload::sample(Duration::from_secs(60))
            .expiring_at(UnixTimeStamp::from_secs(1_700_000_000));
        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(
            json,
            r#"{"data":{"id":"12345","username":"dxvgef"},"exp":1700000000}"#
        );
        let decoded: ClaimsPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn empty_fields_are_omitted() {
        let claims =
            ClaimsPayload::new("", "", Duration::from_secs(1)).expiring_at(UnixTimeStamp::from_secs(5));
        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(json, r#"{"data":{},"exp":5}"#);
        let decoded: ClaimsPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.data, UserData::default());
    }

    #[test]
    fn negative_expiration_is_rejected() {
        let res = serde_json::from_str::<ClaimsPayload>(r#"{"data":{},"exp":-1}"#);
        assert!(res.is_err());
    }

    #[test]
    fn refresh_moves_expiration_forward() {
        let mut claims = ClaimsPayload::sample(Duration::from_secs(0))
            .expiring_at(UnixTimeStamp::from_secs(1));
        assert_eq!(claims.expires_at.as_secs(), 1);
        claims.refresh(Duration::from_secs(3600));
        assert!(claims.expires_at.as_secs() >= Clock::now_since_epoch().as_secs() + 3599);
        assert_eq!(claims.expires_at.as_f64().fract(), 0.0);
        assert_eq!(claims.data.id, SAMPLE_SUBJECT_ID);
        assert_eq!(claims.data.username, SAMPLE_USERNAME);
    }
}
