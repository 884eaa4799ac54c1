#![forbid(unsafe_code)]

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Time tolerances applied before the trust context is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustPolicy {
    /// Maximum distance, in milliseconds, between a signature time-stamp
    /// and the claimed signing time. The distance must stay strictly below.
    pub timestamp_max_offset: i64,
    /// How long after the validation time, in milliseconds, embedded
    /// revocation evidence may have been produced.
    pub max_grace_period: i64,
    /// Validate at the earliest signature time-stamp instead of the claimed
    /// signing time.
    pub prefer_timestamp_time: bool,
}

impl TrustPolicy {
    pub const DEFAULT_TIMESTAMP_MAX_OFFSET: i64 = 5 * 60 * 1000;
    pub const DEFAULT_MAX_GRACE_PERIOD: i64 = 7 * 24 * 60 * 60 * 1000;

    pub fn timestamp_max_offset(&self) -> Duration {
        Duration::milliseconds(self.timestamp_max_offset.max(0))
    }

    pub fn max_grace_period(&self) -> Duration {
        Duration::milliseconds(self.max_grace_period.max(0))
    }

    /// Both tolerances must be non-negative.
    pub fn check(&self) -> Result<(), String> {
        if self.timestamp_max_offset < 0 {
            return Err(format!("timestamp_max_offset is negative: {}", self.timestamp_max_offset));
        }
        if self.max_grace_period < 0 {
            return Err(format!("max_grace_period is negative: {}", self.max_grace_period));
        }
        Ok(())
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            timestamp_max_offset: Self::DEFAULT_TIMESTAMP_MAX_OFFSET,
            max_grace_period: Self::DEFAULT_MAX_GRACE_PERIOD,
            prefer_timestamp_time: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = TrustPolicy::default();
        assert_eq!(policy.timestamp_max_offset, 300_000);
        assert_eq!(policy.max_grace_period, 604_800_000);
        assert_eq!(policy.max_grace_period(), Duration::days(7));
        assert!(!policy.prefer_timestamp_time);
    }

    #[test]
    fn test_partial_json() {
        let policy: TrustPolicy = serde_json::from_str(r#"{"timestamp_max_offset": 1000}"#).unwrap();
        assert_eq!(policy.timestamp_max_offset(), Duration::seconds(1));
        assert_eq!(policy.max_grace_period, TrustPolicy::DEFAULT_MAX_GRACE_PERIOD);
    }

    #[test]
    fn test_negative_tolerance() {
        let policy: TrustPolicy = serde_json::from_str(r#"{"max_grace_period": -1}"#).unwrap();
        assert!(policy.check().unwrap_err().contains("max_grace_period"));
        assert_eq!(policy.max_grace_period(), Duration::zero());
        TrustPolicy::default().check().unwrap();
    }

    #[test]
    fn test_largest_tolerance() {
        let policy = TrustPolicy {
            max_grace_period: i64::MAX,
            ..TrustPolicy::default()
        };
        assert_eq!(policy.max_grace_period().num_milliseconds(), i64::MAX);
    }
}
