//! Default configuration values shared across the SDK surface.

use crate::declared_age_range::AgeRangeThresholds;

/// Age at or above which a user counts as an adult, unless the caller
/// configures otherwise.
pub const DEFAULT_ADULT_AGE: u32 = 18;

/// Default thresholds forwarded to the Declared Age Range request.
pub const DEFAULT_AGE_THRESHOLDS: AgeRangeThresholds = AgeRangeThresholds {
    first: 13,
    second: 15,
    third: 18,
};

/// Default time-to-live for the age-gate cache: 30 minutes.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 30 * 60;
