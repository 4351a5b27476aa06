//! The unified cross-platform result shape and its derived predicates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::age_signals::{AgeSignalsResponse, AgeSignalsUserStatus};
use crate::declared_age_range::{
    AgeRangeDeclaration, AgeRangeSharingStatus, DeclaredAgeRangeResponse,
    ParentControls,
};
use crate::defaults;
use crate::error::AgeKitError;
use crate::Platform;

/// The closed union of both vendors' status vocabularies.
///
/// String renderings preserve each vendor's verbatim values, including the
/// Android empty-string sentinel. The two halves never mix: an Android
/// result only ever carries the `SCREAMING_SNAKE_CASE` statuses, an iOS
/// result only `sharing`/`declined`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeStatus {
    /// Android: the user verified their age as an adult.
    Verified,
    /// Android: the account is supervised.
    Supervised,
    /// Android: a supervised-user change is awaiting approval.
    SupervisedApprovalPending,
    /// Android: a supervised-user change was denied.
    SupervisedApprovalDenied,
    /// Android: the service could not determine an age status.
    Unknown,
    /// Android: the vendor's empty-string sentinel.
    #[strum(serialize = "")]
    #[serde(rename = "")]
    Undetermined,
    /// iOS: the user shared their age range.
    #[strum(serialize = "sharing")]
    #[serde(rename = "sharing")]
    Sharing,
    /// iOS: the user declined to share their age range.
    #[strum(serialize = "declined")]
    #[serde(rename = "declined")]
    Declined,
}

impl From<AgeSignalsUserStatus> for AgeStatus {
    fn from(status: AgeSignalsUserStatus) -> Self {
        match status {
            AgeSignalsUserStatus::Verified => Self::Verified,
            AgeSignalsUserStatus::Supervised => Self::Supervised,
            AgeSignalsUserStatus::SupervisedApprovalPending => {
                Self::SupervisedApprovalPending
            }
            AgeSignalsUserStatus::SupervisedApprovalDenied => {
                Self::SupervisedApprovalDenied
            }
            AgeSignalsUserStatus::Unknown => Self::Unknown,
            AgeSignalsUserStatus::Undetermined => Self::Undetermined,
        }
    }
}

impl From<AgeRangeSharingStatus> for AgeStatus {
    fn from(status: AgeRangeSharingStatus) -> Self {
        match status {
            AgeRangeSharingStatus::Sharing => Self::Sharing,
            AgeRangeSharingStatus::Declined => Self::Declined,
        }
    }
}

/// The unified age-range result, one shape for both vendor services.
///
/// Either the error fields or the data fields are populated after a
/// settled fetch, never both. Fields inapplicable to the result's platform
/// are always `None`. The record is replaced wholesale on every fetch
/// cycle, never mutated field by field.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record,
)]
#[serde(rename_all = "camelCase", default)]
pub struct UnifiedAgeRange {
    /// Whether a fetch is currently outstanding. While `true`, the data
    /// fields hold their previous (or initial `None`) values.
    pub loading: bool,
    /// Failure message, from an in-band vendor error or a caught rejection.
    pub error: Option<String>,
    /// Vendor error code; Android in-band failures only.
    pub error_code: Option<i32>,
    /// Vendor status, verbatim.
    pub status: Option<AgeStatus>,
    /// Inclusive lower age bound.
    pub age_lower: Option<u32>,
    /// Inclusive upper age bound.
    pub age_upper: Option<u32>,
    /// Date of the most recent approved supervised-user change
    /// (Android-only, ISO `YYYY-MM-DD`).
    pub most_recent_approval_date: Option<String>,
    /// Parental-control state (iOS-only).
    pub parent_controls: Option<ParentControls>,
    /// Who declared the age range (iOS-only, best-effort).
    pub declaration: Option<AgeRangeDeclaration>,
    /// Per-install identifier (Android-only, supervised users).
    pub install_id: Option<String>,
    /// The platform that produced this result. `None` only in the
    /// "platform not supported" error result.
    pub platform: Option<Platform>,
    /// The raw vendor payload serialized as JSON, retained for debugging
    /// and telemetry.
    pub raw_response: Option<String>,
}

impl UnifiedAgeRange {
    /// An idle result: nothing fetched yet, all data fields empty.
    #[must_use]
    pub fn idle(platform: Option<Platform>) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// A settled failure result carrying only the stringified error.
    ///
    /// This is the path by which vendor rejections (iOS) and the missing
    /// adapter case become in-band data.
    #[must_use]
    pub fn failure(platform: Option<Platform>, error: &AgeKitError) -> Self {
        Self {
            error: Some(error.to_string()),
            platform,
            ..Self::default()
        }
    }

    /// Whether this result gives positive evidence of adulthood.
    ///
    /// Android: `VERIFIED`, or a lower bound at or above `adult_age`.
    /// iOS: a shared range whose lower bound is at or above `adult_age`.
    /// Declined, errored or absent data always answers `false`; absence of
    /// evidence never promotes to adult.
    #[must_use]
    pub fn is_adult(&self, adult_age: u32) -> bool {
        match self.platform {
            Some(Platform::Android) => {
                matches!(self.status, Some(AgeStatus::Verified))
                    || self.age_lower.is_some_and(|lower| lower >= adult_age)
            }
            Some(Platform::Ios) => {
                matches!(self.status, Some(AgeStatus::Sharing))
                    && self.age_lower.is_some_and(|lower| lower >= adult_age)
            }
            None => false,
        }
    }

    /// Whether the account is supervised.
    ///
    /// Android reports this through the `SUPERVISED*` statuses, iOS through
    /// `parent_controls == restricted`. The vocabularies are disjoint and
    /// inapplicable fields are `None`, so one check covers both platforms.
    #[must_use]
    pub const fn is_supervised(&self) -> bool {
        matches!(
            self.status,
            Some(
                AgeStatus::Supervised
                    | AgeStatus::SupervisedApprovalPending
                    | AgeStatus::SupervisedApprovalDenied
            )
        ) || matches!(self.parent_controls, Some(ParentControls::Restricted))
    }

    /// Formats the age range as `"13-15"`, `"18+"` (no upper bound) or
    /// `None` (no lower bound).
    #[must_use]
    pub fn age_range_string(&self) -> Option<String> {
        self.age_lower.map(|lower| {
            self.age_upper.map_or_else(
                || format!("{lower}+"),
                |upper| format!("{lower}-{upper}"),
            )
        })
    }

    /// Serializes the result to a JSON string for host-side telemetry.
    ///
    /// # Errors
    ///
    /// Returns [`AgeKitError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String, AgeKitError> {
        serde_json::to_string(self).map_err(|e| AgeKitError::Serialization {
            message: e.to_string(),
        })
    }
}

impl From<AgeSignalsResponse> for UnifiedAgeRange {
    fn from(raw: AgeSignalsResponse) -> Self {
        let raw_response = serde_json::to_string(&raw).ok();
        if raw.error.is_some() {
            // In-band vendor failure: the error fields pass through and
            // every data field stays empty.
            return Self {
                error: raw.error,
                error_code: raw.error_code,
                platform: Some(Platform::Android),
                raw_response,
                ..Self::default()
            };
        }
        Self {
            loading: false,
            error: None,
            error_code: None,
            status: raw.user_status.map(AgeStatus::from),
            age_lower: raw.age_lower,
            age_upper: raw.age_upper,
            most_recent_approval_date: raw.most_recent_approval_date,
            parent_controls: None,
            declaration: None,
            install_id: raw.install_id,
            platform: Some(Platform::Android),
            raw_response,
        }
    }
}

impl From<DeclaredAgeRangeResponse> for UnifiedAgeRange {
    fn from(raw: DeclaredAgeRangeResponse) -> Self {
        let raw_response = serde_json::to_string(&raw).ok();
        Self {
            loading: false,
            error: None,
            error_code: None,
            status: raw.status.map(AgeStatus::from),
            age_lower: raw.lower_bound,
            age_upper: raw.upper_bound,
            most_recent_approval_date: None,
            parent_controls: raw.parent_controls,
            declaration: raw.declaration,
            install_id: None,
            platform: Some(Platform::Ios),
            raw_response,
        }
    }
}

/// Whether `result` gives positive evidence of adulthood.
///
/// `adult_age` defaults to [`defaults::DEFAULT_ADULT_AGE`].
#[uniffi::export(default(adult_age = None))]
#[must_use]
pub fn is_user_adult(result: UnifiedAgeRange, adult_age: Option<u32>) -> bool {
    result.is_adult(adult_age.unwrap_or(defaults::DEFAULT_ADULT_AGE))
}

/// Whether `result` describes a supervised account.
#[uniffi::export]
#[must_use]
pub fn is_supervised(result: UnifiedAgeRange) -> bool {
    result.is_supervised()
}

/// Formats the age range of `result`; see
/// [`UnifiedAgeRange::age_range_string`].
#[uniffi::export]
#[must_use]
pub fn get_age_range_string(result: UnifiedAgeRange) -> Option<String> {
    result.age_range_string()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn android_supervised() -> AgeSignalsResponse {
        AgeSignalsResponse {
            install_id: Some("abc".to_string()),
            user_status: Some(AgeSignalsUserStatus::Supervised),
            age_lower: Some(13),
            age_upper: Some(15),
            most_recent_approval_date: Some("2026-01-01".to_string()),
            error: None,
            error_code: None,
        }
    }

    #[test]
    fn test_android_verified_adult() {
        let unified = UnifiedAgeRange::from(AgeSignalsResponse {
            user_status: Some(AgeSignalsUserStatus::Verified),
            ..AgeSignalsResponse::default()
        });
        assert_eq!(unified.status, Some(AgeStatus::Verified));
        assert_eq!(unified.platform, Some(Platform::Android));
        assert!(unified.is_adult(18));
        assert!(!unified.is_supervised());
        assert_eq!(unified.age_range_string(), None);
        assert!(unified.error.is_none());
    }

    #[test]
    fn test_android_supervised_child() {
        let unified = UnifiedAgeRange::from(android_supervised());
        assert_eq!(unified.status, Some(AgeStatus::Supervised));
        assert_eq!(unified.age_lower, Some(13));
        assert_eq!(unified.age_upper, Some(15));
        assert_eq!(
            unified.most_recent_approval_date.as_deref(),
            Some("2026-01-01")
        );
        assert_eq!(unified.install_id.as_deref(), Some("abc"));
        assert!(!unified.is_adult(18));
        assert!(unified.is_supervised());
        assert_eq!(unified.age_range_string().as_deref(), Some("13-15"));
    }

    #[test]
    fn test_android_error_clears_all_data_fields() {
        let unified = UnifiedAgeRange::from(AgeSignalsResponse {
            error: Some("AGE_SIGNALS_INIT_ERROR: x".to_string()),
            ..AgeSignalsResponse::default()
        });
        assert_eq!(unified.error.as_deref(), Some("AGE_SIGNALS_INIT_ERROR: x"));
        assert!(unified.status.is_none());
        assert!(unified.age_lower.is_none());
        assert!(unified.age_upper.is_none());
        assert!(unified.install_id.is_none());
        assert!(unified.most_recent_approval_date.is_none());
        assert!(!unified.is_adult(18));
        assert!(!unified.is_supervised());
        assert_eq!(unified.age_range_string(), None);
    }

    #[test]
    fn test_android_error_keeps_vendor_code() {
        let unified = UnifiedAgeRange::from(AgeSignalsResponse {
            error: Some("network error".to_string()),
            error_code: Some(-3),
            ..AgeSignalsResponse::default()
        });
        assert_eq!(unified.error_code, Some(-3));
        assert!(unified.status.is_none());
    }

    #[test]
    fn test_android_error_and_data_mutually_exclusive() {
        // A success-shaped response never carries error fields and vice
        // versa; both directions hold over the normalizer.
        let success = UnifiedAgeRange::from(android_supervised());
        assert!(success.error.is_none() && success.error_code.is_none());

        let failure = UnifiedAgeRange::from(AgeSignalsResponse {
            error: Some("boom".to_string()),
            error_code: Some(-100),
            // Fields a misbehaving adapter might leave populated are still
            // dropped on the error path.
            user_status: Some(AgeSignalsUserStatus::Verified),
            age_lower: Some(18),
            ..AgeSignalsResponse::default()
        });
        assert!(failure.status.is_none());
        assert!(failure.age_lower.is_none());
    }

    #[test]
    fn test_ios_sharing_teen() {
        let unified = UnifiedAgeRange::from(DeclaredAgeRangeResponse {
            status: Some(AgeRangeSharingStatus::Sharing),
            lower_bound: Some(13),
            upper_bound: Some(17),
            declaration: Some(AgeRangeDeclaration::UserDeclared),
            parent_controls: None,
        });
        assert_eq!(unified.status, Some(AgeStatus::Sharing));
        assert_eq!(unified.age_lower, Some(13));
        assert_eq!(unified.age_upper, Some(17));
        assert_eq!(
            unified.declaration,
            Some(AgeRangeDeclaration::UserDeclared)
        );
        assert_eq!(unified.platform, Some(Platform::Ios));
        assert!(!unified.is_adult(18));
        assert_eq!(unified.age_range_string().as_deref(), Some("13-17"));
        // Android-only fields never leak onto the iOS path.
        assert!(unified.install_id.is_none());
        assert!(unified.most_recent_approval_date.is_none());
    }

    #[test]
    fn test_ios_declined() {
        let unified = UnifiedAgeRange::from(DeclaredAgeRangeResponse {
            status: Some(AgeRangeSharingStatus::Declined),
            ..DeclaredAgeRangeResponse::default()
        });
        assert_eq!(unified.status, Some(AgeStatus::Declined));
        assert!(unified.age_lower.is_none());
        assert!(unified.error.is_none());
        assert!(!unified.is_adult(18));
        assert_eq!(unified.age_range_string(), None);
    }

    #[test]
    fn test_ios_sharing_adult() {
        let unified = UnifiedAgeRange::from(DeclaredAgeRangeResponse {
            status: Some(AgeRangeSharingStatus::Sharing),
            lower_bound: Some(18),
            upper_bound: None,
            declaration: None,
            parent_controls: None,
        });
        assert!(unified.is_adult(18));
        assert_eq!(unified.age_range_string().as_deref(), Some("18+"));
    }

    #[test]
    fn test_ios_restricted_is_supervised() {
        let unified = UnifiedAgeRange::from(DeclaredAgeRangeResponse {
            status: Some(AgeRangeSharingStatus::Sharing),
            lower_bound: Some(13),
            upper_bound: Some(15),
            declaration: Some(AgeRangeDeclaration::ParentGuardianDeclared),
            parent_controls: Some(ParentControls::Restricted),
        });
        assert!(unified.is_supervised());
    }

    #[test]
    fn test_ios_bounds_without_sharing_status_never_promote_to_adult() {
        // Status is passed through verbatim, never re-derived from the
        // bounds; without `sharing` the bounds carry no weight.
        let unified = UnifiedAgeRange::from(DeclaredAgeRangeResponse {
            status: None,
            lower_bound: Some(21),
            upper_bound: None,
            declaration: None,
            parent_controls: None,
        });
        assert!(unified.status.is_none());
        assert!(!unified.is_adult(18));
    }

    #[test]
    fn test_all_null_responses_normalize_totally() {
        let android = UnifiedAgeRange::from(AgeSignalsResponse::default());
        assert!(android.error.is_none() && android.status.is_none());
        assert!(!android.is_adult(18));

        let ios = UnifiedAgeRange::from(DeclaredAgeRangeResponse::default());
        assert!(ios.error.is_none() && ios.status.is_none());
        assert!(!ios.is_adult(18));
        assert_eq!(ios.age_range_string(), None);
    }

    #[test]
    fn test_failure_result() {
        let unified = UnifiedAgeRange::failure(
            Some(Platform::Ios),
            &AgeKitError::Generic {
                message: "User cancelled".to_string(),
            },
        );
        assert_eq!(unified.error.as_deref(), Some("User cancelled"));
        assert!(unified.error_code.is_none());
        assert!(unified.status.is_none());
        assert!(!unified.loading);
        assert_eq!(unified.platform, Some(Platform::Ios));
    }

    #[test]
    fn test_raw_response_retains_vendor_payload() {
        let unified = UnifiedAgeRange::from(android_supervised());
        let raw: serde_json::Value =
            serde_json::from_str(unified.raw_response.as_deref().unwrap()).unwrap();
        assert_eq!(raw["userStatus"], "SUPERVISED");
        assert_eq!(raw["ageLower"], 13);
    }

    #[test]
    fn test_status_strings_stay_verbatim() {
        assert_eq!(AgeStatus::Verified.to_string(), "VERIFIED");
        assert_eq!(AgeStatus::Undetermined.to_string(), "");
        assert_eq!(AgeStatus::Sharing.to_string(), "sharing");
        assert_eq!(
            serde_json::to_string(&AgeStatus::SupervisedApprovalDenied).unwrap(),
            "\"SUPERVISED_APPROVAL_DENIED\""
        );
        assert_eq!(serde_json::to_string(&AgeStatus::Undetermined).unwrap(), "\"\"");
    }

    #[test_case(Some(AgeSignalsUserStatus::Verified), None, true; "verified without bounds")]
    #[test_case(Some(AgeSignalsUserStatus::Supervised), Some(18), true; "supervised lower at threshold")]
    #[test_case(Some(AgeSignalsUserStatus::Supervised), Some(17), false; "supervised lower below threshold")]
    #[test_case(Some(AgeSignalsUserStatus::Unknown), None, false; "unknown")]
    #[test_case(Some(AgeSignalsUserStatus::Undetermined), None, false; "empty sentinel")]
    #[test_case(None, None, false; "absent status")]
    fn test_android_adult_matrix(
        user_status: Option<AgeSignalsUserStatus>,
        age_lower: Option<u32>,
        expected: bool,
    ) {
        let unified = UnifiedAgeRange::from(AgeSignalsResponse {
            user_status,
            age_lower,
            ..AgeSignalsResponse::default()
        });
        assert_eq!(unified.is_adult(18), expected);
    }

    #[test_case(None, None, None; "no bounds")]
    #[test_case(Some(16), None, Some("16+"); "lower only")]
    #[test_case(Some(13), Some(15), Some("13-15"); "both bounds")]
    fn test_age_range_string_matrix(
        age_lower: Option<u32>,
        age_upper: Option<u32>,
        expected: Option<&str>,
    ) {
        let unified = UnifiedAgeRange {
            age_lower,
            age_upper,
            platform: Some(Platform::Android),
            ..UnifiedAgeRange::default()
        };
        assert_eq!(unified.age_range_string().as_deref(), expected);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let unified = UnifiedAgeRange::from(android_supervised());
        assert_eq!(unified.age_range_string(), unified.age_range_string());
        assert_eq!(unified.is_adult(18), unified.is_adult(18));
    }

    #[test]
    fn test_exported_helpers_match_methods() {
        let unified = UnifiedAgeRange::from(android_supervised());
        assert!(!is_user_adult(unified.clone(), None));
        assert!(is_supervised(unified.clone()));
        assert_eq!(
            get_age_range_string(unified.clone()),
            unified.age_range_string()
        );
    }

    #[test]
    fn test_to_json_round_trips() {
        let unified = UnifiedAgeRange::from(android_supervised());
        let json = unified.to_json().unwrap();
        let back: UnifiedAgeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unified);
    }
}
