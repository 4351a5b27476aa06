//! iOS vendor surface: the Apple Declared Age Range service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::AgeKitError;

/// Whether the user agreed to share their age range.
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
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AgeRangeSharingStatus {
    /// The user shared their age range; the bounds are populated.
    Sharing,
    /// The user declined to share. A valid terminal state, not an error.
    Declined,
}

/// Who declared the age range the service reports.
///
/// Best-effort: the vendor does not guarantee this is populated even when
/// the status is `sharing`.
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
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AgeRangeDeclaration {
    /// The user declared their own age.
    UserDeclared,
    /// A parent or guardian declared the age.
    ParentGuardianDeclared,
    /// An organizer (e.g. a managed Apple ID) declared the age.
    OrganizerDeclared,
    /// The declaration source is not known.
    Unknown,
}

/// Parental-control state reported alongside the age range.
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
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParentControls {
    /// The account is restricted by parental controls.
    Restricted,
}

/// The three age thresholds forwarded to the Declared Age Range request.
///
/// Passed to the adapter in the order `first, second, third`, exactly as
/// configured; any sorting is the vendor SDK's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct AgeRangeThresholds {
    /// First threshold.
    pub first: u32,
    /// Second threshold.
    pub second: u32,
    /// Third threshold.
    pub third: u32,
}

/// Raw result of one Declared Age Range request, as delivered by the iOS
/// adapter.
///
/// Failure is not represented in-band here; a failing vendor call rejects
/// with an [`AgeKitError`] instead, which the fetch controller converts
/// into unified result data.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record,
)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclaredAgeRangeResponse {
    /// Whether the user shared their age range.
    pub status: Option<AgeRangeSharingStatus>,
    /// Inclusive lower age bound; present only when sharing.
    pub lower_bound: Option<u32>,
    /// Inclusive upper age bound; present only when sharing.
    pub upper_bound: Option<u32>,
    /// Who declared the age range, when the vendor reports it.
    pub declaration: Option<AgeRangeDeclaration>,
    /// Parental-control state, when the vendor reports it.
    pub parent_controls: Option<ParentControls>,
}

/// Platform adapter for the Apple Declared Age Range service.
///
/// Implemented by the host iOS app and handed across the FFI boundary.
/// Requires a foreground app state capable of presenting system UI; the
/// adapter owns that interactive lifecycle.
#[uniffi::export(with_foreign)]
#[async_trait]
pub trait DeclaredAgeRangeClient: Send + Sync {
    /// Requests the user's declared age range against three thresholds.
    ///
    /// # Errors
    ///
    /// Rejects with [`AgeKitError::IosVersion`],
    /// [`AgeKitError::SdkNotAvailable`], [`AgeKitError::ViewController`] or
    /// [`AgeKitError::AgeRange`] when the vendor call cannot complete.
    async fn request_declared_age_range(
        &self,
        first_threshold: u32,
        second_threshold: u32,
        third_threshold: u32,
    ) -> Result<DeclaredAgeRangeResponse, AgeKitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharing_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AgeRangeSharingStatus::Sharing).unwrap(),
            "\"sharing\""
        );
        assert_eq!(AgeRangeSharingStatus::Declined.to_string(), "declined");
    }

    #[test]
    fn test_declaration_serialization() {
        assert_eq!(
            serde_json::to_string(&AgeRangeDeclaration::ParentGuardianDeclared)
                .unwrap(),
            "\"parent_guardian_declared\""
        );
        let parsed: AgeRangeDeclaration = "organizer_declared".parse().unwrap();
        assert_eq!(parsed, AgeRangeDeclaration::OrganizerDeclared);
    }

    #[test]
    fn test_response_parses_vendor_payload() {
        let response: DeclaredAgeRangeResponse = serde_json::from_str(
            r#"{"status":"sharing","lowerBound":13,"upperBound":17,"declaration":"user_declared"}"#,
        )
        .unwrap();
        assert_eq!(response.status, Some(AgeRangeSharingStatus::Sharing));
        assert_eq!(response.lower_bound, Some(13));
        assert_eq!(response.upper_bound, Some(17));
        assert_eq!(
            response.declaration,
            Some(AgeRangeDeclaration::UserDeclared)
        );
        assert!(response.parent_controls.is_none());
    }
}
