//! Android vendor surface: the Google Play Age Signals service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// User status reported by the Age Signals API.
///
/// The vendor reports two distinct "age not determinable" sentinels — the
/// literal string `UNKNOWN` and the empty string. They are preserved as
/// separate variants because the vendor does not document them as
/// equivalent.
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
pub enum AgeSignalsUserStatus {
    /// The user verified their age as an adult.
    Verified,
    /// The account is supervised (e.g. Family Link).
    Supervised,
    /// A supervised-user change is awaiting parental approval.
    SupervisedApprovalPending,
    /// A supervised-user change was denied by the parent.
    SupervisedApprovalDenied,
    /// The service could not determine an age status.
    Unknown,
    /// The vendor's empty-string sentinel for an undetermined status.
    #[strum(serialize = "")]
    #[serde(rename = "")]
    Undetermined,
}

/// Vendor-defined error codes carried in [`AgeSignalsResponse::error_code`].
///
/// The Age Signals call never rejects; these negative integers are how the
/// service reports its failure modes in-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AgeSignalsErrorCode {
    /// The Age Signals API is not available on this device (`-1`).
    ApiNotAvailable,
    /// The Play Store app was not found (`-2`).
    PlayStoreNotFound,
    /// A network error prevented reaching the service (`-3`).
    NetworkError,
    /// Play services are outdated and must be updated (`-4`).
    PlayServicesOutdated,
    /// A transient error occurred; the call may be retried later (`-5`).
    TransientError,
    /// The calling app was not installed through the Play Store (`-6`).
    AppNotStoreInstalled,
    /// No Play Store account was found on the device (`-7`).
    PlayStoreAccountNotFound,
    /// The service rejected the call for making too many requests (`-8`).
    TooManyRequests,
    /// The service process could not be bound (`-9`).
    CannotBindToService,
    /// An internal error occurred inside the service (`-100`).
    InternalError,
}

impl AgeSignalsErrorCode {
    /// Looks up the documented error for a raw vendor code.
    ///
    /// Returns `None` for codes outside the documented set, which the
    /// vendor reserves the right to add.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::ApiNotAvailable),
            -2 => Some(Self::PlayStoreNotFound),
            -3 => Some(Self::NetworkError),
            -4 => Some(Self::PlayServicesOutdated),
            -5 => Some(Self::TransientError),
            -6 => Some(Self::AppNotStoreInstalled),
            -7 => Some(Self::PlayStoreAccountNotFound),
            -8 => Some(Self::TooManyRequests),
            -9 => Some(Self::CannotBindToService),
            -100 => Some(Self::InternalError),
            _ => None,
        }
    }

    /// The raw integer code the vendor reports for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ApiNotAvailable => -1,
            Self::PlayStoreNotFound => -2,
            Self::NetworkError => -3,
            Self::PlayServicesOutdated => -4,
            Self::TransientError => -5,
            Self::AppNotStoreInstalled => -6,
            Self::PlayStoreAccountNotFound => -7,
            Self::TooManyRequests => -8,
            Self::CannotBindToService => -9,
            Self::InternalError => -100,
        }
    }
}

/// Raw result of one Age Signals check, as delivered by the Android adapter.
///
/// Either the error fields or the data fields are populated, never both;
/// the service does not produce partial successes.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record,
)]
#[serde(rename_all = "camelCase", default)]
pub struct AgeSignalsResponse {
    /// Stable per-install identifier; present only for supervised users.
    pub install_id: Option<String>,
    /// The reported user status.
    pub user_status: Option<AgeSignalsUserStatus>,
    /// Inclusive lower age bound; present only for supervised users.
    pub age_lower: Option<u32>,
    /// Inclusive upper age bound; present only for supervised users.
    pub age_upper: Option<u32>,
    /// ISO `YYYY-MM-DD` date of the most recent approved supervised-user
    /// change, if any.
    pub most_recent_approval_date: Option<String>,
    /// In-band failure message.
    pub error: Option<String>,
    /// In-band failure code; see [`AgeSignalsErrorCode`].
    pub error_code: Option<i32>,
}

/// Platform adapter for the Google Play Age Signals service.
///
/// Implemented by the host Android app and handed across the FFI boundary.
/// The call never fails: every failure mode surfaces in-band through the
/// `error`/`error_code` fields of the response.
#[uniffi::export(with_foreign)]
#[async_trait]
pub trait AgeSignalsClient: Send + Sync {
    /// Checks the age signals for the current user.
    ///
    /// May suspend for as long as the vendor SDK needs, including while a
    /// consent dialog is on screen.
    async fn check_age_signals(&self) -> AgeSignalsResponse;
}
