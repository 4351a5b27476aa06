use thiserror::Error;

/// Error outputs from AgeKit.
///
/// Only vendor adapters and serialization produce error values; the fetch
/// controller converts every one of them into in-band result data, so
/// nothing here ever reaches a consumer as a thrown error.
#[derive(Debug, Clone, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum AgeKitError {
    /// The host OS version does not provide the Declared Age Range API.
    #[error("IOS_VERSION_ERROR: {message}")]
    IosVersion {
        /// Detail reported by the adapter.
        message: String,
    },
    /// The vendor SDK is not linked or not available at runtime.
    #[error("SDK_NOT_AVAILABLE: {message}")]
    SdkNotAvailable {
        /// Detail reported by the adapter.
        message: String,
    },
    /// No view controller was available to present the vendor consent UI.
    #[error("VIEW_CONTROLLER_ERROR: {message}")]
    ViewController {
        /// Detail reported by the adapter.
        message: String,
    },
    /// The vendor age-range request itself failed.
    #[error("AGE_RANGE_ERROR: {message}")]
    AgeRange {
        /// Detail reported by the adapter.
        message: String,
    },
    /// No vendor adapter exists for the current platform.
    #[error("Platform not supported")]
    PlatformNotSupported,
    /// Unexpected error serializing information.
    #[error("serialization_error: {message}")]
    Serialization {
        /// Detail from the serializer.
        message: String,
    },
    /// Any other failure surfaced by a vendor adapter.
    #[error("{message}")]
    Generic {
        /// The failure message, passed through verbatim.
        message: String,
    },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for AgeKitError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Generic {
            message: error.reason,
        }
    }
}
