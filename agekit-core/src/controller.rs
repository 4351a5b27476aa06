//! Fetch orchestration: one unified snapshot per controller, at most one
//! vendor call in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::age_signals::AgeSignalsClient;
use crate::declared_age_range::{AgeRangeThresholds, DeclaredAgeRangeClient};
use crate::defaults;
use crate::error::AgeKitError;
use crate::unified::UnifiedAgeRange;
use crate::Platform;

/// The vendor adapter a controller dispatches to, fixed at construction.
enum VendorAdapter {
    AgeSignals(Arc<dyn AgeSignalsClient>),
    DeclaredAgeRange(Arc<dyn DeclaredAgeRangeClient>),
    /// No adapter exists for the current platform; every fetch settles
    /// into the `"Platform not supported"` result.
    Unsupported,
}

impl VendorAdapter {
    const fn platform(&self) -> Option<Platform> {
        match self {
            Self::AgeSignals(_) => Some(Platform::Android),
            Self::DeclaredAgeRange(_) => Some(Platform::Ios),
            Self::Unsupported => None,
        }
    }
}

/// Observer notified after every settled fetch.
///
/// Implement on the host side to mirror the controller's state into the
/// application's own store without polling [`AgeRangeController::snapshot`].
#[uniffi::export(with_foreign)]
pub trait AgeRangeObserver: Send + Sync {
    /// Called with the fresh snapshot after a successful fetch.
    fn on_result(&self, result: UnifiedAgeRange);
    /// Called with the error message after a failed fetch.
    fn on_error(&self, error: String);
}

/// Construction options for [`AgeRangeController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct ControllerOptions {
    /// Run the first fetch as part of the `init_*` constructors.
    #[uniffi(default = true)]
    pub auto_fetch: bool,
    /// Age thresholds forwarded to the Declared Age Range request.
    /// Consulted on iOS only; defaults to
    /// [`defaults::DEFAULT_AGE_THRESHOLDS`].
    #[uniffi(default = None)]
    pub thresholds: Option<AgeRangeThresholds>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            auto_fetch: true,
            thresholds: None,
        }
    }
}

/// Owns one [`UnifiedAgeRange`] snapshot and the fetch lifecycle around it.
///
/// The platform tag is sampled from the adapter once at construction. The
/// controller never lets a vendor failure escape: every fetch settles into
/// an in-band snapshot.
#[derive(uniffi::Object)]
pub struct AgeRangeController {
    adapter: VendorAdapter,
    thresholds: AgeRangeThresholds,
    observer: Option<Arc<dyn AgeRangeObserver>>,
    state: Mutex<UnifiedAgeRange>,
    // Serializes vendor calls. Holding this across the await is what
    // enforces at-most-one fetch in flight per instance.
    flight: tokio::sync::Mutex<()>,
}

#[uniffi::export(async_runtime = "tokio")]
impl AgeRangeController {
    /// Builds an idle Android controller. No fetch is started.
    #[uniffi::constructor]
    #[must_use]
    pub fn with_age_signals(
        client: Arc<dyn AgeSignalsClient>,
        options: ControllerOptions,
        observer: Option<Arc<dyn AgeRangeObserver>>,
    ) -> Self {
        Self::new(VendorAdapter::AgeSignals(client), options, observer)
    }

    /// Builds an idle iOS controller. No fetch is started.
    #[uniffi::constructor]
    #[must_use]
    pub fn with_declared_age_range(
        client: Arc<dyn DeclaredAgeRangeClient>,
        options: ControllerOptions,
        observer: Option<Arc<dyn AgeRangeObserver>>,
    ) -> Self {
        Self::new(VendorAdapter::DeclaredAgeRange(client), options, observer)
    }

    /// Builds a controller for a platform with no vendor adapter.
    ///
    /// Fetches settle into a result with `error = "Platform not supported"`
    /// rather than failing, preserving the never-throws contract.
    #[uniffi::constructor]
    #[must_use]
    pub fn unsupported(
        options: ControllerOptions,
        observer: Option<Arc<dyn AgeRangeObserver>>,
    ) -> Self {
        Self::new(VendorAdapter::Unsupported, options, observer)
    }

    /// Builds an Android controller and, unless `options.auto_fetch` is
    /// off, runs the first fetch before returning.
    #[uniffi::constructor]
    pub async fn init_age_signals(
        client: Arc<dyn AgeSignalsClient>,
        options: ControllerOptions,
        observer: Option<Arc<dyn AgeRangeObserver>>,
    ) -> Self {
        let controller =
            Self::new(VendorAdapter::AgeSignals(client), options, observer);
        if options.auto_fetch {
            controller.refresh().await;
        }
        controller
    }

    /// Builds an iOS controller and, unless `options.auto_fetch` is off,
    /// runs the first fetch before returning.
    #[uniffi::constructor]
    pub async fn init_declared_age_range(
        client: Arc<dyn DeclaredAgeRangeClient>,
        options: ControllerOptions,
        observer: Option<Arc<dyn AgeRangeObserver>>,
    ) -> Self {
        let controller =
            Self::new(VendorAdapter::DeclaredAgeRange(client), options, observer);
        if options.auto_fetch {
            controller.refresh().await;
        }
        controller
    }

    /// The platform this controller dispatches to, `None` when no adapter
    /// exists.
    #[must_use]
    pub fn platform(&self) -> Option<Platform> {
        self.adapter.platform()
    }

    /// A read-only copy of the currently held result.
    #[must_use]
    pub fn snapshot(&self) -> UnifiedAgeRange {
        self.state_guard().clone()
    }

    /// Whether a fetch is currently outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state_guard().loading
    }

    /// Fetches a fresh result from the vendor and returns the settled
    /// snapshot.
    ///
    /// Concurrency policy: if a fetch is already outstanding, no second
    /// vendor call is started — the call waits for the in-flight fetch to
    /// settle and returns the snapshot it committed. Exactly one vendor
    /// call (and thus at most one vendor UI presentation) runs per
    /// controller at any time.
    pub async fn refresh(&self) -> UnifiedAgeRange {
        if let Ok(guard) = self.flight.try_lock() {
            let unified = self.run_fetch().await;
            drop(guard);
            unified
        } else {
            // Joining an in-flight fetch: once the lock is released the
            // fresh snapshot has been committed.
            drop(self.flight.lock().await);
            self.snapshot()
        }
    }
}

impl AgeRangeController {
    fn new(
        adapter: VendorAdapter,
        options: ControllerOptions,
        observer: Option<Arc<dyn AgeRangeObserver>>,
    ) -> Self {
        let platform = adapter.platform();
        Self {
            adapter,
            thresholds: options
                .thresholds
                .unwrap_or(defaults::DEFAULT_AGE_THRESHOLDS),
            observer,
            state: Mutex::new(UnifiedAgeRange::idle(platform)),
            flight: tokio::sync::Mutex::new(()),
        }
    }

    fn state_guard(&self) -> MutexGuard<'_, UnifiedAgeRange> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One full fetch cycle. Caller must hold the flight lock.
    async fn run_fetch(&self) -> UnifiedAgeRange {
        self.begin_cycle();
        let unified = match &self.adapter {
            VendorAdapter::AgeSignals(client) => {
                client.check_age_signals().await.into()
            }
            VendorAdapter::DeclaredAgeRange(client) => {
                let AgeRangeThresholds {
                    first,
                    second,
                    third,
                } = self.thresholds;
                match client
                    .request_declared_age_range(first, second, third)
                    .await
                {
                    Ok(raw) => raw.into(),
                    Err(err) => {
                        UnifiedAgeRange::failure(Some(Platform::Ios), &err)
                    }
                }
            }
            VendorAdapter::Unsupported => UnifiedAgeRange::failure(
                None,
                &AgeKitError::PlatformNotSupported,
            ),
        };
        self.commit(&unified);
        unified
    }

    /// Marks the held result as loading and clears the previous error; the
    /// data fields keep their prior values until settlement.
    fn begin_cycle(&self) {
        let mut state = self.state_guard();
        state.loading = true;
        state.error = None;
        state.error_code = None;
    }

    /// Replaces the held result wholesale and notifies the observer.
    fn commit(&self, unified: &UnifiedAgeRange) {
        *self.state_guard() = unified.clone();
        match &unified.error {
            Some(message) => {
                log::warn!("age range fetch settled with error: {message}");
                if let Some(observer) = &self.observer {
                    observer.on_error(message.clone());
                }
            }
            None => {
                log::debug!("age range fetch settled: status {:?}", unified.status);
                if let Some(observer) = &self.observer {
                    observer.on_result(unified.clone());
                }
            }
        }
    }
}
