//! A TTL-cached, three-way age gate on top of the fetch controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::controller::AgeRangeController;
use crate::defaults;
use crate::unified::UnifiedAgeRange;

/// The collapsed age-gate outcome.
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
pub enum AgeGateStatus {
    /// Positive evidence of adulthood.
    Adult,
    /// Positive evidence of a minor or supervised account.
    Child,
    /// No usable evidence: declined, undetermined or errored.
    Unknown,
}

struct CacheEntry {
    status: AgeGateStatus,
    fetched_at: u64,
}

/// Collapses the unified result into an [`AgeGateStatus`] and caches it.
///
/// Cache entries expire by wall-clock age only; the service cannot observe
/// platform account switches. The clock is an explicit parameter on the
/// cache decision ([`Self::status_at`]) so the TTL is testable with a fake
/// clock; the exported [`Self::status`] samples system time.
#[derive(uniffi::Object)]
pub struct AgeGateService {
    controller: Arc<AgeRangeController>,
    adult_age: u32,
    ttl_seconds: u64,
    cache: Mutex<Option<CacheEntry>>,
}

#[uniffi::export(async_runtime = "tokio")]
impl AgeGateService {
    /// Builds a service over `controller`.
    ///
    /// `ttl_seconds` defaults to [`defaults::DEFAULT_CACHE_TTL_SECONDS`]
    /// and `adult_age` to [`defaults::DEFAULT_ADULT_AGE`].
    #[uniffi::constructor(default(ttl_seconds = None, adult_age = None))]
    #[must_use]
    pub fn new(
        controller: Arc<AgeRangeController>,
        ttl_seconds: Option<u64>,
        adult_age: Option<u32>,
    ) -> Self {
        Self {
            controller,
            adult_age: adult_age.unwrap_or(defaults::DEFAULT_ADULT_AGE),
            ttl_seconds: ttl_seconds
                .unwrap_or(defaults::DEFAULT_CACHE_TTL_SECONDS),
            cache: Mutex::new(None),
        }
    }

    /// Returns the age-gate status, fetching from the vendor only when the
    /// cached entry is stale or `force_refresh` is set.
    pub async fn status(&self, force_refresh: bool) -> AgeGateStatus {
        self.status_at(force_refresh, unix_now()).await
    }
}

impl AgeGateService {
    /// Clock-injected variant of [`Self::status`]; `now` is seconds since
    /// the Unix epoch.
    pub async fn status_at(&self, force_refresh: bool, now: u64) -> AgeGateStatus {
        if !force_refresh {
            if let Some(entry) = self.cache_guard().as_ref() {
                if now.saturating_sub(entry.fetched_at) < self.ttl_seconds {
                    return entry.status;
                }
            }
        }

        let unified = self.controller.refresh().await;
        let status = Self::classify(&unified, self.adult_age);
        log::debug!("age gate refreshed: {status}");
        *self.cache_guard() = Some(CacheEntry {
            status,
            fetched_at: now,
        });
        status
    }

    /// The cached status, if one exists and is still fresh at `now`.
    #[must_use]
    pub fn cached_status_at(&self, now: u64) -> Option<AgeGateStatus> {
        self.cache_guard().as_ref().and_then(|entry| {
            (now.saturating_sub(entry.fetched_at) < self.ttl_seconds)
                .then_some(entry.status)
        })
    }

    fn cache_guard(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn classify(result: &UnifiedAgeRange, adult_age: u32) -> AgeGateStatus {
        if result.error.is_some() {
            return AgeGateStatus::Unknown;
        }
        if result.is_adult(adult_age) {
            return AgeGateStatus::Adult;
        }
        // A shared or supervised range below the adult threshold is
        // positive evidence of a minor; anything else stays unknown.
        if result.age_lower.is_some() || result.is_supervised() {
            return AgeGateStatus::Child;
        }
        AgeGateStatus::Unknown
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
