//! Scripted vendor clients for tests and host-app development builds.
//!
//! Both mocks count their calls and can be gated on a semaphore so a test
//! can hold a fetch open and observe the controller mid-flight.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::age_signals::{AgeSignalsClient, AgeSignalsResponse};
use crate::declared_age_range::{DeclaredAgeRangeClient, DeclaredAgeRangeResponse};
use crate::error::AgeKitError;

/// Scripted [`AgeSignalsClient`] returning a fixed response.
pub struct MockAgeSignalsClient {
    response: AgeSignalsResponse,
    calls: AtomicU32,
    gate: Option<Arc<Semaphore>>,
}

impl MockAgeSignalsClient {
    /// A mock that resolves immediately with `response`.
    #[must_use]
    pub const fn new(response: AgeSignalsResponse) -> Self {
        Self {
            response,
            calls: AtomicU32::new(0),
            gate: None,
        }
    }

    /// A mock whose calls block until `gate` receives a permit.
    #[must_use]
    pub const fn gated(response: AgeSignalsResponse, gate: Arc<Semaphore>) -> Self {
        Self {
            response,
            calls: AtomicU32::new(0),
            gate: Some(gate),
        }
    }

    /// How many times the vendor call was entered.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgeSignalsClient for MockAgeSignalsClient {
    async fn check_age_signals(&self) -> AgeSignalsResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            // Each call consumes one permit for good, so the test releases
            // held calls one at a time with `add_permits`.
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.response.clone()
    }
}

/// Scripted [`DeclaredAgeRangeClient`] resolving or rejecting on demand.
pub struct MockDeclaredAgeRangeClient {
    outcome: Result<DeclaredAgeRangeResponse, AgeKitError>,
    calls: AtomicU32,
    last_thresholds: Mutex<Option<(u32, u32, u32)>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockDeclaredAgeRangeClient {
    /// A mock that resolves immediately with `response`.
    #[must_use]
    pub const fn new(response: DeclaredAgeRangeResponse) -> Self {
        Self::with_outcome(Ok(response))
    }

    /// A mock whose calls reject with `error`.
    #[must_use]
    pub const fn rejecting(error: AgeKitError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// A mock whose calls block until `gate` receives a permit.
    #[must_use]
    pub const fn gated(
        response: DeclaredAgeRangeResponse,
        gate: Arc<Semaphore>,
    ) -> Self {
        Self {
            outcome: Ok(response),
            calls: AtomicU32::new(0),
            last_thresholds: Mutex::new(None),
            gate: Some(gate),
        }
    }

    const fn with_outcome(
        outcome: Result<DeclaredAgeRangeResponse, AgeKitError>,
    ) -> Self {
        Self {
            outcome,
            calls: AtomicU32::new(0),
            last_thresholds: Mutex::new(None),
            gate: None,
        }
    }

    /// How many times the vendor call was entered.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// The thresholds received by the most recent call, in call order.
    #[must_use]
    pub fn last_thresholds(&self) -> Option<(u32, u32, u32)> {
        *self
            .last_thresholds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DeclaredAgeRangeClient for MockDeclaredAgeRangeClient {
    async fn request_declared_age_range(
        &self,
        first_threshold: u32,
        second_threshold: u32,
        third_threshold: u32,
    ) -> Result<DeclaredAgeRangeResponse, AgeKitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_thresholds
            .lock()
            .unwrap_or_else(PoisonError::into_inner) =
            Some((first_threshold, second_threshold, third_threshold));
        if let Some(gate) = &self.gate {
            // Each call consumes one permit for good, so the test releases
            // held calls one at a time with `add_permits`.
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.outcome.clone()
    }
}
