//! TTL behavior of the age-gate service, driven with a fake clock.

use std::sync::Arc;

use agekit_core::mock::{MockAgeSignalsClient, MockDeclaredAgeRangeClient};
use agekit_core::{
    AgeGateService, AgeGateStatus, AgeKitError, AgeRangeController,
    AgeSignalsResponse, AgeSignalsUserStatus, ControllerOptions,
};

const T0: u64 = 1_700_000_000;

fn manual_options() -> ControllerOptions {
    ControllerOptions {
        auto_fetch: false,
        thresholds: None,
    }
}

fn verified_controller() -> (Arc<MockAgeSignalsClient>, Arc<AgeRangeController>) {
    let client = Arc::new(MockAgeSignalsClient::new(AgeSignalsResponse {
        user_status: Some(AgeSignalsUserStatus::Verified),
        ..AgeSignalsResponse::default()
    }));
    let controller = Arc::new(AgeRangeController::with_age_signals(
        client.clone(),
        manual_options(),
        None,
    ));
    (client, controller)
}

#[tokio::test]
async fn test_fresh_entry_skips_the_vendor() {
    let (client, controller) = verified_controller();
    let service = AgeGateService::new(controller, None, None);

    assert_eq!(service.status_at(false, T0).await, AgeGateStatus::Adult);
    assert_eq!(client.call_count(), 1);

    // One second before expiry of the default 30 minute TTL.
    let status = service.status_at(false, T0 + 30 * 60 - 1).await;
    assert_eq!(status, AgeGateStatus::Adult);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_stale_entry_refetches() {
    let (client, controller) = verified_controller();
    let service = AgeGateService::new(controller, None, None);

    service.status_at(false, T0).await;
    service.status_at(false, T0 + 30 * 60).await;
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_force_refresh_bypasses_ttl() {
    let (client, controller) = verified_controller();
    let service = AgeGateService::new(controller, None, None);

    service.status_at(false, T0).await;
    service.status_at(true, T0 + 1).await;
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_configured_ttl() {
    let (client, controller) = verified_controller();
    let service = AgeGateService::new(controller, Some(60), None);

    service.status_at(false, T0).await;
    assert_eq!(client.call_count(), 1);
    service.status_at(false, T0 + 59).await;
    assert_eq!(client.call_count(), 1);
    service.status_at(false, T0 + 60).await;
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_cached_status_visibility() {
    let (_client, controller) = verified_controller();
    let service = AgeGateService::new(controller, Some(60), None);

    assert_eq!(service.cached_status_at(T0), None);
    service.status_at(false, T0).await;
    assert_eq!(service.cached_status_at(T0 + 30), Some(AgeGateStatus::Adult));
    assert_eq!(service.cached_status_at(T0 + 60), None);
}

#[tokio::test]
async fn test_unknown_outcomes_are_cached_too() {
    // Wall-clock age is the only invalidation rule; an errored fetch is
    // held for the full TTL like any other outcome.
    let client = Arc::new(MockDeclaredAgeRangeClient::rejecting(
        AgeKitError::Generic {
            message: "User cancelled".to_string(),
        },
    ));
    let controller = Arc::new(AgeRangeController::with_declared_age_range(
        client.clone(),
        manual_options(),
        None,
    ));
    let service = AgeGateService::new(controller, None, None);

    assert_eq!(service.status_at(false, T0).await, AgeGateStatus::Unknown);
    assert_eq!(service.status_at(false, T0 + 10).await, AgeGateStatus::Unknown);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_configured_adult_age() {
    let client = Arc::new(MockAgeSignalsClient::new(AgeSignalsResponse {
        user_status: Some(AgeSignalsUserStatus::Supervised),
        age_lower: Some(16),
        age_upper: Some(17),
        ..AgeSignalsResponse::default()
    }));
    let controller = Arc::new(AgeRangeController::with_age_signals(
        client,
        manual_options(),
        None,
    ));
    let service = AgeGateService::new(controller, None, Some(16));

    assert_eq!(service.status_at(false, T0).await, AgeGateStatus::Adult);
}
