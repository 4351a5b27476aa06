#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Core functionality for AgeKit, a cross-platform age-verification SDK.
//!
//! AgeKit bridges two vendor age services — Google Play Age Signals on
//! Android and Apple Declared Age Range on iOS — into a single unified
//! result shape ([`UnifiedAgeRange`]) with derived predicates, a fetch
//! controller enforcing at-most-one vendor call in flight, and an optional
//! TTL-cached age gate ([`AgeGateService`]).
//!
//! The vendor calls themselves are performed by host-provided adapters
//! ([`AgeSignalsClient`], [`DeclaredAgeRangeClient`]) implemented in
//! Swift/Kotlin and passed across the FFI boundary.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The mobile platform whose vendor service backs a controller instance.
///
/// Sampled once at controller construction and fixed for the lifetime of
/// the instance.
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
pub enum Platform {
    /// Google Play Age Signals.
    Android,
    /// Apple Declared Age Range.
    Ios,
}

mod age_signals;
pub use age_signals::*;

mod declared_age_range;
pub use declared_age_range::*;

mod error;
pub use error::*;

mod unified;
pub use unified::*;

mod controller;
pub use controller::*;

mod service;
pub use service::*;

pub mod defaults;
pub mod logger;
pub mod mock;

uniffi::setup_scaffolding!("agekit_core");
