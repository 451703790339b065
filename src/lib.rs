//! Session, Draft-Form, and Guard Core for the VenueKit Booking Client
//!
//! The non-UI core of a mobile client for booking sports venues: an
//! authenticated session store with a one-shot bootstrap latch, a persisted
//! multi-step property-listing draft, declarative per-step validation, and
//! navigation guards that allow or redirect based on session state.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // 1. Wire the context once at startup
//! let context = AppContext::new(gateway, storage, Arc::new(TracingObserver), client);
//! context.initialize().await;
//!
//! // 2. Guard navigations
//! match auth_guard(&context.auth, &target).await {
//!     GuardDecision::Allowed => { /* proceed */ }
//!     GuardDecision::Redirect(to) => { /* navigate to `to` */ }
//! }
//!
//! // 3. Edit and validate the listing draft
//! context.form.update_basic_info(patch).await;
//! let validation = StepValidation::new(&context.form);
//! let next = validation.next_invalid_step();
//! ```

#![warn(missing_docs)]

// === Core Types ===
mod context;
mod draft;
mod model;

// === Stores ===
mod auth;
mod form;

// === Validation ===
mod rules;
mod schema;
mod wizard;

// === Navigation ===
mod guards;

// === Seams ===
mod gateway;
mod storage;

// === Observability ===
mod observer;

// === Test Harness ===
#[cfg(feature = "test-harness")]
pub mod harness;

// === Re-exports ===

// Context
pub use context::AppContext;

// Data model
pub use draft::{
    AdditionalFees, BasicInfo, BasicInfoPatch, BookingAndPricing, BookingMode,
    CancellationPolicy, Discounts, Media, MediaPatch, OpeningHours, PricingModel, PricingPatch,
    PropertyDetail, PropertyDetailPatch, PropertyDraft, SectionPatch, Step,
    TimingAndAvailability, TimingPatch,
};
pub use model::{
    Event, EventFilter, LoginRequest, ReferenceItem, RegisterRequest, ResetPasswordRequest, Role,
    Team, TokenResponse, User,
};

// Stores
pub use auth::{AuthError, AuthSession, ClientCredentials};
pub use form::FormSession;

// Validation
pub use rules::{is_email, is_hh_mm, is_phone, is_url, Violations};
pub use schema::{
    check_basic_info, check_draft, check_media, check_pricing, check_property_detail,
    check_step, check_step_number, check_timing, StepReport,
};
pub use wizard::StepValidation;

// Navigation
pub use guards::{
    auth_guard, guest_guard, role_guard, run_guards, GuardDecision, GuardFuture, RouteTarget,
};

// Seams
pub use gateway::{paths as api_paths, ApiConfig, ApiGateway, GatewayError, InMemoryGateway};
pub use storage::{keys, InMemoryStore, JsonFileStore, KeyValueStore, StorageError};

// Observability
pub use observer::{NoOpObserver, SessionObserver, TracingObserver};
