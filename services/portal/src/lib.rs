//! Community portal core library crate.
//!
//! # Purpose
//! Exposes the data access gateway, entity model, document-store backends,
//! session role detection, onboarding wizard and permission-gated actions
//! consumed by the presentation layer.
//!
//! # Notes
//! Role and permission rules live in the `hoa-authz` crate; this crate only
//! consults them.
pub mod actions;
pub mod config;
pub mod fixtures;
pub mod gateway;
pub mod model;
pub mod observability;
pub mod onboarding;
pub mod session;
pub mod store;

pub use actions::{ActionError, ActionResult, Portal};
pub use gateway::{DataGateway, DataMode, GatewayError, GatewayTimeouts};
pub use session::{Identity, RegistrationStatus, Session};
