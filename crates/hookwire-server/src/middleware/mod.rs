//! Middleware for the webhook router.
//!
//! ```rust,ignore
//! let app = listener
//!     .into_router()
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;

pub use observability::{RouterObservabilityExt, SENSITIVE_HEADERS};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
