//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → fmt subscriber (stderr; pretty, compact or JSON)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Request ID is a field of the `dispatch` span, so every event inside a
//!   cycle carries it
//! - No recorder is installed here; without one, metric updates are no-ops

pub mod logging;
pub mod metrics;
