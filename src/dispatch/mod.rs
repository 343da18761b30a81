//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → dispatcher.rs (resolve, run chain, recover)
//!     → Response → Output
//!
//! On reload:
//!     DispatchConfig → Dispatcher::from_config
//!     → shared.rs (atomic swap, in-flight requests keep the old one)
//! ```

pub mod dispatcher;
pub mod shared;

pub use dispatcher::{Dispatcher, ErrorHandler};
pub use shared::SharedDispatcher;
