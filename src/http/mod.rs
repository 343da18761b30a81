//! HTTP collaborators of the dispatcher.
//!
//! # Data Flow
//! ```text
//! axum request
//!     → service.rs (buffer body, request ID)
//!     → request.rs (Request value object)
//!     → [dispatcher resolves and runs the chain]
//!     → response.rs (Response value object)
//!     → output.rs (status, headers, body) or axum response
//! ```

pub mod output;
pub mod request;
pub mod response;
pub mod service;

pub use output::{Output, WriterOutput};
pub use request::{Request, X_REQUEST_ID};
pub use response::Response;
pub use service::{into_axum_router, DispatchService};
