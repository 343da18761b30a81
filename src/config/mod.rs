//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DispatchConfig (validated, immutable)
//!     → Dispatcher::from_config (with a HandlerRegistry)
//!
//! On file change (write or rename-over):
//!     watcher.rs detects change in the parent directory
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → Result sent on the update channel
//!     → SharedDispatcher swaps in a freshly built dispatcher, or logs why not
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DispatchConfig, ErrorResponseConfig, HttpConfig, LogFormat, LoggingConfig, MountConfig,
    RouteConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::{ConfigUpdate, ConfigWatcher};
