//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure of a dispatcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::ResolveOrder;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Placement of mounted routers' handlers in the chain.
    pub resolve_order: ResolveOrder,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// HTTP adapter settings.
    pub http: HttpConfig,

    /// Response produced when dispatch fails. Without it, errors propagate.
    pub on_error: Option<ErrorResponseConfig>,

    /// Root-level routes, registered before the mounts.
    pub routes: Vec<RouteConfig>,

    /// Routers mounted at the root.
    pub mounts: Vec<MountConfig>,
}

/// One route: a method token, a path pattern and its handler specs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Method token or `*`.
    #[serde(default = "default_method")]
    pub method: String,

    /// Path pattern, or `*` for every path.
    pub path: String,

    /// Handler specs, run in order.
    pub handlers: Vec<String>,
}

fn default_method() -> String {
    "*".to_string()
}

/// A router mounted under a prefix.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MountConfig {
    /// Path prefix stripped before the nested routes are matched.
    pub prefix: String,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,

    #[serde(default)]
    pub mounts: Vec<MountConfig>,
}

/// Error callback settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ErrorResponseConfig {
    /// Status for handler failures.
    pub status: u16,

    /// Status when no route matched.
    pub not_found_status: u16,

    /// Fixed body. Defaults to the error message.
    pub body: Option<String>,
}

impl Default for ErrorResponseConfig {
    fn default() -> Self {
        Self {
            status: 500,
            not_found_status: 404,
            body: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,

    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "route_chain=info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

/// HTTP adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Largest request body buffered before dispatch.
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
        }
    }
}
