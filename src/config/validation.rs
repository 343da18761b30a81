//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check method tokens and path patterns of every route and mount
//! - Reject routes without handlers and out-of-range status codes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Handler specs are checked when the dispatcher is built, against a registry

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::{DispatchConfig, MountConfig, RouteConfig};
use crate::routing::entry::validate_pattern;
use crate::routing::MethodPattern;

/// A semantic problem in a config, with its location.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{location}: unknown method `{method}`")]
    UnknownMethod { location: String, method: String },

    #[error("{location}: invalid path pattern `{path}`")]
    InvalidPath { location: String, path: String },

    #[error("{location}: no handlers")]
    NoHandlers { location: String },

    #[error("{location}: empty handler spec")]
    EmptyHandlerSpec { location: String },

    #[error("{location}: invalid mount prefix `{prefix}`")]
    InvalidPrefix { location: String, prefix: String },

    #[error("on_error.{field}: invalid status code {code}")]
    InvalidStatus { field: &'static str, code: u16 },
}

/// Check a config, collecting every error.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(on_error) = &config.on_error {
        for (field, code) in [
            ("status", on_error.status),
            ("not_found_status", on_error.not_found_status),
        ] {
            if StatusCode::from_u16(code).is_err() {
                errors.push(ValidationError::InvalidStatus { field, code });
            }
        }
    }

    validate_level(&config.routes, &config.mounts, "", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_level(
    routes: &[RouteConfig],
    mounts: &[MountConfig],
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    for (i, route) in routes.iter().enumerate() {
        let location = format!("{}routes[{}]", location, i);

        if route.method.parse::<MethodPattern>().is_err() {
            errors.push(ValidationError::UnknownMethod {
                location: location.clone(),
                method: route.method.clone(),
            });
        }
        if validate_pattern(&route.path).is_err() {
            errors.push(ValidationError::InvalidPath {
                location: location.clone(),
                path: route.path.clone(),
            });
        }
        if route.handlers.is_empty() {
            errors.push(ValidationError::NoHandlers {
                location: location.clone(),
            });
        }
        if route.handlers.iter().any(|h| h.trim().is_empty()) {
            errors.push(ValidationError::EmptyHandlerSpec { location });
        }
    }

    for (i, mount) in mounts.iter().enumerate() {
        let location = format!("{}mounts[{}]", location, i);

        if validate_pattern(&mount.prefix).is_err() {
            errors.push(ValidationError::InvalidPrefix {
                location: location.clone(),
                prefix: mount.prefix.clone(),
            });
        }
        validate_level(&mount.routes, &mount.mounts, &format!("{}.", location), errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ErrorResponseConfig;

    fn route(method: &str, path: &str, handlers: &[&str]) -> RouteConfig {
        RouteConfig {
            method: method.into(),
            path: path.into(),
            handlers: handlers.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&DispatchConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = DispatchConfig {
            routes: vec![route("BREW", "/", &["log"]), route("GET", "nope", &[])],
            mounts: vec![MountConfig {
                prefix: "api".into(),
                routes: vec![route("get", "/ping", &[" "])],
                mounts: vec![],
            }],
            on_error: Some(ErrorResponseConfig {
                status: 42,
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidStatus {
                    field: "status",
                    code: 42
                },
                ValidationError::UnknownMethod {
                    location: "routes[0]".into(),
                    method: "BREW".into()
                },
                ValidationError::InvalidPath {
                    location: "routes[1]".into(),
                    path: "nope".into()
                },
                ValidationError::NoHandlers {
                    location: "routes[1]".into()
                },
                ValidationError::InvalidPrefix {
                    location: "mounts[0]".into(),
                    prefix: "api".into()
                },
                ValidationError::EmptyHandlerSpec {
                    location: "mounts[0].routes[0]".into()
                },
            ]
        );
    }
}
