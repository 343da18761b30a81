//! HTTP method tokens and method patterns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Methods accepted at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Options,
    Delete,
    Head,
    Update,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Post,
        Method::Options,
        Method::Delete,
        Method::Head,
        Method::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Options => "OPTIONS",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Update => "UPDATE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RegistrationError::UnknownMethod(s.to_string()))
    }
}

/// The method half of a route entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPattern {
    /// `*`: any method.
    Any,
    Exact(Method),
}

impl MethodPattern {
    /// Case-insensitive comparison against the request's method.
    pub fn matches(&self, method: &str) -> bool {
        match self {
            MethodPattern::Any => true,
            MethodPattern::Exact(m) => m.as_str().eq_ignore_ascii_case(method),
        }
    }
}

impl From<Method> for MethodPattern {
    fn from(method: Method) -> Self {
        MethodPattern::Exact(method)
    }
}

impl FromStr for MethodPattern {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "*" {
            return Ok(MethodPattern::Any);
        }
        s.trim().parse().map(MethodPattern::Exact)
    }
}

impl fmt::Display for MethodPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodPattern::Any => f.write_str("*"),
            MethodPattern::Exact(m) => m.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Update".parse::<Method>().unwrap(), Method::Update);
        assert_eq!(Method::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn test_unknown_method_rejected() {
        let err = "BREW".parse::<Method>().unwrap_err();
        assert_eq!(err, RegistrationError::UnknownMethod("BREW".into()));
    }

    #[test]
    fn test_pattern_matching() {
        let any: MethodPattern = "*".parse().unwrap();
        assert!(any.matches("PATCH"));

        let get: MethodPattern = "GET".parse().unwrap();
        assert!(get.matches("get"));
        assert!(get.matches("GET"));
        assert!(!get.matches("POST"));
    }
}
