//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use route_chain::{named, SharedHandler};

/// Labels of handlers in the order they ran.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// A handler that records its label and continues.
    pub fn pass(&self, label: &str) -> SharedHandler {
        let log = self.0.clone();
        let name = label.to_string();
        named(label, move |req, res, next| {
            log.lock().unwrap().push(name.clone());
            next.run(req, res)
        })
    }

    /// A handler that records its label, sets a status and body, and stops.
    pub fn stop(&self, label: &str, status: StatusCode) -> SharedHandler {
        let log = self.0.clone();
        let name = label.to_string();
        named(label, move |_req, res, _next| {
            log.lock().unwrap().push(name.clone());
            res.set_status(status);
            res.set_text(name.clone());
            Ok(())
        })
    }

    /// A handler that records its label and fails.
    pub fn fail(&self, label: &str) -> SharedHandler {
        let log = self.0.clone();
        let name = label.to_string();
        named(label, move |_req, _res, _next| {
            log.lock().unwrap().push(name.clone());
            Err(format!("{} failed", name).into())
        })
    }
}
