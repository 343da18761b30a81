//! Built-in handlers available to config files.
//!
//! | spec                | behaviour                                  |
//! |---------------------|--------------------------------------------|
//! | `log`               | log the request, continue, log the status  |
//! | `header:NAME=VALUE` | set a response header, continue            |
//! | `status:CODE`       | set the response status, continue          |
//! | `text:BODY`         | set a text body, stop                      |
//! | `echo`              | echo method, path and body, stop           |
//! | `fail:MESSAGE`      | raise an error                             |

use axum::http::{HeaderName, HeaderValue, StatusCode};

use crate::chain::{handler_fn, SharedHandler};
use crate::handlers::registry::HandlerRegistry;

pub fn register_all(registry: &mut HandlerRegistry) {
    registry
        .register("log", |_| Ok(log()))
        .register("header", |arg| header(require(arg)?))
        .register("status", |arg| status(require(arg)?))
        .register("text", |arg| Ok(text(arg.unwrap_or_default())))
        .register("echo", |_| Ok(echo()))
        .register("fail", |arg| Ok(fail(arg.unwrap_or("handler failure"))));
}

fn require(arg: Option<&str>) -> Result<&str, String> {
    arg.filter(|a| !a.trim().is_empty())
        .ok_or_else(|| "argument required".to_string())
}

pub fn log() -> SharedHandler {
    handler_fn(|req, res, next| {
        tracing::info!(
            request_id = %req.id(),
            method = %req.method(),
            path = %req.path(),
            "Request"
        );
        let outcome = next.run(req, res);
        tracing::debug!(
            request_id = %req.id(),
            status = res.status().as_u16(),
            failed = outcome.is_err(),
            "Response"
        );
        outcome
    })
}

pub fn header(arg: &str) -> Result<SharedHandler, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", arg))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| e.to_string())?;
    let value = HeaderValue::from_str(value.trim()).map_err(|e| e.to_string())?;

    Ok(handler_fn(move |req, res, next| {
        res.insert_header(name.clone(), value.clone());
        next.run(req, res)
    }))
}

pub fn status(arg: &str) -> Result<SharedHandler, String> {
    let code: u16 = arg
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a status code", arg))?;
    let status = StatusCode::from_u16(code).map_err(|e| e.to_string())?;

    Ok(handler_fn(move |req, res, next| {
        res.set_status(status);
        next.run(req, res)
    }))
}

pub fn text(body: &str) -> SharedHandler {
    let body = body.to_string();
    handler_fn(move |_req, res, _next| {
        res.set_text(body.clone());
        Ok(())
    })
}

pub fn echo() -> SharedHandler {
    handler_fn(|req, res, _next| {
        let mut body = format!("{} {}\n", req.method(), req.path()).into_bytes();
        body.extend_from_slice(req.body());
        res.set_body(body);
        Ok(())
    })
}

pub fn fail(message: &str) -> SharedHandler {
    let message = message.to_string();
    handler_fn(move |_req, _res, _next| Err(message.clone().into()))
}
