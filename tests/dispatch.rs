//! End-to-end dispatch behaviour through the public API.

use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use route_chain::{
    handler_fn, DispatchError, Dispatcher, RegistrationError, Request, ResolveOrder, Response,
    Router, SharedHandler, WriterOutput,
};

mod common;

use common::CallLog;

fn output_of(dispatcher: &Dispatcher, req: Request) -> Result<String, DispatchError> {
    let mut out = WriterOutput::new(Vec::new());
    dispatcher.start(req, &mut out)?;
    Ok(String::from_utf8(out.into_inner()).unwrap())
}

#[test]
fn test_named_segment_resolves_single_handler() {
    let mut router = Router::new();
    router
        .get(
            "/users/:id",
            [handler_fn(|req, res, _next| {
                res.set_text(format!("user {}", req.param("id").unwrap_or("?")));
                Ok(())
            })],
        )
        .unwrap();
    let dispatcher = Dispatcher::new(router);

    let req = Request::new("GET", "/users/42");
    let resolved = dispatcher.resolve(&req);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].params.get("id"), Some("42"));

    let written = output_of(&dispatcher, req).unwrap();
    assert!(written.ends_with("user 42"));
}

#[test]
fn test_unmatched_method_is_route_not_found() {
    let log = CallLog::default();
    let mut api = Router::new();
    api.get("/ping", [log.pass("ping")]).unwrap();
    let mut root = Router::new();
    root.get("/", [log.pass("index")]).unwrap();
    root.mount("/api", api).unwrap();
    let dispatcher = Dispatcher::new(root);

    let req = Request::new("DELETE", "/api/ping");
    assert!(dispatcher.resolve(&req).is_empty());

    match output_of(&dispatcher, req) {
        Err(DispatchError::RouteNotFound { method, path }) => {
            assert_eq!(method, "DELETE");
            assert_eq!(path, "/api/ping");
        }
        other => panic!("expected RouteNotFound, got {:?}", other.map(|_| ())),
    }
    assert!(log.calls().is_empty());
}

#[test]
fn test_short_circuit_in_middle_of_chain() {
    let log = CallLog::default();
    let mut router = Router::new();
    router
        .get(
            "/guarded",
            [
                log.pass("first"),
                log.stop("second", StatusCode::UNAUTHORIZED),
                log.pass("third"),
            ],
        )
        .unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher
        .handle(&mut Request::new("GET", "/guarded"))
        .unwrap();

    assert_eq!(log.calls(), vec!["first", "second"]);
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.body().as_ref(), b"second");
}

#[test]
fn test_mounted_router_with_outer_middleware() {
    let log = CallLog::default();
    let mut api = Router::new();
    api.get("/ping", [log.stop("ping", StatusCode::OK)]).unwrap();

    let mut root = Router::new();
    root.middleware(log.pass("outer-mw"));
    root.mount("/api", api).unwrap();

    let dispatcher = Dispatcher::new(root);
    let req = Request::new("GET", "/api/ping");
    let names: Vec<String> = dispatcher
        .resolve(&req)
        .iter()
        .map(|r| r.name().to_string())
        .collect();
    assert_eq!(names, vec!["outer-mw", "ping"]);

    let written = output_of(&dispatcher, req).unwrap();
    assert!(written.ends_with("ping"));
    assert_eq!(log.calls(), vec!["outer-mw", "ping"]);
}

#[test]
fn test_nested_first_order_puts_mounts_ahead() {
    let log = CallLog::default();
    let mut api = Router::new();
    api.get("/ping", [log.pass("ping")]).unwrap();

    let mut root = Router::new();
    root.middleware(log.pass("outer-mw"));
    root.mount("/api", api).unwrap();

    let dispatcher = Dispatcher::new(root).with_order(ResolveOrder::NestedFirst);
    dispatcher
        .handle(&mut Request::new("GET", "/api/ping"))
        .unwrap();

    assert_eq!(log.calls(), vec!["ping", "outer-mw"]);
}

#[test]
fn test_zero_handlers_fails_at_registration() {
    let mut router = Router::new();
    let err = router
        .route("GET", "/empty", Vec::<SharedHandler>::new())
        .unwrap_err();
    assert!(matches!(err, RegistrationError::NoHandlers { .. }));
    assert!(router.is_empty());
}

#[test]
fn test_handler_error_recovered_by_callback() {
    let log = CallLog::default();
    let mut router = Router::new();
    router
        .post("/orders", [log.pass("auth"), log.fail("create"), log.pass("never")])
        .unwrap();

    let mut dispatcher = Dispatcher::new(router);
    dispatcher
        .on_error(|err, _req, _res| {
            Some(Response::text(StatusCode::SERVICE_UNAVAILABLE, err.to_string()))
        })
        .unwrap();

    let written = output_of(&dispatcher, Request::new("POST", "/orders")).unwrap();
    assert!(written.starts_with("HTTP/1.1 503 Service Unavailable\r\n"));
    assert!(written.ends_with("handler failed: create failed"));
    assert_eq!(log.calls(), vec!["auth", "create"]);
}

#[test]
fn test_callback_keeps_middleware_headers() {
    let mut router = Router::new();
    router.middleware(handler_fn(|req, res, next| {
        res.insert_header(HeaderName::from_static("x-cors"), HeaderValue::from_static("*"));
        res.set_status(StatusCode::ACCEPTED);
        next.run(req, res)
    }));
    router
        .get("/boom", [handler_fn(|_req, _res, _next| Err("boom".into()))])
        .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let record = seen.clone();
    let mut dispatcher = Dispatcher::new(router);
    dispatcher
        .on_error(move |_err, _req, res| {
            *record.lock().unwrap() = Some((res.status(), res.headers().contains_key("x-cors")));
            let mut recovered = res.clone();
            recovered.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            Some(recovered)
        })
        .unwrap();

    let written = output_of(&dispatcher, Request::new("GET", "/boom")).unwrap();

    assert_eq!(*seen.lock().unwrap(), Some((StatusCode::ACCEPTED, true)));
    assert!(written.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(written.contains("x-cors: *\r\n"));
}

#[test]
fn test_handler_error_without_callback_propagates() {
    let log = CallLog::default();
    let mut router = Router::new();
    router.get("/", [log.fail("root")]).unwrap();
    let dispatcher = Dispatcher::new(router);

    match output_of(&dispatcher, Request::new("GET", "/")) {
        Err(DispatchError::Handler(source)) => assert_eq!(source.to_string(), "root failed"),
        other => panic!("expected handler error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_response_mutations_thread_through_chain() {
    let mut router = Router::new();
    router.middleware(handler_fn(|req, res, next| {
        res.set_status(StatusCode::ACCEPTED);
        next.run(req, res)
    }));
    router
        .any(
            "/static/*",
            [handler_fn(|req, res, _next| {
                res.set_text(req.params().rest().unwrap_or_default().to_string());
                Ok(())
            })],
        )
        .unwrap();
    let dispatcher = Dispatcher::new(router);

    let res = dispatcher
        .handle(&mut Request::new("HEAD", "/static/css/site.css"))
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(res.body().as_ref(), b"css/site.css");
}
