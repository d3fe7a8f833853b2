//! End-to-end dispatch tests through the in-memory test client.

use std::sync::{Arc, Mutex};

use serde_json::json;
use wyne::prelude::*;
use wyne_test::TestClient;

type Trace = Arc<Mutex<Vec<String>>>;

fn recorder(trace: &Trace, label: &'static str) -> impl Middleware {
    let trace = Arc::clone(trace);
    FnMiddleware::new(label, move |_req, _res, next| {
        trace.lock().unwrap().push(label.to_string());
        next.proceed();
    })
}

fn reply(body: &'static str) -> impl Handler {
    move |_req: &Request, res: &mut Response<'_>| res.send(body)
}

#[test]
fn test_global_middleware_runs_for_every_request() {
    let trace = Trace::default();
    let client = TestClient::new(
        Dispatcher::builder()
            .use_middleware(recorder(&trace, "global"))
            .get("/a", reply("a"))
            .build()
            .unwrap(),
    );

    client.get("/a").send().assert_body("a");
    client.get("/missing").send().assert_outcome(DispatchOutcome::NotFound);

    assert_eq!(*trace.lock().unwrap(), ["global", "global"]);
}

#[test]
fn test_scoped_middleware_runs_only_on_match() {
    let trace = Trace::default();
    let client = TestClient::new(
        Dispatcher::builder()
            .use_at("/admin(/.*)?", recorder(&trace, "admin"))
            .use_middleware(recorder(&trace, "global"))
            .all("/admin/users", reply("admin"))
            .all("/public", reply("public"))
            .build()
            .unwrap(),
    );

    client.get("/public").send().assert_body("public");
    assert_eq!(*trace.lock().unwrap(), ["global"]);

    trace.lock().unwrap().clear();
    client.get("/admin/users").send().assert_body("admin");
    assert_eq!(*trace.lock().unwrap(), ["admin", "global"]);
}

#[test]
fn test_halting_middleware_stops_everything_after_it() {
    let trace = Trace::default();
    let handler_trace = Arc::clone(&trace);
    let client = TestClient::new(
        Dispatcher::builder()
            .use_middleware(recorder(&trace, "first"))
            .use_middleware(FnMiddleware::new("auth", |req, res, next| {
                if req.header("authorization").is_some() {
                    next.proceed();
                } else {
                    res.status(StatusCode::UNAUTHORIZED);
                    res.send("denied");
                }
            }))
            .use_middleware(recorder(&trace, "third"))
            .get("/secret", move |_req: &Request, res: &mut Response<'_>| {
                handler_trace.lock().unwrap().push("handler".into());
                res.send("secret");
            })
            .build()
            .unwrap(),
    );

    client
        .get("/secret")
        .send()
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_body("denied")
        .assert_outcome(DispatchOutcome::Halted { middleware: "auth" });
    assert_eq!(*trace.lock().unwrap(), ["first"]);

    trace.lock().unwrap().clear();
    client
        .get("/secret")
        .header("Authorization", "Bearer t")
        .send()
        .assert_body("secret");
    assert_eq!(*trace.lock().unwrap(), ["first", "third", "handler"]);
}

#[test]
fn test_route_priority_follows_registration_order() {
    let client = TestClient::new(
        Dispatcher::builder()
            .get("/a", reply("get"))
            .all("/a", reply("all"))
            .build()
            .unwrap(),
    );

    client.get("/a").send().assert_body("get");
    client.post("/a").send().assert_body("all");
    client.delete("/a").send().assert_body("all");
}

#[test]
fn test_not_found_hook_receives_path() {
    let client = TestClient::new(
        Dispatcher::builder()
            .get("/a", reply("a"))
            .on_invalid_path(|path, res| res.send(format!("no route for {path}")))
            .build()
            .unwrap(),
    );

    client
        .get("/b/?x=1")
        .send()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_outcome(DispatchOutcome::NotFound)
        .assert_body("no route for /b");
}

#[test]
fn test_method_not_allowed_hook_receives_path_and_method() {
    let client = TestClient::new(
        Dispatcher::builder()
            .get(r"/users/(\d+)", reply("user"))
            .put(r"/users/(\d+)", reply("updated"))
            .on_invalid_method(|path, method, res| {
                res.set_header("Allow", "GET, PUT");
                res.send(format!("{method} {path}"));
            })
            .build()
            .unwrap(),
    );

    client
        .delete("/users/9")
        .send()
        .assert_status(StatusCode::METHOD_NOT_ALLOWED)
        .assert_outcome(DispatchOutcome::MethodNotAllowed)
        .assert_header("allow", "GET, PUT")
        .assert_body("DELETE /users/9");
}

#[test]
fn test_no_routes_is_not_found() {
    let client = TestClient::new(Dispatcher::builder().build().unwrap());
    client.get("/").send().assert_status(StatusCode::NOT_FOUND);
}

#[test]
fn test_params_and_named_params() {
    let client = TestClient::new(
        Dispatcher::builder()
            .get(
                r"/orgs/(?P<org>[a-z]+)/repos/(\d+)",
                |req: &Request, res: &mut Response<'_>| {
                    let _ = res.json(&json!({
                        "org": req.params().named("org"),
                        "first": req.param(0),
                        "second": req.param(1),
                    }));
                },
            )
            .build()
            .unwrap(),
    );

    client
        .get("/orgs/acme/repos/12")
        .send()
        .assert_json(&json!({"org": "acme", "first": "acme", "second": "12"}));
}

#[test]
fn test_pattern_is_anchored() {
    let client = TestClient::new(
        Dispatcher::builder()
            .get(r"/items/\d+", reply("item"))
            .build()
            .unwrap(),
    );

    client.get("/items/1").send().assert_body("item");
    client.get("/items/1/extra").send().assert_outcome(DispatchOutcome::NotFound);
    client.get("/prefix/items/1").send().assert_outcome(DispatchOutcome::NotFound);
}

#[test]
fn test_base_path_prefixes_routes_and_scopes() {
    let trace = Trace::default();
    let client = TestClient::new(
        Dispatcher::builder()
            .base_path("/api/v[0-9]")
            .use_at("/users", recorder(&trace, "users"))
            .get(r"/users/(\d+)", |req: &Request, res: &mut Response<'_>| {
                res.send(req.param(0).unwrap_or_default().to_string());
            })
            .get("/users", reply("list"))
            .build()
            .unwrap(),
    );

    client.get("/api/v1/users/5").send().assert_body("5");
    client.get("/api/v2/users").send().assert_body("list");
    client.get("/users").send().assert_outcome(DispatchOutcome::NotFound);
    assert_eq!(*trace.lock().unwrap(), ["users"]);
}

#[test]
fn test_middleware_extensions_reach_handler() {
    let client = TestClient::new(
        Dispatcher::builder()
            .use_middleware(FnMiddleware::new("tenant", |req, _res, next| {
                let tenant = req.header("x-tenant").unwrap_or("public").to_string();
                req.extensions_mut().insert("tenant", tenant);
                next.proceed();
            }))
            .get("/whoami", |req: &Request, res: &mut Response<'_>| {
                let tenant = req.extensions().get::<String>("tenant").cloned();
                res.send(tenant.unwrap_or_default());
            })
            .build()
            .unwrap(),
    );

    client.get("/whoami").send().assert_body("public");
    client
        .get("/whoami")
        .header("X-Tenant", "acme")
        .send()
        .assert_body("acme");
}

#[test]
fn test_headers_sent_freezes_status() {
    let client = TestClient::new(
        Dispatcher::builder()
            .use_middleware(FnMiddleware::new("banner", |_req, res, next| {
                res.send("banner;");
                next.proceed();
            }))
            .get("/", |_req: &Request, res: &mut Response<'_>| {
                res.status_with_message(StatusCode::IM_A_TEAPOT, "Brewing");
                res.send("body");
            })
            .build()
            .unwrap(),
    );

    client
        .get("/")
        .send()
        .assert_status(StatusCode::OK)
        .assert_body("banner;body");
}

#[test]
fn test_status_message_rejects_and_freezes_status() {
    let client = TestClient::new(
        Dispatcher::builder()
            .use_middleware(FnMiddleware::new("guard", |_req, res, next| {
                res.status_with_message(StatusCode::FORBIDDEN, "go away");
                next.proceed();
            }))
            .get("/orders", |_req: &Request, res: &mut Response<'_>| {
                res.status(StatusCode::OK);
                res.send(";late");
            })
            .build()
            .unwrap(),
    );

    client
        .get("/orders")
        .send()
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body("go away;late");
}

struct Users;

impl Controller for Users {
    fn execute(&self, req: &Request, res: &mut Response<'_>) {
        res.send(format!("users:{}", req.method()));
    }
}

#[test]
fn test_register_many_with_controllers_and_handlers() {
    let client = TestClient::new(
        Dispatcher::builder()
            .register_many([
                RouteDescriptor::new("GET", "/users", RouteController::controller(Users)),
                RouteDescriptor::new("post", "/users", RouteController::controller(Users)),
                RouteDescriptor::new("all", "/health", RouteController::handler(reply("ok"))),
            ])
            .build()
            .unwrap(),
    );

    client.get("/users").send().assert_body("users:GET");
    client.post("/users").send().assert_body("users:POST");
    client.patch("/health").send().assert_body("ok");
    client.put("/users").send().assert_outcome(DispatchOutcome::MethodNotAllowed);
}

#[test]
fn test_invalid_registrations_fail_build() {
    assert!(Dispatcher::builder().get("/users/(", reply("x")).build().is_err());
    assert!(Dispatcher::builder()
        .use_at("[", recorder(&Trace::default(), "bad"))
        .build()
        .is_err());
    assert!(Dispatcher::builder()
        .register_many([RouteDescriptor::new(
            "FETCH",
            "/x",
            RouteController::handler(reply("x")),
        )])
        .build()
        .is_err());
}

#[test]
fn test_shared_dispatcher_registers_while_serving() {
    let shared = SharedDispatcher::new(
        Dispatcher::builder().get("/a", reply("a")).build().unwrap(),
    );

    let before = TestClient::snapshot(&shared);
    shared.update(|builder| builder.get("/b", reply("b"))).unwrap();
    let after = TestClient::snapshot(&shared);

    before.get("/b").send().assert_outcome(DispatchOutcome::NotFound);
    after.get("/a").send().assert_body("a");
    after.get("/b").send().assert_body("b");

    assert!(shared.update(|builder| builder.get("(", reply("x"))).is_err());
    assert_eq!(shared.snapshot().route_count(), 2);
}

#[test]
fn test_dispatcher_from_config() {
    let config = ConfigLoader::new()
        .with_string(
            r#"
            [dispatch]
            base_path = "/svc"
            "#,
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();

    let client = TestClient::new(
        DispatcherBuilder::new()
            .from_config(&config.dispatch)
            .get("/ping", reply("pong"))
            .build()
            .unwrap(),
    );

    client.get("/svc/ping").send().assert_body("pong");
    client.get("/ping").send().assert_outcome(DispatchOutcome::NotFound);
}
