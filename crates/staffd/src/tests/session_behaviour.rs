//! Behavioural tests for the per-connection request session.

use std::cell::RefCell;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Map, Value, json};
use staffd_client::{Client, ClientError};
use staffd_protocol::{RequestEnvelope, ResponseEnvelope};

use crate::server::{Server, ServerHandle};

use super::support::{demo_store, loopback_config};

struct SessionWorld {
    server: Option<ServerHandle>,
    client: Option<Client>,
    responses: Vec<ResponseEnvelope>,
    closed: bool,
}

impl SessionWorld {
    fn new() -> Self {
        Self {
            server: None,
            client: None,
            responses: Vec::new(),
            closed: false,
        }
    }

    fn start(&mut self, max_request_bytes: Option<usize>) {
        let mut config = loopback_config();
        if let Some(limit) = max_request_bytes {
            config.max_request_bytes = limit;
        }
        let server = Server::start(&config, demo_store()).expect("start server");
        let client = Client::connect(server.local_addr())
            .and_then(|client| client.with_timeout(Duration::from_secs(2)))
            .expect("connect client");
        self.server = Some(server);
        self.client = Some(client);
    }

    fn client(&mut self) -> &mut Client {
        self.client.as_mut().expect("client connected")
    }

    fn record(&mut self, result: Result<ResponseEnvelope, ClientError>) {
        match result {
            Ok(response) => self.responses.push(response),
            Err(ClientError::Closed) => self.closed = true,
            Err(error) => panic!("exchange failed: {error}"),
        }
    }

    fn send(&mut self, request: &RequestEnvelope) {
        let result = self.client().send(request);
        self.record(result);
    }

    fn send_raw(&mut self, line: &str) {
        let result = self.client().send_raw(line);
        self.record(result);
    }

    fn last(&self) -> &ResponseEnvelope {
        self.responses.last().expect("a response was received")
    }
}

impl Drop for SessionWorld {
    fn drop(&mut self) {
        self.client.take();
        if let Some(server) = self.server.take() {
            server.stop();
            let _ = server.join();
        }
    }
}

#[fixture]
fn world() -> RefCell<SessionWorld> {
    RefCell::new(SessionWorld::new())
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

#[given("a running server with a connected client")]
fn given_running_server(world: &RefCell<SessionWorld>) {
    world.borrow_mut().start(None);
}

#[given("a running server limiting requests to {limit} bytes")]
fn given_limited_server(world: &RefCell<SessionWorld>, limit: usize) {
    world.borrow_mut().start(Some(limit));
}

#[when("the client sends the raw line {line}")]
fn when_raw_line(world: &RefCell<SessionWorld>, line: String) {
    world.borrow_mut().send_raw(strip_quotes(&line));
}

#[when("the client sends a blank line")]
fn when_blank_line(world: &RefCell<SessionWorld>) {
    world.borrow_mut().send_raw("   ");
}

#[when("the client sends the action {action}")]
fn when_action(world: &RefCell<SessionWorld>, action: String) {
    let request = RequestEnvelope::new(strip_quotes(&action)).with_user("EMP003");
    world.borrow_mut().send(&request);
}

#[when("the client sends the anonymous action {action}")]
fn when_action_without_user(world: &RefCell<SessionWorld>, action: String) {
    world
        .borrow_mut()
        .send(&RequestEnvelope::new(strip_quotes(&action)));
}

#[when("the client sends a request padded to {size} bytes")]
fn when_oversized(world: &RefCell<SessionWorld>, size: usize) {
    let padding = "x".repeat(size);
    let line = format!(r#"{{"action":"getEmployees","data":{{"padding":"{padding}"}}}}"#);
    world.borrow_mut().send_raw(&line);
}

#[when("the client logs in as {employee} with password {password}")]
fn when_login(world: &RefCell<SessionWorld>, employee: String, password: String) {
    let mut data = Map::new();
    data.insert("employeeId".to_owned(), json!(strip_quotes(&employee)));
    data.insert("password".to_owned(), json!(strip_quotes(&password)));
    world
        .borrow_mut()
        .send(&RequestEnvelope::new("login").with_data(data));
}

#[when("the client pipelines the actions {first} and {second}")]
fn when_pipelined(world: &RefCell<SessionWorld>, first: String, second: String) {
    let mut world = world.borrow_mut();
    let client = world.client();
    for action in [strip_quotes(&first), strip_quotes(&second)] {
        let line = staffd_protocol::encode_line(&RequestEnvelope::new(action)).expect("encode");
        client.write_raw(&line).expect("write request");
    }
    let first_response = client.read_response();
    let second_response = client.read_response();
    world.record(first_response);
    world.record(second_response);
}

#[then("the response is a success with message {message}")]
fn then_success(world: &RefCell<SessionWorld>, message: String) {
    let world = world.borrow();
    let response = world.last();
    assert!(response.is_success(), "expected success, got {response:?}");
    assert_eq!(response.message(), strip_quotes(&message));
}

#[then("the response is an error with message {message}")]
fn then_error(world: &RefCell<SessionWorld>, message: String) {
    let world = world.borrow();
    let response = world.last();
    assert!(!response.is_success(), "expected error, got {response:?}");
    assert_eq!(response.message(), strip_quotes(&message));
}

#[then("the response is an error starting with {prefix}")]
fn then_error_prefix(world: &RefCell<SessionWorld>, prefix: String) {
    let world = world.borrow();
    let response = world.last();
    assert!(!response.is_success(), "expected error, got {response:?}");
    assert!(
        response.message().starts_with(strip_quotes(&prefix)),
        "unexpected message: {}",
        response.message()
    );
}

#[then("the response data names employee {employee}")]
fn then_employee(world: &RefCell<SessionWorld>, employee: String) {
    let world = world.borrow();
    let data = world.last().data().expect("employee data");
    assert_eq!(data["id"], Value::from(strip_quotes(&employee)));
    assert!(data.get("password").is_none(), "password must not be sent");
}

#[then("the response carries no data")]
fn then_no_data(world: &RefCell<SessionWorld>) {
    assert!(world.borrow().last().data().is_none());
}

#[then("the responses arrive as {first} then {second}")]
fn then_in_order(world: &RefCell<SessionWorld>, first: String, second: String) {
    let world = world.borrow();
    let messages: Vec<&str> = world.responses.iter().map(ResponseEnvelope::message).collect();
    assert_eq!(messages, vec![strip_quotes(&first), strip_quotes(&second)]);
}

#[then("the server closes the connection")]
fn then_closed(world: &RefCell<SessionWorld>) {
    let mut world = world.borrow_mut();
    let request = RequestEnvelope::new("getEmployees");
    let result = world.client().send(&request);
    assert!(
        matches!(result, Err(ClientError::Closed | ClientError::Io(_))),
        "connection should be closed, got {result:?}"
    );
}

#[scenario(path = "tests/features/session.feature")]
fn session_behaviour(#[from(world)] world: RefCell<SessionWorld>) {
    drop(world);
}

#[test]
fn sessions_do_not_share_failures() {
    let server = Server::start(&loopback_config(), demo_store()).expect("start server");
    let mut broken = Client::connect(server.local_addr()).expect("connect broken client");
    let mut healthy = Client::connect(server.local_addr()).expect("connect healthy client");

    broken.write_raw(b"{\"action\":").expect("write partial request");
    drop(broken);

    let response = healthy
        .send(&RequestEnvelope::new("getEmployees"))
        .expect("healthy exchange");
    assert_eq!(response.message(), "Employees retrieved");

    drop(healthy);
    server.stop();
    server.join().expect("join workers");
}
