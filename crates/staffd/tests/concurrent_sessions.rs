//! Exercises the public server API with many clients at once.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};
use staffd::{Server, ServerHandle};
use staffd_client::Client;
use staffd_config::Config;
use staffd_protocol::RequestEnvelope;
use staffd_store::MemoryStore;

const TIMEOUT: Duration = Duration::from_secs(5);

struct Running {
    server: ServerHandle,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.server.stop();
        let _ = self.server.join();
    }
}

#[fixture]
fn running() -> Running {
    let config = Config {
        host: "127.0.0.1".to_owned(),
        port: 0,
        workers: 8,
        queue_capacity: 8,
        ..Config::default()
    };
    let store = Arc::new(MemoryStore::with_demo_data().expect("demo data"));
    let server = Server::start(&config, store).expect("server starts");
    Running { server }
}

fn login_request(employee: &str) -> RequestEnvelope {
    let mut data = Map::new();
    data.insert("employeeId".to_owned(), json!(employee));
    data.insert("password".to_owned(), json!("password"));
    RequestEnvelope::new("login").with_data(data)
}

#[rstest]
fn clients_are_served_independently(running: Running) {
    let addr = running.server.local_addr();
    let employees = ["EMP001", "EMP002", "EMP003", "EMP004"];

    let sessions: Vec<_> = employees
        .into_iter()
        .map(|employee| {
            thread::spawn(move || {
                let mut client = Client::connect(addr)
                    .expect("connect")
                    .with_timeout(TIMEOUT)
                    .expect("timeout");
                let garbage = client.send_raw("{not json").expect("garbage answered");
                assert!(!garbage.is_success());
                assert!(garbage.message().starts_with("Invalid request:"));

                let login = client.send(&login_request(employee)).expect("login");
                assert!(login.is_success(), "{employee}: {login:?}");
                let id = login
                    .data()
                    .and_then(|data| data.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                assert_eq!(id.as_deref(), Some(employee));

                let meetings = RequestEnvelope::new("getMeetings").with_user(employee);
                let reply = client.send(&meetings).expect("meetings");
                assert_eq!(reply.message(), "Meetings retrieved");
            })
        })
        .collect();

    for session in sessions {
        session.join().expect("client thread");
    }
}

#[rstest]
fn a_dropped_client_leaves_others_untouched(running: Running) {
    let addr = running.server.local_addr();
    let abandoned = Client::connect(addr).expect("connect");
    drop(abandoned);

    let mut client = Client::connect(addr)
        .expect("connect")
        .with_timeout(TIMEOUT)
        .expect("timeout");
    let reply = client
        .send(&RequestEnvelope::new("getDashboardStats"))
        .expect("dashboard");
    assert_eq!(reply.message(), "Dashboard stats retrieved");
}
