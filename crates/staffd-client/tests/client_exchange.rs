//! Client exchanges against a scripted peer.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rstest::{fixture, rstest};
use staffd_client::{Client, ClientError};
use staffd_protocol::{RequestEnvelope, Status};

struct ScriptedPeer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

/// Accepts one connection, answers each line with `replies` in turn, and
/// returns the lines it received.
fn scripted_peer(replies: Vec<&'static str>) -> ScriptedPeer {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut writer = stream.try_clone().expect("clone stream");
        let mut reader = BufReader::new(stream);
        let mut received = Vec::new();
        for reply in replies {
            let mut line = String::new();
            if reader.read_line(&mut line).expect("read request") == 0 {
                break;
            }
            received.push(line.trim_end().to_owned());
            writer.write_all(reply.as_bytes()).expect("write reply");
            writer.write_all(b"\n").expect("write newline");
        }
        received
    });
    ScriptedPeer { addr, handle }
}

#[fixture]
fn echo_success() -> ScriptedPeer {
    scripted_peer(vec![
        r#"{"status":"success","message":"Employees retrieved","data":[]}"#,
    ])
}

#[rstest]
fn send_writes_one_line_and_decodes_reply(echo_success: ScriptedPeer) {
    let mut client = Client::connect(echo_success.addr)
        .and_then(|connected| connected.with_timeout(Duration::from_secs(2)))
        .expect("connect");
    let response = client
        .send(&RequestEnvelope::new("getEmployees").with_user("EMP001"))
        .expect("exchange");
    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.message(), "Employees retrieved");

    drop(client);
    let received = echo_success.handle.join().expect("peer thread");
    assert_eq!(received.len(), 1);
    let sent: serde_json::Value =
        serde_json::from_str(received.first().expect("request line")).expect("json request");
    assert_eq!(sent["action"], "getEmployees");
    assert_eq!(sent["userId"], "EMP001");
}

#[rstest]
fn send_raw_passes_text_through() {
    let peer = scripted_peer(vec![
        r#"{"status":"error","message":"Invalid request: expected value","data":null}"#,
    ]);
    let mut client = Client::connect(peer.addr).expect("connect");
    let response = client.send_raw("not json").expect("exchange");
    assert!(!response.is_success());
    drop(client);
    assert_eq!(peer.handle.join().expect("peer thread"), vec!["not json"]);
}

#[rstest]
fn reports_closed_connection() {
    let peer = scripted_peer(Vec::new());
    let mut client = Client::connect(peer.addr).expect("connect");
    peer.handle.join().expect("peer thread");
    let error = client.send_raw("{}").expect_err("peer is gone");
    assert!(matches!(error, ClientError::Closed | ClientError::Io(_)));
}
