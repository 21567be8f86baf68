//! Runs the compiled binary in stdio mode.

use std::process::Stdio;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_stdio(backend: &MockServer, input: &str) -> (String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_applique-relay"))
        .args(["--backend-url", &format!("{}/query", backend.uri()), "stdio"])
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_bytes()).await.unwrap();
    drop(stdin);

    let output = tokio::time::timeout(Duration::from_secs(30), child.wait_with_output())
        .await
        .expect("relay did not exit after stdin closed")
        .unwrap();
    assert!(output.status.success());

    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

#[tokio::test]
async fn test_stdio_tool_call_writes_one_line() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"query": "gold sequin border"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "AP-31 gold sequin border"})),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let frame = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {
            "name": "getAppliqueComponentDetails",
            "arguments": {"query": "gold sequin border"}
        }
    });
    let (stdout, stderr) = run_stdio(&backend, &format!("{frame}\n")).await;

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout was: {stdout}");

    let reply: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(reply["id"], 7);
    assert_eq!(reply["result"]["content"][0]["text"], "AP-31 gold sequin border");

    // logs stay off stdout
    assert!(stderr.contains("stdio"));
}

#[tokio::test]
async fn test_stdio_survives_garbage_line() {
    let backend = MockServer::start().await;

    let ping = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
    let (stdout, _) = run_stdio(&backend, &format!("not json\n{ping}\n")).await;

    let replies: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[1], json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
}

#[tokio::test]
async fn test_info_lists_the_tool() {
    let output = Command::new(env!("CARGO_BIN_EXE_applique-relay"))
        .arg("info")
        .output()
        .await
        .unwrap();
    assert!(output.status.success());

    let info: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["name"], "Applique Component RAG");
    assert_eq!(info["tools"][0]["name"], "getAppliqueComponentDetails");
}
