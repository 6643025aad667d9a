use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_campusd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn campusd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert!(health.get("version").and_then(|v| v.as_str()).is_some());

    let login = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.login",
        json!({ "role": "admin" }),
    );
    assert_eq!(login.get("canManage").and_then(|v| v.as_bool()), Some(true));

    let current = request_ok(&mut stdin, &mut reader, "3", "session.current", json!({}));
    assert_eq!(current.get("loggedIn").and_then(|v| v.as_bool()), Some(true));

    for (i, page) in [
        "departments",
        "programs",
        "groups",
        "teachers",
        "students",
        "courses",
        "assignments",
    ]
    .iter()
    .enumerate()
    {
        let id = format!("list-{i}");
        let listed = request_ok(
            &mut stdin,
            &mut reader,
            &id,
            &format!("{page}.list"),
            json!({}),
        );
        let rows = listed.get("rows").and_then(|v| v.as_array()).expect("rows");
        assert!(!rows.is_empty(), "{page} seed should not be empty");
    }

    let options = request_ok(
        &mut stdin,
        &mut reader,
        "opts",
        "students.options",
        json!({ "facet": "program", "filters": {} }),
    );
    let option_rows = options
        .get("options")
        .and_then(|v| v.as_array())
        .expect("options");
    assert_eq!(option_rows.len(), 4);

    let summary = request_ok(&mut stdin, &mut reader, "dash", "dashboard.summary", json!({}));
    assert_eq!(
        summary
            .pointer("/totals/students")
            .and_then(|v| v.as_u64()),
        Some(6)
    );

    let integrity = request_ok(&mut stdin, &mut reader, "ic", "integrity.check", json!({}));
    assert_eq!(integrity.get("ok").and_then(|v| v.as_bool()), Some(true));

    let unknown = request(&mut stdin, &mut reader, "uk", "nope.method", json!({}));
    assert_eq!(unknown.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        unknown.pointer("/error/code").and_then(|v| v.as_str()),
        Some("not_implemented")
    );

    let logout = request_ok(&mut stdin, &mut reader, "out", "session.logout", json!({}));
    assert_eq!(logout.get("loggedIn").and_then(|v| v.as_bool()), Some(false));

    drop(stdin);
    let _ = child.wait();
}
