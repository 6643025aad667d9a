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

fn row_count(result: &serde_json::Value) -> usize {
    result
        .get("rows")
        .and_then(|v| v.as_array())
        .map(|r| r.len())
        .unwrap_or(0)
}

fn error_fields(result: &serde_json::Value) -> Vec<String> {
    result
        .get("errors")
        .and_then(|v| v.as_array())
        .map(|errs| {
            errs.iter()
                .filter_map(|e| e.get("field").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn submit_without_an_open_form_is_rejected() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "departments.submit",
        json!({ "form": { "name": "Ghost", "code": "GHOST" } }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.pointer("/error/code").and_then(|v| v.as_str()),
        Some("bad_params")
    );
}

#[test]
fn rejected_form_leaves_the_list_unchanged_and_stays_open() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let before = request_ok(&mut stdin, &mut reader, "1", "departments.list", json!({}));
    assert_eq!(row_count(&before), 3);

    let _ = request_ok(&mut stdin, &mut reader, "2", "departments.beginCreate", json!({}));
    let rejected = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "departments.submit",
        json!({ "form": { "name": "", "code": "INFO" } }),
    );
    assert_eq!(rejected.get("saved").and_then(|v| v.as_bool()), Some(false));
    assert!(error_fields(&rejected).contains(&"name".to_string()));

    let after = request_ok(&mut stdin, &mut reader, "4", "departments.list", json!({}));
    assert_eq!(row_count(&after), 3);

    // The form survives the rejection, so a corrected resubmit saves.
    let fixed = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "departments.submit",
        json!({ "form": { "name": "Chimie", "code": "CHIM" } }),
    );
    assert_eq!(fixed.get("saved").and_then(|v| v.as_bool()), Some(true));

    let final_list = request_ok(&mut stdin, &mut reader, "6", "departments.list", json!({}));
    assert_eq!(row_count(&final_list), 4);
}

#[test]
fn speciality_must_belong_to_the_teachers_department() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(&mut stdin, &mut reader, "1", "teachers.beginCreate", json!({}));
    let rejected = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "teachers.submit",
        json!({ "form": {
            "firstName": "Omar",
            "lastName": "Idrissi",
            "email": "omar.idrissi@example.edu",
            "department": "MATH",
            "speciality": "Networks"
        }}),
    );
    assert_eq!(rejected.get("saved").and_then(|v| v.as_bool()), Some(false));
    assert!(error_fields(&rejected).contains(&"speciality".to_string()));

    let teachers = request_ok(&mut stdin, &mut reader, "3", "teachers.list", json!({}));
    assert_eq!(row_count(&teachers), 5);
}

#[test]
fn student_group_must_match_the_chosen_program() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(&mut stdin, &mut reader, "1", "students.beginCreate", json!({}));
    let rejected = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.submit",
        json!({ "form": {
            "firstName": "Nadia",
            "lastName": "Berrada",
            "email": "nadia.berrada@example.edu",
            "program": "AMS",
            "group": "IAWM1"
        }}),
    );
    assert_eq!(rejected.get("saved").and_then(|v| v.as_bool()), Some(false));
    assert!(error_fields(&rejected).contains(&"group".to_string()));

    let students = request_ok(&mut stdin, &mut reader, "3", "students.list", json!({}));
    assert_eq!(row_count(&students), 6);
}

#[test]
fn missing_form_payload_is_bad_params() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(&mut stdin, &mut reader, "1", "groups.beginCreate", json!({}));
    let resp = request(&mut stdin, &mut reader, "2", "groups.submit", json!({}));
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.pointer("/error/code").and_then(|v| v.as_str()),
        Some("bad_params")
    );
}
