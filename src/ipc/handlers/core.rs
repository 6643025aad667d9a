use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::schema::{Course, Program, Teacher};
use crate::session::Role;
use crate::store::EntityKind;

fn handle_session_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let role = req
        .params
        .get("role")
        .cloned()
        .map(serde_json::from_value::<Role>);
    match role {
        Some(Ok(role)) => {
            state.session.login(role);
            ok(
                &req.id,
                json!({ "role": role, "canManage": state.session.can_manage() }),
            )
        }
        _ => err(
            &req.id,
            "bad_params",
            "role must be one of: student, teacher, admin",
            None,
        ),
    }
}

fn handle_session_current(state: &AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "role": state.session.role(),
            "loggedIn": state.session.role().is_some(),
            "canManage": state.session.can_manage()
        }),
    )
}

// Per-department counts so the admin landing page can show stat cards
// without issuing one list call per entity.
fn handle_dashboard_summary(state: &AppState, req: &Request) -> serde_json::Value {
    let dir = &state.dir;

    let departments: Vec<serde_json::Value> = dir
        .departments
        .store
        .list()
        .iter()
        .map(|d| {
            let programs = dir
                .programs
                .store
                .list()
                .iter()
                .filter(|p: &&Program| p.department == d.id)
                .count();
            let teachers = dir
                .teachers
                .store
                .list()
                .iter()
                .filter(|t: &&Teacher| t.department == d.id)
                .count();
            let courses = dir
                .courses
                .store
                .list()
                .iter()
                .filter(|c: &&Course| c.department == d.id)
                .count();
            json!({
                "id": d.id,
                "code": d.code,
                "name": d.name,
                "programCount": programs,
                "teacherCount": teachers,
                "courseCount": courses
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "totals": {
                "departments": dir.count(EntityKind::Department),
                "programs": dir.count(EntityKind::Program),
                "groups": dir.count(EntityKind::Group),
                "teachers": dir.count(EntityKind::Teacher),
                "students": dir.count(EntityKind::Student),
                "courses": dir.count(EntityKind::Course),
                "assignments": dir.count(EntityKind::Assignment)
            },
            "departments": departments
        }),
    )
}

fn handle_integrity_check(state: &AppState, req: &Request) -> serde_json::Value {
    let violations = state.dir.dangling();
    ok(
        &req.id,
        json!({
            "ok": violations.is_empty(),
            "violations": violations
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(ok(
            &req.id,
            json!({ "version": env!("CARGO_PKG_VERSION") }),
        )),
        "session.login" => Some(handle_session_login(state, req)),
        "session.logout" => {
            state.session.logout();
            Some(ok(&req.id, json!({ "loggedIn": false })))
        }
        "session.current" => Some(handle_session_current(state, req)),
        "dashboard.summary" => Some(handle_dashboard_summary(state, req)),
        "integrity.check" => Some(handle_integrity_check(state, req)),
        _ => None,
    }
}
