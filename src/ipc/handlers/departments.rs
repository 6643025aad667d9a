use crate::ipc::helpers::{try_handle_page, PageDef};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

// Departments are the top of the reference graph: search only, no
// cascading facets.
const PAGE: PageDef = PageDef {
    prefix: "departments",
    kind: EntityKind::Department,
    searchable: &["name", "code", "description"],
    facets: &[],
};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    try_handle_page(state, req, &PAGE, |dir| &mut dir.departments)
}
