use crate::ipc::helpers::{try_handle_page, FacetDef, FacetSource, PageDef};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

const PAGE: PageDef = PageDef {
    prefix: "teachers",
    kind: EntityKind::Teacher,
    searchable: &["firstName", "lastName", "email", "speciality"],
    facets: &[
        FacetDef {
            name: "department",
            source: FacetSource::Store {
                kind: EntityKind::Department,
                label_field: "name",
                parent: None,
            },
        },
        FacetDef {
            name: "speciality",
            source: FacetSource::Speciality,
        },
    ],
};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    try_handle_page(state, req, &PAGE, |dir| &mut dir.teachers)
}
