use crate::ipc::helpers::{try_handle_page, FacetDef, FacetSource, PageDef, ParentLink};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

// The department facet is derived: groups do not store a department.
// It narrows the program options and, through them, the rows.
const PAGE: PageDef = PageDef {
    prefix: "groups",
    kind: EntityKind::Group,
    searchable: &["name", "code"],
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
            name: "program",
            source: FacetSource::Store {
                kind: EntityKind::Program,
                label_field: "name",
                parent: Some(ParentLink {
                    facet: "department",
                    source_field: "department",
                }),
            },
        },
    ],
};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    try_handle_page(state, req, &PAGE, |dir| &mut dir.groups)
}
