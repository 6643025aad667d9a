use std::collections::{BTreeMap, HashSet};

use serde_json::{json, Map, Value};

use super::error::{err, ok, store_err};
use super::types::{AppState, Request};
use crate::crud::{self, CrudController, FormMode, SubmitOutcome};
use crate::directory::Directory;
use crate::filter::{self, FilterQuery};
use crate::refs::{self, RefLookup};
use crate::schema::{self, EntitySchema};
use crate::store::{Entity, EntityKind};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
}

impl HandlerErr {
    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, None)
    }
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("missing {}", key),
        })
}

// Tolerant by design: non-string filter values are dropped rather than
// rejected, since the UI's filter state can lag the schema.
pub fn get_filters(params: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let Some(obj) = params.get("filters").and_then(|v| v.as_object()) {
        for (key, value) in obj {
            if let Some(s) = value.as_str() {
                out.insert(key.clone(), s.to_string());
            }
        }
    }
    out
}

/// Where a facet's option list comes from.
pub enum FacetSource {
    /// Ids of another store's records, optionally constrained by the
    /// selected parent facet (e.g. program options narrowed by
    /// department).
    Store {
        kind: EntityKind,
        label_field: &'static str,
        parent: Option<ParentLink>,
    },
    /// Teacher specialities: the static per-department list.
    Speciality,
}

pub struct ParentLink {
    /// Facet on this page whose selection constrains the options.
    pub facet: &'static str,
    /// Field on the source records the parent selection is matched
    /// against.
    pub source_field: &'static str,
}

pub struct FacetDef {
    pub name: &'static str,
    pub source: FacetSource,
}

/// One admin list page: method prefix, what free-text search scans, and
/// the cascading filter facets it offers.
pub struct PageDef {
    pub prefix: &'static str,
    pub kind: EntityKind,
    pub searchable: &'static [&'static str],
    pub facets: &'static [FacetDef],
}

/// Dispatches every `<prefix>.*` method for one admin page against its
/// CrudController. Returns `None` for methods outside this page.
pub fn try_handle_page<T, F>(
    state: &mut AppState,
    req: &Request,
    page: &PageDef,
    select: F,
) -> Option<Value>
where
    T: EntitySchema,
    F: Fn(&mut Directory) -> &mut CrudController<T> + Copy,
{
    let rest = req
        .method
        .strip_prefix(page.prefix)
        .and_then(|m| m.strip_prefix('.'))?;

    Some(match rest {
        "list" => handle_list(state, req, page, select),
        "options" => handle_options(state, req, page),
        "facetChanged" => handle_facet_changed(state, req, page),
        "beginCreate" => {
            let form = select(&mut state.dir).begin_create();
            ok(&req.id, json!({ "form": form }))
        }
        "beginEdit" => match get_required_str(&req.params, "id") {
            Ok(id) => match select(&mut state.dir).begin_edit(&id) {
                Ok(form) => ok(&req.id, json!({ "form": form })),
                Err(e) => store_err(&req.id, &e),
            },
            Err(e) => e.response(&req.id),
        },
        "submit" => handle_submit(state, req, select),
        "requestDelete" => match get_required_str(&req.params, "id") {
            Ok(id) => {
                select(&mut state.dir).request_delete(&id);
                ok(&req.id, json!({ "pending": id }))
            }
            Err(e) => e.response(&req.id),
        },
        "confirmDelete" => match select(&mut state.dir).confirm_delete() {
            Some(id) => ok(&req.id, json!({ "deleted": true, "id": id })),
            None => err(&req.id, "bad_params", "no delete pending", None),
        },
        "cancelDelete" => {
            select(&mut state.dir).cancel_delete();
            ok(&req.id, json!({ "cancelled": true }))
        }
        _ => return None,
    })
}

fn handle_list<T, F>(state: &mut AppState, req: &Request, page: &PageDef, select: F) -> Value
where
    T: EntitySchema,
    F: Fn(&mut Directory) -> &mut CrudController<T>,
{
    let query = FilterQuery {
        search: req
            .params
            .get("search")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        filters: get_filters(&req.params),
        sort_by: req
            .params
            .get("sortBy")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    };

    let narrowing = derived_row_constraints::<T>(&state.dir, page, &query.filters);
    let ctl = select(&mut state.dir);
    let mut rows = filter::apply(ctl.store.list(), &query, page.searchable);
    rows.retain(|r| {
        narrowing.iter().all(|(field, allowed)| match r.field(field) {
            Some(v) if !v.is_empty() => allowed.contains(&v),
            _ => true,
        })
    });
    let total = ctl.store.len();
    ok(
        &req.id,
        json!({
            "rows": serde_json::to_value(&rows).unwrap_or(Value::Null),
            "matched": rows.len(),
            "total": total
        }),
    )
}

/// A facet the entity does not store (department on the student page,
/// say) still narrows the rows: every stored child facet under the
/// selection is restricted to the ids consistent with it, so a student
/// matches `department = MATH` when their program belongs to MATH.
fn derived_row_constraints<T: EntitySchema>(
    dir: &Directory,
    page: &PageDef,
    filters: &BTreeMap<String, String>,
) -> Vec<(&'static str, HashSet<String>)> {
    let template = T::default();
    let mut out = Vec::new();
    for def in page.facets {
        let Some(selected) = filters.get(def.name).filter(|v| !v.is_empty()) else {
            continue;
        };
        if template.field(def.name).is_some() {
            // Stored on the entity; the facet predicate already covers it.
            continue;
        }
        for child in page.facets {
            let FacetSource::Store {
                kind,
                parent: Some(link),
                ..
            } = &child.source
            else {
                continue;
            };
            if link.facet != def.name || template.field(child.name).is_none() {
                continue;
            }
            let allowed: HashSet<String> = dir
                .facet_values(*kind, Some((link.source_field, selected.as_str())))
                .into_iter()
                .collect();
            out.push((child.name, allowed));
        }
    }
    out
}

fn handle_options(state: &mut AppState, req: &Request, page: &PageDef) -> Value {
    let facet = match get_required_str(&req.params, "facet") {
        Ok(f) => f,
        Err(e) => return e.response(&req.id),
    };
    let filters = get_filters(&req.params);
    let Some(def) = page.facets.iter().find(|f| f.name == facet) else {
        return err(
            &req.id,
            "bad_params",
            format!("unknown facet: {facet}"),
            None,
        );
    };
    ok(
        &req.id,
        json!({ "facet": def.name, "options": compute_options(&state.dir, def, &filters) }),
    )
}

/// A parent facet changed: clear its dependents (transitively) and hand
/// back the sanitized filter set plus fresh option lists for every
/// cleared facet this page offers.
fn handle_facet_changed(state: &mut AppState, req: &Request, page: &PageDef) -> Value {
    let facet = match get_required_str(&req.params, "facet") {
        Ok(f) => f,
        Err(e) => return e.response(&req.id),
    };
    let mut filters = get_filters(&req.params);
    filter::clear_dependents(page.kind, &facet, &mut filters);

    let mut cleared = Vec::new();
    transitive_dependents(page.kind, &facet, &mut cleared);

    let mut options = Map::new();
    for dep in cleared {
        if let Some(def) = page.facets.iter().find(|f| f.name == dep) {
            options.insert(
                dep.to_string(),
                Value::Array(compute_options(&state.dir, def, &filters)),
            );
        }
    }

    ok(
        &req.id,
        json!({ "filters": filters, "options": options }),
    )
}

fn transitive_dependents(kind: EntityKind, facet: &str, out: &mut Vec<&'static str>) {
    for dep in refs::dependents_of(kind, facet) {
        if !out.contains(dep) {
            out.push(*dep);
            transitive_dependents(kind, dep, out);
        }
    }
}

fn compute_options(dir: &Directory, def: &FacetDef, filters: &BTreeMap<String, String>) -> Vec<Value> {
    match &def.source {
        FacetSource::Store {
            kind,
            label_field,
            parent,
        } => {
            let parent_sel: Option<String> = parent
                .as_ref()
                .and_then(|p| filters.get(p.facet))
                .filter(|v| !v.is_empty())
                .cloned();
            let constraint = match (parent.as_ref(), parent_sel.as_deref()) {
                (Some(p), Some(v)) => Some((p.source_field, v)),
                _ => None,
            };
            dir.facet_values(*kind, constraint)
                .into_iter()
                .map(|value| {
                    let label = dir
                        .field_of(*kind, &value, label_field)
                        .unwrap_or_else(|| value.clone());
                    json!({ "value": value, "label": label })
                })
                .collect()
        }
        FacetSource::Speciality => {
            let selected = filters.get("department").cloned().unwrap_or_default();
            let mut seen = HashSet::new();
            let mut out = Vec::new();
            let codes: Vec<String> = if selected.is_empty() {
                dir.facet_values(EntityKind::Department, None)
                    .into_iter()
                    .filter_map(|id| dir.field_of(EntityKind::Department, &id, "code"))
                    .collect()
            } else {
                dir.field_of(EntityKind::Department, &selected, "code")
                    .into_iter()
                    .collect()
            };
            for code in codes {
                for speciality in schema::specialities_for(&code) {
                    if seen.insert(*speciality) {
                        out.push(json!({ "value": speciality, "label": speciality }));
                    }
                }
            }
            out
        }
    }
}

fn handle_submit<T, F>(state: &mut AppState, req: &Request, select: F) -> Value
where
    T: EntitySchema,
    F: Fn(&mut Directory) -> &mut CrudController<T> + Copy,
{
    let Some(form) = req.params.get("form").and_then(|v| v.as_object()).cloned() else {
        return err(&req.id, "bad_params", "missing params.form", None);
    };

    if *select(&mut state.dir).mode() == FormMode::Closed {
        return err(
            &req.id,
            "bad_params",
            "no form open; call beginCreate or beginEdit first",
            None,
        );
    }

    match crud::submit(&mut state.dir, select, &form) {
        Ok(SubmitOutcome::Saved(record)) => ok(
            &req.id,
            json!({
                "saved": true,
                "record": serde_json::to_value(&record).unwrap_or(Value::Null)
            }),
        ),
        Ok(SubmitOutcome::Rejected(errors)) => {
            ok(&req.id, json!({ "saved": false, "errors": errors }))
        }
        Err(e) => store_err(&req.id, &e),
    }
}
