use serde_json::{Map, Value};
use uuid::Uuid;

use crate::refs::RefLookup;
use crate::schema::{EntitySchema, ValidationError};
use crate::store::{merge_patch, EntityStore, StoreError};

/// Form lifecycle for one page: `Closed -> Adding | Editing -> Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Adding,
    Editing(String),
}

/// Destructive actions go through `Idle -> Confirming -> Idle`; the store
/// is only touched on confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeleteState {
    Idle,
    Confirming(String),
}

/// Mediates one entity's add/edit/delete lifecycle between a presentation
/// form and its EntityStore. Side effects never leave `store`.
#[derive(Debug)]
pub struct CrudController<T: EntitySchema> {
    pub store: EntityStore<T>,
    mode: FormMode,
    delete: DeleteState,
}

impl<T: EntitySchema> Default for CrudController<T> {
    fn default() -> Self {
        Self::new(EntityStore::new())
    }
}

impl<T: EntitySchema> CrudController<T> {
    pub fn new(store: EntityStore<T>) -> Self {
        Self {
            store,
            mode: FormMode::Closed,
            delete: DeleteState::Idle,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Opens the form with the schema's default values.
    pub fn begin_create(&mut self) -> Value {
        self.mode = FormMode::Adding;
        serde_json::to_value(T::default()).unwrap_or(Value::Null)
    }

    /// Opens the form preloaded with the record's current values.
    pub fn begin_edit(&mut self, id: &str) -> Result<Value, StoreError> {
        let Some(record) = self.store.get(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let form = serde_json::to_value(record).unwrap_or(Value::Null);
        self.mode = FormMode::Editing(id.to_string());
        Ok(form)
    }

    pub fn close_form(&mut self) {
        self.mode = FormMode::Closed;
    }

    pub fn request_delete(&mut self, id: &str) {
        self.delete = DeleteState::Confirming(id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.delete = DeleteState::Idle;
    }

    pub fn pending_delete(&self) -> Option<&str> {
        match &self.delete {
            DeleteState::Confirming(id) => Some(id),
            DeleteState::Idle => None,
        }
    }

    /// Applies the pending removal. Returns the confirmed id, or `None`
    /// when nothing was pending. Removal itself is idempotent.
    pub fn confirm_delete(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.delete, DeleteState::Idle) {
            DeleteState::Confirming(id) => {
                self.store.remove(&id);
                Some(id)
            }
            DeleteState::Idle => None,
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome<T> {
    Saved(T),
    Rejected(Vec<ValidationError>),
}

/// Validates and commits an open form against its controller's store.
///
/// Editing merges the form over the current record; otherwise a new
/// record is built from the schema defaults, given a synthetic id and its
/// derived fields, and appended. Validation failures come back as data
/// with the store untouched; no partial write is ever observable.
///
/// `select` re-borrows the controller from the surrounding state so that
/// cross-store reference checks can run against `dir` between borrows.
pub fn submit<D, T, F>(
    dir: &mut D,
    select: F,
    form: &Map<String, Value>,
) -> Result<SubmitOutcome<T>, StoreError>
where
    D: RefLookup,
    T: EntitySchema,
    F: Fn(&mut D) -> &mut CrudController<T>,
{
    let form = strip_derived::<T>(form);
    let mode = select(dir).mode().clone();
    match mode {
        FormMode::Editing(id) => {
            let Some(base) = select(dir).store.get(&id).cloned() else {
                return Err(StoreError::NotFound(id));
            };
            let candidate: T = match merge_patch(&base, &form) {
                Ok(c) => c,
                Err(e) => return Ok(SubmitOutcome::Rejected(invalid_form(e))),
            };
            let errors = candidate.validate(&*dir);
            if !errors.is_empty() {
                return Ok(SubmitOutcome::Rejected(errors));
            }
            let ctl = select(dir);
            let updated = ctl.store.update(&id, &form)?;
            ctl.close_form();
            Ok(SubmitOutcome::Saved(updated))
        }
        FormMode::Adding | FormMode::Closed => {
            let mut candidate: T = match merge_patch(&T::default(), &form) {
                Ok(c) => c,
                Err(e) => return Ok(SubmitOutcome::Rejected(invalid_form(e))),
            };
            candidate.set_id(Uuid::new_v4().to_string());
            let errors = candidate.validate(&*dir);
            if !errors.is_empty() {
                return Ok(SubmitOutcome::Rejected(errors));
            }
            candidate.derive_on_create(&*dir);
            let ctl = select(dir);
            ctl.store.insert(candidate.clone())?;
            ctl.close_form();
            Ok(SubmitOutcome::Saved(candidate))
        }
    }
}

// System-computed fields are never taken from a form, whatever the
// client sends.
fn strip_derived<T: EntitySchema>(form: &Map<String, Value>) -> Map<String, Value> {
    let mut out = form.clone();
    for field in T::DERIVED_FIELDS {
        out.remove(*field);
    }
    out
}

fn invalid_form(e: serde_json::Error) -> Vec<ValidationError> {
    vec![ValidationError::new(
        "",
        "invalid_form",
        format!("form does not fit the schema: {e}"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;
    use crate::schema::{Department, Student};
    use crate::seed;
    use serde_json::json;

    fn form(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().expect("object form").clone()
    }

    fn departments(d: &mut Directory) -> &mut CrudController<Department> {
        &mut d.departments
    }

    fn students(d: &mut Directory) -> &mut CrudController<Student> {
        &mut d.students
    }

    #[test]
    fn create_assigns_synthetic_id_and_closes_form() {
        let mut dir = Directory::new();
        let select = departments;

        let template = select(&mut dir).begin_create();
        assert_eq!(template.get("name").and_then(|v| v.as_str()), Some(""));
        assert_eq!(*select(&mut dir).mode(), FormMode::Adding);

        let out = submit(
            &mut dir,
            select,
            &form(json!({ "name": "Informatique", "code": "INFO" })),
        )
        .unwrap();
        let SubmitOutcome::Saved(dept) = out else {
            panic!("expected a saved record");
        };
        assert!(!dept.id.is_empty());
        assert_eq!(dept.name, "Informatique");
        assert_eq!(dir.departments.store.len(), 1);
        assert_eq!(*dir.departments.mode(), FormMode::Closed);
    }

    #[test]
    fn validation_failure_leaves_the_store_untouched() {
        let mut dir = Directory::new();
        let select = departments;
        select(&mut dir).begin_create();

        let out = submit(&mut dir, select, &form(json!({ "name": "", "code": "INFO" }))).unwrap();
        let SubmitOutcome::Rejected(errors) = out else {
            panic!("expected rejection");
        };
        assert!(errors.iter().any(|e| e.field == "name"));
        assert!(dir.departments.store.is_empty());
    }

    #[test]
    fn edit_merges_over_the_existing_record() {
        let mut dir = seed::directory().expect("seed");
        let select = departments;

        let loaded = select(&mut dir).begin_edit("INFO").unwrap();
        assert_eq!(
            loaded.get("name").and_then(|v| v.as_str()),
            Some("Informatique")
        );

        let out = submit(
            &mut dir,
            select,
            &form(json!({ "description": "Updated blurb" })),
        )
        .unwrap();
        let SubmitOutcome::Saved(dept) = out else {
            panic!("expected a saved record");
        };
        assert_eq!(dept.id, "INFO");
        assert_eq!(dept.name, "Informatique");
        assert_eq!(dept.description, "Updated blurb");
    }

    #[test]
    fn begin_edit_of_missing_id_is_not_found() {
        let mut ctl: CrudController<Department> = CrudController::default();
        assert!(matches!(
            ctl.begin_edit("missing"),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(*ctl.mode(), FormMode::Closed);
    }

    #[test]
    fn created_student_gets_enrollment_code_and_valid_references() {
        let mut dir = seed::directory().expect("seed");
        let select = students;
        select(&mut dir).begin_create();

        let out = submit(
            &mut dir,
            select,
            &form(json!({
                "firstName": "Nadia",
                "lastName": "Berrada",
                "email": "nadia.berrada@example.edu",
                "program": "IAWM",
                "group": "IAWM1"
            })),
        )
        .unwrap();
        let SubmitOutcome::Saved(student) = out else {
            panic!("expected a saved record");
        };
        assert!(student.enrollment_code.contains("-IAWM-"));
        assert!(dir.groups.store.contains(&student.group));
    }

    #[test]
    fn enrollment_code_cannot_be_supplied_by_the_form() {
        let mut dir = seed::directory().expect("seed");
        let select = students;
        select(&mut dir).begin_create();

        let out = submit(
            &mut dir,
            select,
            &form(json!({
                "firstName": "Nadia",
                "lastName": "Berrada",
                "email": "nadia.berrada@example.edu",
                "program": "IAWM",
                "group": "IAWM1",
                "enrollmentCode": "HACK"
            })),
        )
        .unwrap();
        let SubmitOutcome::Saved(student) = out else {
            panic!("expected a saved record");
        };
        assert_ne!(student.enrollment_code, "HACK");
        assert!(student.enrollment_code.contains("-IAWM-"));
    }

    #[test]
    fn edit_cannot_rewrite_the_enrollment_code() {
        let mut dir = seed::directory().expect("seed");
        let select = students;
        select(&mut dir).begin_edit("s-001").unwrap();

        let out = submit(
            &mut dir,
            select,
            &form(json!({ "enrollmentCode": "HACK" })),
        )
        .unwrap();
        let SubmitOutcome::Saved(student) = out else {
            panic!("expected a saved record");
        };
        assert_eq!(student.enrollment_code, "24-IAWM-0412");
    }

    #[test]
    fn group_from_another_program_is_rejected() {
        let mut dir = seed::directory().expect("seed");
        let select = students;
        select(&mut dir).begin_create();
        let before = dir.students.store.len();

        let out = submit(
            &mut dir,
            select,
            &form(json!({
                "firstName": "Nadia",
                "lastName": "Berrada",
                "email": "nadia.berrada@example.edu",
                "program": "AMS",
                "group": "IAWM1"
            })),
        )
        .unwrap();
        let SubmitOutcome::Rejected(errors) = out else {
            panic!("expected rejection");
        };
        assert!(errors
            .iter()
            .any(|e| e.field == "group" && e.code == "wrong_program"));
        assert_eq!(dir.students.store.len(), before);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut dir = seed::directory().expect("seed");
        let before = dir.departments.store.len();

        dir.departments.request_delete("INFO");
        assert_eq!(dir.departments.pending_delete(), Some("INFO"));
        assert_eq!(dir.departments.store.len(), before);

        dir.departments.cancel_delete();
        assert_eq!(dir.departments.pending_delete(), None);
        assert_eq!(dir.departments.store.len(), before);

        dir.departments.request_delete("INFO");
        assert_eq!(dir.departments.confirm_delete().as_deref(), Some("INFO"));
        assert_eq!(dir.departments.store.len(), before - 1);

        // Nothing pending any more.
        assert_eq!(dir.departments.confirm_delete(), None);
    }

    #[test]
    fn parent_delete_does_not_cascade() {
        let mut dir = seed::directory().expect("seed");
        let programs_before = dir.programs.store.len();

        dir.departments.request_delete("INFO");
        dir.departments.confirm_delete();

        // Programs keep their (now dangling) department reference; the
        // integrity sweep reports it rather than repairing it.
        assert_eq!(dir.programs.store.len(), programs_before);
        assert!(dir
            .dangling()
            .iter()
            .any(|v| v.field == "department" && v.value == "INFO"));
    }

    #[test]
    fn empty_store_roundtrip_create_edit_confirm_delete() {
        let mut dir = Directory::new();
        let select = departments;

        select(&mut dir).begin_create();
        let out = submit(
            &mut dir,
            select,
            &form(json!({ "name": "Informatique", "code": "INFO" })),
        )
        .unwrap();
        let SubmitOutcome::Saved(created) = out else {
            panic!("expected a saved record");
        };
        assert_eq!(dir.departments.store.len(), 1);
        assert!(!created.id.is_empty());

        let loaded = select(&mut dir).begin_edit(&created.id).unwrap();
        assert_eq!(
            loaded.get("name").and_then(|v| v.as_str()),
            Some("Informatique")
        );
        select(&mut dir).close_form();

        dir.departments.request_delete(&created.id);
        dir.departments.confirm_delete();
        assert!(dir.departments.store.list().is_empty());
    }

    #[test]
    fn submitted_student_form_ignores_unknown_fields() {
        let mut dir = seed::directory().expect("seed");
        let select = students;
        select(&mut dir).begin_create();

        let out = submit(
            &mut dir,
            select,
            &form(json!({
                "firstName": "Omar",
                "lastName": "Idrissi",
                "email": "omar.idrissi@example.edu",
                "program": "IAWM",
                "group": "IAWM1",
                "favouriteColour": "green"
            })),
        )
        .unwrap();
        assert!(matches!(out, SubmitOutcome::Saved(Student { .. })));
    }
}
