use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::refs::RefLookup;
use crate::store::{Entity, EntityKind};

/// Field-level, user-correctable failure. Always returned as data so the
/// form can render inline messages; never a transport error.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(field, "required", format!("{field} is required"))
    }
}

/// Validation and creation-time derivation, defined once per entity
/// schema instead of inline at each call site.
pub trait EntitySchema: Entity + Default {
    /// Wire fields the system computes itself. Form input for them is
    /// discarded before merging, like `id`.
    const DERIVED_FIELDS: &'static [&'static str] = &[];

    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError>;

    /// Fills fields computed at creation time (enrollment codes and the
    /// like). Runs after validation, before insert.
    fn derive_on_create(&mut self, _refs: &dyn RefLookup) {}
}

// Speciality lists are static per department code; they are the
// constraint behind the department -> speciality cascade.
const SPECIALITIES: &[(&str, &[&str])] = &[
    (
        "INFO",
        &[
            "Software Engineering",
            "Networks",
            "Artificial Intelligence",
            "Databases",
        ],
    ),
    ("MATH", &["Algebra", "Statistics", "Analysis"]),
    ("PHYS", &["Mechanics", "Electronics", "Thermodynamics"]),
];

pub fn specialities_for(department_code: &str) -> &'static [&'static str] {
    SPECIALITIES
        .iter()
        .find(|(code, _)| *code == department_code)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

/// Enrollment code: `{yearSuffix}-{programCode}-{randomDigits}`.
pub fn enrollment_code(program_code: &str) -> String {
    let year = Utc::now().year() % 100;
    let digits = Uuid::new_v4().as_u128() % 10_000;
    format!("{year:02}-{program_code}-{digits:04}")
}

// 2-6 uppercase alphanumerics, the code shape the mock data uses.
fn is_code(s: &str) -> bool {
    (2..=6).contains(&s.len())
        && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn require(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::required(field));
    }
}

fn check_code(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if !value.is_empty() && !is_code(value) {
        errors.push(ValidationError::new(
            field,
            "code_format",
            format!("{field} must be 2-6 uppercase letters or digits"),
        ));
    }
}

fn check_email(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::required(field));
    } else if !value.contains('@') {
        errors.push(ValidationError::new(
            field,
            "email_format",
            format!("{field} must be an email address"),
        ));
    }
}

fn check_ref(
    errors: &mut Vec<ValidationError>,
    refs: &dyn RefLookup,
    field: &str,
    target: EntityKind,
    value: &str,
    required: bool,
) {
    if value.trim().is_empty() {
        if required {
            errors.push(ValidationError::required(field));
        }
        return;
    }
    if !refs.exists(target, value) {
        errors.push(ValidationError::new(
            field,
            "unknown_reference",
            format!("no {} with id {value}", target.as_str()),
        ));
    }
}

fn check_range(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: i64,
    min: i64,
    max: i64,
) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::new(
            field,
            "out_of_range",
            format!("{field} must be between {min} and {max}"),
        ));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
}

impl Entity for Department {
    const KIND: EntityKind = EntityKind::Department;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "code" => Some(self.code.clone()),
            "description" => Some(self.description.clone()),
            _ => None,
        }
    }
}

impl EntitySchema for Department {
    fn validate(&self, _refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "code", &self.code);
        check_code(&mut errors, "code", &self.code);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub code: String,
    pub department: String,
    pub coordinator: String,
    pub duration_years: u8,
}

impl Entity for Program {
    const KIND: EntityKind = EntityKind::Program;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "code" => Some(self.code.clone()),
            "department" => Some(self.department.clone()),
            "coordinator" => Some(self.coordinator.clone()),
            "durationYears" => Some(self.duration_years.to_string()),
            _ => None,
        }
    }
}

impl EntitySchema for Program {
    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "code", &self.code);
        check_code(&mut errors, "code", &self.code);
        check_ref(
            &mut errors,
            refs,
            "department",
            EntityKind::Department,
            &self.department,
            true,
        );
        check_ref(
            &mut errors,
            refs,
            "coordinator",
            EntityKind::Teacher,
            &self.coordinator,
            false,
        );
        // Coordinator is picked from the department's own teachers; a
        // stale (coordinator, department) pair must not survive a submit.
        if !self.coordinator.is_empty() {
            let coordinator_dept =
                refs.field_of(EntityKind::Teacher, &self.coordinator, "department");
            if coordinator_dept.is_some() && coordinator_dept.as_deref() != Some(&self.department)
            {
                errors.push(ValidationError::new(
                    "coordinator",
                    "wrong_department",
                    "coordinator must belong to the selected department",
                ));
            }
        }
        check_range(
            &mut errors,
            "durationYears",
            i64::from(self.duration_years),
            1,
            6,
        );
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub code: String,
    pub program: String,
    pub capacity: u32,
}

impl Entity for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "code" => Some(self.code.clone()),
            "program" => Some(self.program.clone()),
            "capacity" => Some(self.capacity.to_string()),
            _ => None,
        }
    }
}

impl EntitySchema for Group {
    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "code", &self.code);
        check_code(&mut errors, "code", &self.code);
        check_ref(
            &mut errors,
            refs,
            "program",
            EntityKind::Program,
            &self.program,
            true,
        );
        check_range(&mut errors, "capacity", i64::from(self.capacity), 1, 200);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Teacher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub speciality: String,
}

impl Entity for Teacher {
    const KIND: EntityKind = EntityKind::Teacher;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "firstName" => Some(self.first_name.clone()),
            "lastName" => Some(self.last_name.clone()),
            // Display label for selects and tables.
            "name" => Some(format!("{} {}", self.first_name, self.last_name)),
            "email" => Some(self.email.clone()),
            "department" => Some(self.department.clone()),
            "speciality" => Some(self.speciality.clone()),
            _ => None,
        }
    }
}

impl EntitySchema for Teacher {
    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "firstName", &self.first_name);
        require(&mut errors, "lastName", &self.last_name);
        check_email(&mut errors, "email", &self.email);
        check_ref(
            &mut errors,
            refs,
            "department",
            EntityKind::Department,
            &self.department,
            true,
        );
        if !self.speciality.is_empty() {
            let code = refs
                .field_of(EntityKind::Department, &self.department, "code")
                .unwrap_or_default();
            if !specialities_for(&code).contains(&self.speciality.as_str()) {
                errors.push(ValidationError::new(
                    "speciality",
                    "unknown_speciality",
                    "speciality is not offered by the selected department",
                ));
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub program: String,
    pub group: String,
    pub enrollment_code: String,
}

impl Entity for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "firstName" => Some(self.first_name.clone()),
            "lastName" => Some(self.last_name.clone()),
            "name" => Some(format!("{} {}", self.first_name, self.last_name)),
            "email" => Some(self.email.clone()),
            "program" => Some(self.program.clone()),
            "group" => Some(self.group.clone()),
            "enrollmentCode" => Some(self.enrollment_code.clone()),
            _ => None,
        }
    }
}

impl EntitySchema for Student {
    const DERIVED_FIELDS: &'static [&'static str] = &["enrollmentCode"];

    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "firstName", &self.first_name);
        require(&mut errors, "lastName", &self.last_name);
        check_email(&mut errors, "email", &self.email);
        check_ref(
            &mut errors,
            refs,
            "program",
            EntityKind::Program,
            &self.program,
            true,
        );
        check_ref(
            &mut errors,
            refs,
            "group",
            EntityKind::Group,
            &self.group,
            true,
        );
        if !self.group.is_empty() {
            let group_program = refs.field_of(EntityKind::Group, &self.group, "program");
            if group_program.is_some() && group_program.as_deref() != Some(&self.program) {
                errors.push(ValidationError::new(
                    "group",
                    "wrong_program",
                    "group does not belong to the selected program",
                ));
            }
        }
        errors
    }

    fn derive_on_create(&mut self, refs: &dyn RefLookup) {
        if self.enrollment_code.is_empty() {
            let program_code = refs
                .field_of(EntityKind::Program, &self.program, "code")
                .unwrap_or_else(|| "GEN".to_string());
            self.enrollment_code = enrollment_code(&program_code);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub code: String,
    pub credits: u8,
    pub department: String,
    pub teacher: String,
}

impl Entity for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "title" => Some(self.title.clone()),
            "code" => Some(self.code.clone()),
            "credits" => Some(self.credits.to_string()),
            "department" => Some(self.department.clone()),
            "teacher" => Some(self.teacher.clone()),
            _ => None,
        }
    }
}

impl EntitySchema for Course {
    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title);
        require(&mut errors, "code", &self.code);
        check_code(&mut errors, "code", &self.code);
        check_range(&mut errors, "credits", i64::from(self.credits), 1, 12);
        check_ref(
            &mut errors,
            refs,
            "department",
            EntityKind::Department,
            &self.department,
            true,
        );
        check_ref(
            &mut errors,
            refs,
            "teacher",
            EntityKind::Teacher,
            &self.teacher,
            false,
        );
        if !self.teacher.is_empty() {
            let teacher_dept = refs.field_of(EntityKind::Teacher, &self.teacher, "department");
            if teacher_dept.is_some() && teacher_dept.as_deref() != Some(&self.department) {
                errors.push(ValidationError::new(
                    "teacher",
                    "wrong_department",
                    "teacher must belong to the selected department",
                ));
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub course: String,
    pub teacher: String,
    pub group: String,
    pub due_date: String,
}

impl Entity for Assignment {
    const KIND: EntityKind = EntityKind::Assignment;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "title" => Some(self.title.clone()),
            "course" => Some(self.course.clone()),
            "teacher" => Some(self.teacher.clone()),
            "group" => Some(self.group.clone()),
            "dueDate" => Some(self.due_date.clone()),
            _ => None,
        }
    }
}

impl EntitySchema for Assignment {
    fn validate(&self, refs: &dyn RefLookup) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title);
        check_ref(
            &mut errors,
            refs,
            "course",
            EntityKind::Course,
            &self.course,
            true,
        );
        check_ref(
            &mut errors,
            refs,
            "teacher",
            EntityKind::Teacher,
            &self.teacher,
            true,
        );
        check_ref(
            &mut errors,
            refs,
            "group",
            EntityKind::Group,
            &self.group,
            true,
        );
        if self.due_date.trim().is_empty() {
            errors.push(ValidationError::required("dueDate"));
        } else if NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d").is_err() {
            errors.push(ValidationError::new(
                "dueDate",
                "date_format",
                "dueDate must be YYYY-MM-DD",
            ));
        }
        errors
    }
}
