use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Department,
    Program,
    Group,
    Teacher,
    Student,
    Course,
    Assignment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Department => "department",
            EntityKind::Program => "program",
            EntityKind::Group => "group",
            EntityKind::Teacher => "teacher",
            EntityKind::Student => "student",
            EntityKind::Course => "course",
            EntityKind::Assignment => "assignment",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("no record with id: {0}")]
    NotFound(String),
    #[error("patch does not fit the record schema: {0}")]
    InvalidPatch(String),
}

/// One portal domain object. `field` exposes the string form of every
/// wire-named scalar or reference field so that search, faceting and the
/// integrity sweep can stay generic over entity types.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn field(&self, name: &str) -> Option<String>;
}

/// In-memory, insertion-ordered collection of one entity type.
///
/// There is no persistence and no concurrency control: state lives for the
/// process lifetime and a store is only ever touched by its own page.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    records: Vec<T>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in store order. Filtering and sorting never reorder this.
    pub fn list(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, record: T) -> Result<(), StoreError> {
        if self.contains(record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        self.records.push(record);
        Ok(())
    }

    /// Shallow-merges a JSON object patch into the matching record.
    /// Unspecified fields keep their current values; `id` is immutable.
    pub fn update(
        &mut self,
        id: &str,
        patch: &serde_json::Map<String, Value>,
    ) -> Result<T, StoreError> {
        let Some(pos) = self.records.iter().position(|r| r.id() == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let merged = merge_patch(&self.records[pos], patch)
            .map_err(|e| StoreError::InvalidPatch(e.to_string()))?;
        self.records[pos] = merged;
        Ok(self.records[pos].clone())
    }

    /// Removing an absent id is a no-op, matching UI delete expectations.
    pub fn remove(&mut self, id: &str) {
        self.records.retain(|r| r.id() != id);
    }
}

/// Shallow-merge of a JSON object patch over a record. Keys outside the
/// schema are dropped by deserialization; `id` is never overwritten.
pub fn merge_patch<T: Entity>(
    base: &T,
    patch: &serde_json::Map<String, Value>,
) -> serde_json::Result<T> {
    use serde::de::Error as _;

    let Value::Object(mut merged) = serde_json::to_value(base)? else {
        return Err(serde_json::Error::custom(
            "record did not serialize to an object",
        ));
    };
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
}
