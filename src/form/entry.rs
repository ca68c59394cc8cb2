use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{AppraisalError, Result};
use crate::protocol::{
    Author, BookChapterEntry, ConferenceEntry, CourseEntry, EntryId, ExamDutyEntry,
    IndustryExpert, MembershipEntry, MentorshipActivity, OtherContribution, OutputDetail,
    ReadingMaterialEntry, ResearchGuidanceEntry, ResearchPaperEntry, ResearchProjectEntry,
    SelfAssessedOutput, StudentEvent, TechCommunityActivity,
};

pub fn new_entry_id() -> EntryId {
    Uuid::new_v4().to_string()
}

// ── Entry rows ──────────────────────────────────────────────────────

/// A row in one of a section's lists.
pub trait Entry: Clone + Default + Serialize + DeserializeOwned {
    /// Name used in field errors.
    const NAME: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: EntryId);

    /// Default row with a fresh identifier.
    fn blank() -> Self {
        let mut entry = Self::default();
        entry.set_id(new_entry_id());
        entry
    }
}

macro_rules! impl_entry {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Entry for $ty {
                const NAME: &'static str = $name;

                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: EntryId) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_entry! {
    Author => "author",
    ConferenceEntry => "conference",
    CourseEntry => "course",
    ReadingMaterialEntry => "reading material",
    ExamDutyEntry => "exam duty",
    TechCommunityActivity => "tech community",
    IndustryExpert => "industry expert",
    StudentEvent => "student event",
    MentorshipActivity => "mentorship",
    OtherContribution => "other contribution",
    ResearchPaperEntry => "research paper",
    BookChapterEntry => "book or chapter",
    ResearchProjectEntry => "research project",
    ResearchGuidanceEntry => "research guidance",
    MembershipEntry => "membership",
    SelfAssessedOutput => "self-assessed output",
    OutputDetail => "output",
}

// ── Field values ────────────────────────────────────────────────────

/// A value typed into a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Whole nested value, such as an author list.
    Json(Value),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Json(v)
    }
}

fn as_number(value: &FieldValue) -> f64 {
    let n = match value {
        FieldValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        FieldValue::Number(n) => *n,
        FieldValue::Bool(b) => f64::from(u8::from(*b)),
        FieldValue::Json(v) => v.as_f64().unwrap_or(0.0),
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Coerce `value` to the JSON kind the field currently holds.
fn coerce(current: &Value, value: FieldValue) -> Option<Value> {
    if let FieldValue::Json(v) = value {
        return Some(v);
    }
    let coerced = match current {
        Value::Number(n) if n.is_u64() || n.is_i64() => {
            // Integer counters: non-numeric input and negatives become 0.
            let n = as_number(&value).max(0.0).min(u32::MAX as f64).trunc();
            Value::Number(Number::from(n as u64))
        }
        Value::Number(_) => Value::Number(Number::from_f64(as_number(&value))?),
        Value::Bool(_) => Value::Bool(match value {
            FieldValue::Bool(b) => b,
            FieldValue::Text(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
            other => as_number(&other) != 0.0,
        }),
        Value::String(_) => Value::String(match value {
            FieldValue::Text(s) => s,
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Json(_) => return None,
        }),
        // Optional fields take the value as given; blank text clears them.
        Value::Null => match value {
            FieldValue::Text(s) if s.is_empty() => Value::Null,
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Number(n) => Value::Number(Number::from_f64(n)?),
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Json(v) => v,
        },
        Value::Array(_) | Value::Object(_) => return None,
    };
    Some(coerced)
}

/// Replace one camelCase field of `target`. The target is untouched on
/// error.
pub fn set_field<T>(target: &mut T, name: &'static str, field: &str, value: FieldValue) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = || AppraisalError::InvalidField {
        entry: name,
        field: field.to_string(),
    };
    if field == "id" {
        return Err(invalid());
    }

    let mut object: Map<String, Value> = match serde_json::to_value(&*target)? {
        Value::Object(map) => map,
        _ => return Err(invalid()),
    };
    let current = object.get(field).ok_or_else(invalid)?;
    let coerced = coerce(current, value).ok_or_else(invalid)?;
    object.insert(field.to_string(), coerced);
    *target = serde_json::from_value(Value::Object(object)).map_err(|_| invalid())?;
    Ok(())
}

// ── List operations ─────────────────────────────────────────────────

/// Append a blank row, returning its id.
pub fn add_to<E: Entry>(list: &mut Vec<E>) -> EntryId {
    let entry = E::blank();
    let id = entry.id().to_string();
    list.push(entry);
    id
}

/// Remove the row with `id` unless the list is already at `min_len`.
/// Returns whether a row was removed.
pub fn remove_from<E: Entry>(list: &mut Vec<E>, id: &str, min_len: usize) -> bool {
    if list.len() <= min_len {
        return false;
    }
    let before = list.len();
    list.retain(|e| e.id() != id);
    list.len() != before
}

pub fn update_in<E: Entry>(list: &mut [E], id: &str, field: &str, value: FieldValue) -> Result<()> {
    let entry = list
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| AppraisalError::EntryNotFound(id.to_string()))?;
    set_field(entry, E::NAME, field, value)
}

/// Give blank or repeated ids fresh values and pad to `min_len` rows.
pub fn normalize<E: Entry>(list: &mut Vec<E>, min_len: usize) {
    let mut seen = HashSet::new();
    for entry in list.iter_mut() {
        if entry.id().is_empty() || !seen.insert(entry.id().to_string()) {
            let id = new_entry_id();
            seen.insert(id.clone());
            entry.set_id(id);
        }
    }
    while list.len() < min_len {
        list.push(E::blank());
    }
}

// ── Entry list ──────────────────────────────────────────────────────

/// Editable rows with a floor on how many must remain.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<E> {
    entries: Vec<E>,
    min_len: usize,
}

impl<E: Entry> EntryList<E> {
    /// List that always keeps one row; starts with a blank one.
    pub fn required() -> Self {
        Self::from_entries(Vec::new(), 1)
    }

    /// List that may be emptied.
    pub fn unbounded() -> Self {
        Self::from_entries(Vec::new(), 0)
    }

    pub fn from_entries(mut entries: Vec<E>, min_len: usize) -> Self {
        normalize(&mut entries, min_len);
        Self { entries, min_len }
    }

    /// Replace the rows, normalizing them under this list's floor.
    pub fn replace(&mut self, entries: Vec<E>) {
        *self = Self::from_entries(entries, self.min_len);
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<E> {
        &mut self.entries
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn add(&mut self) -> EntryId {
        add_to(&mut self.entries)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        remove_from(&mut self.entries, id, self.min_len)
    }

    pub fn update(&mut self, id: &str, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        update_in(&mut self.entries, id, field, value.into())
    }
}

impl<E: Entry> Default for EntryList<E> {
    fn default() -> Self {
        Self::required()
    }
}
