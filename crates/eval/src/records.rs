//! Line-delimited JSON evaluation records.

use lsmd_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::BufRead;

/// JSON field names of the model and reference files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub id: String,
    pub input: String,
    pub prediction: String,
    pub reference: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            input: "input".to_string(),
            prediction: "model_output".to_string(),
            reference: "output".to_string(),
        }
    }
}

impl FieldNames {
    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.input = name.into();
        self
    }

    pub fn with_prediction(mut self, name: impl Into<String>) -> Self {
        self.prediction = name.into();
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.reference = name.into();
        self
    }
}

/// A model run on one example: its input and the generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    pub input: String,
    pub prediction: String,
}

/// The gold output for one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub id: String,
    pub reference: String,
}

/// Records keyed by id, in first-seen order.
///
/// A later record with a known id replaces the earlier one at its original
/// position.
#[derive(Debug, Clone)]
pub struct RecordSet<T> {
    records: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> RecordSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, record: T) {
        match self.index.get(&id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(id, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSet<ModelRecord> {
    /// Read model records (`id`, input and prediction fields).
    pub fn read_model<R: BufRead>(reader: R, fields: &FieldNames) -> Result<Self> {
        let mut set = Self::new();
        for_each_object(reader, fields, |id, row| {
            let record = ModelRecord {
                id: id.clone(),
                input: text_field(row, &fields.input),
                prediction: text_field(row, &fields.prediction),
            };
            set.insert(id, record);
        })?;
        Ok(set)
    }
}

impl RecordSet<ReferenceRecord> {
    /// Read reference records (`id` and reference field).
    pub fn read_references<R: BufRead>(reader: R, fields: &FieldNames) -> Result<Self> {
        let mut set = Self::new();
        for_each_object(reader, fields, |id, row| {
            let record = ReferenceRecord {
                id: id.clone(),
                reference: text_field(row, &fields.reference),
            };
            set.insert(id, record);
        })?;
        Ok(set)
    }
}

fn for_each_object<R, F>(reader: R, fields: &FieldNames, mut handle: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(String, &Value),
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let row: Value = serde_json::from_str(&line).map_err(|e| Error::InvalidRecord {
            line: line_number,
            message: e.to_string(),
        })?;
        if !row.is_object() {
            return Err(Error::InvalidRecord {
                line: line_number,
                message: "expected a JSON object".to_string(),
            });
        }

        let id = record_id(&row, &fields.id).ok_or_else(|| Error::InvalidRecord {
            line: line_number,
            message: format!("missing or unusable '{}' field", fields.id),
        })?;
        handle(id, &row);
    }
    Ok(())
}

/// Ids may be strings or numbers; both are compared as text.
fn record_id(row: &Value, field: &str) -> Option<String> {
    match row.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(row: &Value, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_model_records() {
        let jsonl = concat!(
            r##"{"id": 1, "input": "# Titel", "model_output": "Titel"}"##,
            "\n\n",
            r#"{"id": "b", "input": "x"}"#,
            "\n",
        );
        let set = RecordSet::read_model(jsonl.as_bytes(), &FieldNames::default()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("1").unwrap().prediction, "Titel");
        assert_eq!(set.get("b").unwrap().prediction, "");
    }

    #[test]
    fn test_duplicates_replace_in_place() {
        let jsonl = concat!(
            r#"{"id": "a", "output": "alt"}"#,
            "\n",
            r#"{"id": "b", "output": "b"}"#,
            "\n",
            r#"{"id": "a", "output": "neu"}"#,
        );
        let set = RecordSet::read_references(jsonl.as_bytes(), &FieldNames::default()).unwrap();
        let ids: Vec<_> = set.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().reference, "neu");
    }

    #[test]
    fn test_custom_field_names() {
        let fields = FieldNames::default().with_input("src").with_prediction("pred");
        let jsonl = r#"{"id": 7, "src": "s", "pred": "p"}"#;
        let set = RecordSet::read_model(jsonl.as_bytes(), &fields).unwrap();
        assert_eq!(
            set.get("7"),
            Some(&ModelRecord {
                id: "7".to_string(),
                input: "s".to_string(),
                prediction: "p".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_lines() {
        let err = RecordSet::read_references("{\"id\": 1}\nnot json".as_bytes(), &FieldNames::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { line: 2, .. }));

        let err = RecordSet::read_references(r#"{"output": "x"}"#.as_bytes(), &FieldNames::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { line: 1, .. }));

        let err = RecordSet::read_references("[1, 2]".as_bytes(), &FieldNames::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { line: 1, .. }));
    }
}
