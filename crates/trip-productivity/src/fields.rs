//! Permissive accessors over raw store records
//!
//! Records arrive as untyped JSON. Optional fields may be missing, null, native
//! JSON, or JSON encoded inside a string; some forms also nest fields inside an
//! `extraData` / `data` blob. Everything here degrades to `None` or an empty
//! container instead of failing.

use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::constants::{FieldPath, NESTED_BLOBS, REFERENCE_ID_FIELDS};

/// A raw record as stored upstream
pub type RawRecord = Map<String, Value>;

/// Decode a value that may hold JSON inside a string.
/// Null, blank strings and strings that are not valid JSON yield `None`.
pub fn decode_embedded(value: &Value) -> Option<Cow<'_, Value>> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            serde_json::from_str::<Value>(trimmed).ok().map(Cow::Owned)
        }
        other => Some(Cow::Borrowed(other)),
    }
}

/// Normalize a value to a list; anything that is not (or does not decode to) an array is empty
pub fn as_list(value: &Value) -> Vec<Value> {
    match decode_embedded(value).map(Cow::into_owned) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Normalize a value to an object; anything that is not (or does not decode to) an object is empty
pub fn as_object(value: &Value) -> RawRecord {
    match decode_embedded(value).map(Cow::into_owned) {
        Some(Value::Object(map)) => map,
        _ => RawRecord::new(),
    }
}

/// Parse an amount permissively.
///
/// Numbers pass through; strings are trimmed, stripped of currency marks and
/// thousands separators, then parsed. Non-finite results are rejected.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches("Rs.")
                .trim_start_matches("Rs")
                .trim_start_matches(['₹', '$'])
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Render a scalar as a trimmed string. Objects, arrays, bools and blanks yield `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a bare identifier from a reference: either the id itself or a
/// wrapper object exposing one of the reference id fields.
pub fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => REFERENCE_ID_FIELDS
            .iter()
            .filter_map(|name| map.get(*name))
            .find_map(scalar_string),
        other => scalar_string(other),
    }
}

/// Flatten a list of references to bare string ids, dropping nulls and blanks
pub fn reference_ids(values: &[Value]) -> Vec<String> {
    values.iter().filter_map(reference_id).collect()
}

/// Walk a dotted path. Intermediate objects may themselves be JSON-encoded strings.
pub fn lookup_path<'a>(record: &'a Value, path: FieldPath) -> Option<Cow<'a, Value>> {
    let mut current = Cow::Borrowed(record);
    for segment in path {
        current = match current {
            Cow::Borrowed(value) => match decode_embedded(value)? {
                Cow::Borrowed(Value::Object(map)) => Cow::Borrowed(map.get(*segment)?),
                Cow::Owned(Value::Object(mut map)) => Cow::Owned(map.remove(*segment)?),
                _ => return None,
            },
            Cow::Owned(value) => match decode_embedded(&value).map(Cow::into_owned)? {
                Value::Object(mut map) => Cow::Owned(map.remove(*segment)?),
                _ => return None,
            },
        };
    }
    Some(current)
}

/// First parseable amount over an ordered list of paths
pub fn first_amount_at(record: &Value, paths: &[FieldPath]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| lookup_path(record, *path))
        .find_map(|value| parse_amount(&value))
}

/// A raw record together with its decoded nested blobs.
///
/// Lookups check every candidate name at the top level before falling back to
/// the nested blobs, in `NESTED_BLOBS` order.
pub struct RecordView<'a> {
    top: Cow<'a, RawRecord>,
    nested: Vec<RawRecord>,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Value) -> Self {
        let top = match record {
            Value::Object(map) => Cow::Borrowed(map),
            other => Cow::Owned(as_object(other)),
        };
        let nested = NESTED_BLOBS
            .iter()
            .filter_map(|name| top.get(*name))
            .map(as_object)
            .filter(|map| !map.is_empty())
            .collect();
        Self { top, nested }
    }

    fn layers(&self) -> impl Iterator<Item = &RawRecord> {
        std::iter::once(&*self.top).chain(self.nested.iter())
    }

    /// First candidate, in layer then name order, that `extract` accepts.
    /// Candidates of the wrong shape are skipped so later names still get a chance.
    pub fn find<'s, T>(
        &'s self,
        names: &[&str],
        extract: impl Fn(&'s Value) -> Option<T>,
    ) -> Option<T> {
        self.layers().find_map(|layer| {
            names
                .iter()
                .filter_map(|name| layer.get(*name))
                .find_map(&extract)
        })
    }

    /// First present value among `names`. Null and blank strings count as absent.
    pub fn get(&self, names: &[&str]) -> Option<&Value> {
        self.find(names, |value| (!is_blank(value)).then_some(value))
    }

    pub fn string(&self, names: &[&str]) -> Option<String> {
        self.find(names, scalar_string)
    }

    /// First present value among `names` that parses as an amount
    pub fn amount(&self, names: &[&str]) -> Option<f64> {
        self.find(names, parse_amount)
    }

    /// First candidate that decodes to a non-empty list
    pub fn list(&self, names: &[&str]) -> Vec<Value> {
        self.find(names, |value| Some(as_list(value)).filter(|items| !items.is_empty()))
            .unwrap_or_default()
    }

    /// First candidate that decodes to a non-empty object
    pub fn object(&self, names: &[&str]) -> RawRecord {
        self.find(names, |value| Some(as_object(value)).filter(|map| !map.is_empty()))
            .unwrap_or_default()
    }

    pub fn reference(&self, names: &[&str]) -> Option<String> {
        self.find(names, reference_id)
    }

    pub fn reference_list(&self, names: &[&str]) -> Vec<String> {
        reference_ids(&self.list(names))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
