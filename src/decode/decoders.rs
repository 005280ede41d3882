//! Record selection over decoded JSON

use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// Selects the records of a JSON body, optionally under a dot path
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot path to the records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Records of a decoded body
    ///
    /// An array yields its items, `null` or a missing path yields nothing, and
    /// any other value is a single record.
    pub fn select(&self, value: Value) -> Vec<Value> {
        let selected = match &self.record_path {
            Some(path) => match extract_path(&value, path) {
                Some(v) => v.clone(),
                None => return vec![],
            },
            None => value,
        };

        match selected {
            Value::Array(arr) => arr,
            Value::Null => vec![],
            other => vec![other],
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Follow a dot path like `$.data.items`, `value[0].Document` or `articles[-1]`
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        let (name, index) = match part.find('[') {
            Some(pos) => (&part[..pos], Some(part[pos + 1..].strip_suffix(']')?)),
            None => (part, None),
        };

        if !name.is_empty() {
            current = current.get(name)?;
        }

        if let Some(index) = index {
            let index: i64 = index.parse().ok()?;
            let arr = current.as_array()?;
            let idx = if index < 0 {
                arr.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                index as usize
            };
            current = arr.get(idx)?;
        }
    }

    Some(current)
}
