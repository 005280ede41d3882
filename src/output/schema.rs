//! Arrow schema inference and JSON to Arrow conversion
//!
//! Columns appear in the order their field is first seen across records.
//! Conflicting types widen (Int64 + Float64 to Float64) or fall back to Utf8,
//! where non-string values are stored as their JSON text.

use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, StringArray, StructArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer an Arrow schema from a set of JSON records
///
/// Every field is nullable. Fields that are null in every record are typed
/// as Utf8 so the schema can always be written to Parquet.
pub fn infer_schema(records: &[Value]) -> Result<Schema> {
    let mut order: Vec<String> = Vec::new();
    let mut field_types: HashMap<String, DataType> = HashMap::new();

    for record in records {
        let Value::Object(obj) = record else {
            return Err(Error::output(format!(
                "Expected a JSON object per record, found {}",
                kind_of(record)
            )));
        };
        for (key, value) in obj {
            let inferred = infer_type(value);
            match field_types.get_mut(key) {
                Some(existing) => *existing = merge_types(existing, &inferred),
                None => {
                    order.push(key.clone());
                    field_types.insert(key.clone(), inferred);
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let dtype = field_types.remove(&name).unwrap_or(DataType::Utf8);
            Field::new(name, concrete_type(dtype), true)
        })
        .collect();

    Ok(Schema::new(fields))
}

/// Convert JSON records to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the data.
pub fn json_to_arrow(records: &[Value], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = match schema {
        Some(schema) => schema.clone(),
        None => infer_schema(records)?,
    };

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema)));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| record.get(field.name()))
            .collect();
        columns.push(build_array(&values, field.data_type())?);
    }

    if columns.is_empty() {
        // Records without any field still count as rows
        let options =
            arrow::record_batch::RecordBatchOptions::new().with_row_count(Some(records.len()));
        return RecordBatch::try_new_with_options(Arc::new(schema), columns, &options)
            .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")));
    }

    RecordBatch::try_new(Arc::new(schema), columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(arr) => {
            let element_type = arr
                .iter()
                .map(infer_type)
                .reduce(|a, b| merge_types(&a, &b))
                .unwrap_or(DataType::Null);
            list_of(element_type)
        }
        Value::Object(obj) => {
            let fields: Vec<Field> = obj
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

fn list_of(element_type: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", element_type, true)))
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        (DataType::List(a), DataType::List(b)) => {
            list_of(merge_types(a.data_type(), b.data_type()))
        }

        // Objects with different keys: union of the keys, first-seen order
        (DataType::Struct(a), DataType::Struct(b)) => {
            let mut fields: Vec<Field> = a.iter().map(|f| f.as_ref().clone()).collect();
            for field in b {
                match fields.iter_mut().find(|f| f.name() == field.name()) {
                    Some(existing) => {
                        let merged = merge_types(existing.data_type(), field.data_type());
                        *existing = Field::new(field.name(), merged, true);
                    }
                    None => fields.push(field.as_ref().clone()),
                }
            }
            DataType::Struct(Fields::from(fields))
        }

        _ => DataType::Utf8,
    }
}

/// Replace types Parquet cannot store (all-null columns, field-less structs) with Utf8
fn concrete_type(dtype: DataType) -> DataType {
    match dtype {
        DataType::Null => DataType::Utf8,
        DataType::List(item) => list_of(concrete_type(item.data_type().clone())),
        DataType::Struct(fields) if fields.is_empty() => DataType::Utf8,
        DataType::Struct(fields) => DataType::Struct(
            fields
                .iter()
                .map(|f| Field::new(f.name(), concrete_type(f.data_type().clone()), true))
                .collect::<Vec<_>>()
                .into(),
        ),
        other => other,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        // Utf8, plus anything a caller-supplied schema asks for that JSON has no
        // native form of
        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Ok(Arc::new(arr))
        }
    }
}

/// Build a list array from JSON arrays; non-array values become null entries
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = Vec::with_capacity(values.len() + 1);
    let mut validity: Vec<bool> = Vec::with_capacity(values.len());
    offsets.push(0);

    for value in values {
        match value {
            Some(Value::Array(arr)) => {
                all_items.extend(arr.iter().map(Some));
                validity.push(true);
            }
            _ => validity.push(false),
        }
        let offset = i32::try_from(all_items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let list_array = ListArray::try_new(
        Arc::clone(field),
        OffsetBuffer::new(offsets.into()),
        items_array,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects; non-object values become null entries
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| v.and_then(|v| v.as_object()).and_then(|obj| obj.get(field.name())))
            .collect();
        child_arrays.push(build_array(&child_values, field.data_type())?);
    }

    let validity: Vec<bool> = values
        .iter()
        .map(|v| matches!(v, Some(Value::Object(_))))
        .collect();

    let struct_array =
        StructArray::try_new(fields.clone(), child_arrays, Some(NullBuffer::from(validity)))?;
    Ok(Arc::new(struct_array))
}
