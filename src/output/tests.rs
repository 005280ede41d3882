//! Tests for output module

use super::*;
use crate::error::Error;
use crate::metabase::Article;
use arrow::array::{Array, Int64Array, ListArray, StringArray, StructArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use test_case::test_case;

fn article(value: serde_json::Value) -> Article {
    serde_json::from_value(value).unwrap()
}

fn sample_articles() -> Vec<Article> {
    vec![
        article(json!({
            "id": "1",
            "title": "Rates rise",
            "sequenceId": "100",
            "wordCount": 420,
            "source": {"name": "Daily", "country": "UK"},
            "indexTerms": [
                {"name": "Interest rates", "domains": ["SUBJECT"], "score": 90, "code": "A1"},
                {"name": "London", "domains": ["GEOGRAPHY"], "score": 60, "code": "G1"},
                {"name": "Unscored", "score": 10}
            ]
        })),
        article(json!({
            "id": "2",
            "title": "Markets calm",
            "sequenceId": "101",
            "wordCount": 380,
            "source": {"name": "Wire"},
            "indexTerms": [
                {"name": "London", "domains": ["GEOGRAPHY", "CITY"], "score": 70},
                {"name": "Bank of England", "domains": ["ORGANIZATION"], "score": 80}
            ]
        })),
        article(json!({
            "id": "3",
            "title": "Bank holds",
            "sequenceId": "102",
            "indexTerms": [
                {"name": "Bank of England", "domains": ["ORGANIZATION"]},
                {"name": "London", "domains": ["GEOGRAPHY"]},
                {"name": "Interest rates", "domains": ["SUBJECT"]}
            ]
        })),
    ]
}

// ============================================================================
// Schema Inference Tests
// ============================================================================

#[test]
fn test_infer_schema_empty() {
    let schema = infer_schema(&[]).unwrap();
    assert!(schema.fields().is_empty());
}

#[test]
fn test_infer_schema_keeps_first_seen_order() {
    let records = vec![
        json!({"title": "a", "id": 1}),
        json!({"id": 2, "body": "text", "title": "b"}),
    ];

    let schema = infer_schema(&records).unwrap();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["title", "id", "body"]);
    assert!(schema.fields().iter().all(|f| f.is_nullable()));
}

#[test_case(json!(1), json!(2.5), DataType::Float64 ; "int and float widen")]
#[test_case(json!(null), json!("x"), DataType::Utf8 ; "null takes other type")]
#[test_case(json!(null), json!(null), DataType::Utf8 ; "all null becomes utf8")]
#[test_case(json!(true), json!(false), DataType::Boolean ; "booleans")]
#[test_case(json!("1"), json!(1), DataType::Utf8 ; "conflict falls back to utf8")]
fn test_infer_schema_type_merging(first: serde_json::Value, second: serde_json::Value, expected: DataType) {
    let records = vec![json!({"v": first}), json!({"v": second})];
    let schema = infer_schema(&records).unwrap();
    assert_eq!(schema.field_with_name("v").unwrap().data_type(), &expected);
}

#[test]
fn test_infer_schema_merges_struct_keys() {
    let records = vec![
        json!({"source": {"name": "Daily"}}),
        json!({"source": {"name": "Wire", "country": "US"}}),
    ];

    let schema = infer_schema(&records).unwrap();
    let DataType::Struct(fields) = schema.field_with_name("source").unwrap().data_type() else {
        panic!("Expected Struct type");
    };
    let names: Vec<&str> = fields.iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["name", "country"]);
}

#[test]
fn test_infer_schema_empty_list_gets_item_type() {
    let records = vec![json!({"tags": []}), json!({"tags": ["a", "b"]})];
    let schema = infer_schema(&records).unwrap();
    let DataType::List(item) = schema.field_with_name("tags").unwrap().data_type() else {
        panic!("Expected List type");
    };
    assert_eq!(item.data_type(), &DataType::Utf8);
}

#[test]
fn test_infer_schema_rejects_non_objects() {
    let err = infer_schema(&[json!([1, 2])]).unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
}

// ============================================================================
// JSON to Arrow Tests
// ============================================================================

#[test]
fn test_json_to_arrow_with_nulls_and_missing_fields() {
    let records = vec![
        json!({"name": "Alice", "score": 10}),
        json!({"name": null}),
        json!({"score": 7}),
    ];

    let batch = json_to_arrow(&records, None).unwrap();
    assert_eq!(batch.num_rows(), 3);

    let names = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "Alice");
    assert!(names.is_null(1));
    assert!(names.is_null(2));

    let scores = batch
        .column(1)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert!(scores.is_null(1));
    assert_eq!(scores.value(2), 7);
}

#[test]
fn test_json_to_arrow_nested_struct_nulls() {
    let records = vec![json!({"source": {"name": "Daily"}}), json!({"source": null})];
    let batch = json_to_arrow(&records, None).unwrap();

    let source = batch
        .column(0)
        .as_any()
        .downcast_ref::<StructArray>()
        .unwrap();
    assert!(source.is_valid(0));
    assert!(source.is_null(1));
}

#[test]
fn test_json_to_arrow_lists() {
    let records = vec![json!({"tags": ["a", "b"]}), json!({"tags": "loose"}), json!({})];
    let batch = json_to_arrow(&records, None).unwrap();

    let tags = batch
        .column(0)
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(tags.value_length(0), 2);
    assert!(tags.is_null(1));
    assert!(tags.is_null(2));
}

#[test]
fn test_json_to_arrow_mixed_types_stored_as_text() {
    let records = vec![json!({"v": "x"}), json!({"v": {"k": 1}})];
    let batch = json_to_arrow(&records, None).unwrap();

    let values = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(values.value(0), "x");
    assert_eq!(values.value(1), r#"{"k":1}"#);
}

#[test]
fn test_json_to_arrow_empty() {
    let batch = json_to_arrow(&[], None).unwrap();
    assert_eq!(batch.num_rows(), 0);
}

#[test]
fn test_json_to_arrow_records_without_fields() {
    let batch = json_to_arrow(&[json!({}), json!({})], None).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 0);
}

// ============================================================================
// Projection Tests
// ============================================================================

#[test]
fn test_articles_table_all_fields() {
    let batch = articles_table(&sample_articles(), &[]).unwrap();
    assert_eq!(batch.num_rows(), 3);

    let schema = batch.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "title", "sequenceId", "wordCount", "source", "indexTerms"]
    );
}

#[test]
fn test_articles_table_selected_fields_in_order() {
    let batch = articles_table(&sample_articles(), &["title", "id"]).unwrap();

    let schema = batch.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["title", "id"]);

    let titles = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(titles.value(2), "Bank holds");
}

#[test]
fn test_articles_table_unknown_field() {
    let err = articles_table(&sample_articles(), &["title", "nope"]).unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn test_articles_table_no_articles() {
    let batch = articles_table(&[], &["title"]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.schema().field(0).name(), "title");
}

#[test]
fn test_aggregate_index_terms_counts_and_orders() {
    let terms = aggregate_index_terms(&sample_articles(), &[]);

    let summary: Vec<(&str, usize)> = terms.iter().map(|t| (t.name.as_str(), t.count)).collect();
    assert_eq!(
        summary,
        vec![
            ("London", 3),
            ("Interest rates", 2),
            ("Bank of England", 2),
        ]
    );
    // First occurrence wins
    assert_eq!(terms[0].domains, vec!["GEOGRAPHY".to_string()]);
}

#[test]
fn test_aggregate_index_terms_domain_filter_is_case_insensitive() {
    let terms = aggregate_index_terms(&sample_articles(), &["organization", "Subject"]);
    let names: Vec<&str> = terms.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Interest rates", "Bank of England"]);
}

#[test]
fn test_aggregate_index_terms_no_articles() {
    assert!(aggregate_index_terms(&[], &[]).is_empty());
}

#[test]
fn test_article_index_terms() {
    let articles = sample_articles();

    let terms = article_index_terms(&articles[0], &[]);
    let names: Vec<&str> = terms.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Interest rates", "London"]);

    let terms = article_index_terms(&articles[1], &["city"]);
    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].name, "London");
}

#[test]
fn test_index_terms_table() {
    let terms = aggregate_index_terms(&sample_articles(), &[]);
    let batch = index_terms_table(&terms).unwrap();

    assert_eq!(batch.num_rows(), 3);
    let counts = batch
        .column(2)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(counts.values().to_vec(), vec![3, 2, 2]);

    let domains = batch
        .column(1)
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(domains.value_length(0), 1);
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_write_articles_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("articles.json");

    let written = write_articles_json(&path, &sample_articles()).unwrap();
    assert_eq!(written, 3);

    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[1]["title"], json!("Markets calm"));
    assert!(contents.contains("\n  "));
}

#[test]
fn test_write_articles_json_skips_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("articles.json");

    assert_eq!(write_articles_json(&path, &[]).unwrap(), 0);
    assert!(!path.exists());
}

#[test]
fn test_write_parquet_roundtrip_row_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("articles.parquet");

    let batch = articles_table(&sample_articles(), &[]).unwrap();
    let rows = write_parquet(&path, &batch, None).unwrap();
    assert_eq!(rows, 3);

    let file = std::fs::File::open(&path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let total: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(total, 3);
}

#[test]
fn test_write_parquet_index_terms_with_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("terms.parquet");

    let batch = index_terms_table(&aggregate_index_terms(&sample_articles(), &[])).unwrap();
    let config = ParquetWriterConfig::new()
        .with_compression(parquet::basic::Compression::UNCOMPRESSED)
        .with_row_group_size(2);
    assert_eq!(write_parquet(&path, &batch, Some(&config)).unwrap(), 3);
    assert!(path.exists());
}

#[test]
fn test_write_parquet_bad_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.parquet");

    let batch = index_terms_table(&[]).unwrap();
    let err = write_parquet(&path, &batch, None).unwrap_err();
    assert_eq!(err.kind(), "OutputError");
}
