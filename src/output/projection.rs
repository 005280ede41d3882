//! Tabular projections of search results
//!
//! Articles become one row per article; index terms are flattened across
//! articles and counted per term name.

use super::schema::json_to_arrow;
use crate::error::{Error, Result};
use crate::metabase::{Article, IndexTerm};
use arrow::array::{ArrayRef, Int64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// An index term with the number of times it occurs across a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTermCount {
    /// Term name
    pub name: String,
    /// Domains of the first occurrence
    pub domains: Vec<String>,
    /// Occurrences across all articles
    pub count: usize,
}

/// Articles as a RecordBatch
///
/// With an empty `fields` every field becomes a column. Otherwise only the
/// named fields are kept, in the given order; naming a field no article has is
/// an error.
pub fn articles_table(articles: &[Article], fields: &[&str]) -> Result<RecordBatch> {
    let records: Vec<Value> = articles
        .iter()
        .map(|a| Value::Object(a.fields().clone()))
        .collect();
    let batch = json_to_arrow(&records, None)?;

    if fields.is_empty() {
        return Ok(batch);
    }

    if articles.is_empty() {
        let schema = Schema::new(
            fields
                .iter()
                .map(|name| Field::new(*name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        );
        return Ok(RecordBatch::new_empty(Arc::new(schema)));
    }

    let schema = batch.schema();
    let indices = fields
        .iter()
        .map(|name| {
            schema
                .index_of(name)
                .map_err(|_| Error::output(format!("Unknown article field: {name}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(batch.project(&indices)?)
}

/// Count index terms across articles
///
/// Terms without domains are ignored. Each name keeps the domains of its first
/// occurrence. The result is ordered by count, highest first; ties keep the
/// order in which names first appeared. A non-empty `domains` filter keeps
/// only terms sharing at least one domain with it (compared upper-cased).
pub fn aggregate_index_terms(articles: &[Article], domains: &[&str]) -> Vec<IndexTermCount> {
    let mut counts: Vec<IndexTermCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for term in articles.iter().flat_map(Article::index_terms) {
        let Some(term_domains) = term.domains else {
            continue;
        };
        if let Some(&pos) = positions.get(&term.name) {
            counts[pos].count += 1;
            continue;
        }
        positions.insert(term.name.clone(), counts.len());
        counts.push(IndexTermCount {
            name: term.name,
            domains: term_domains,
            count: 1,
        });
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    let filter = domain_filter(domains);
    if !filter.is_empty() {
        counts.retain(|term| shares_domain(&term.domains, &filter));
    }

    debug!(terms = counts.len(), "Aggregated index terms");
    counts
}

/// Index terms of one article, without aggregation
///
/// Terms without domains are dropped; `domains` filters as in
/// [`aggregate_index_terms`].
pub fn article_index_terms(article: &Article, domains: &[&str]) -> Vec<IndexTerm> {
    let filter = domain_filter(domains);
    article
        .index_terms()
        .into_iter()
        .filter(|term| match &term.domains {
            None => false,
            Some(term_domains) => filter.is_empty() || shares_domain(term_domains, &filter),
        })
        .collect()
}

/// Aggregated index terms as a RecordBatch with `name`, `domains` and `count` columns
pub fn index_terms_table(terms: &[IndexTermCount]) -> Result<RecordBatch> {
    let names: StringArray = terms.iter().map(|t| Some(t.name.as_str())).collect();

    let mut domains = ListBuilder::new(StringBuilder::new());
    for term in terms {
        for domain in &term.domains {
            domains.values().append_value(domain);
        }
        domains.append(true);
    }

    let counts: Int64Array = terms
        .iter()
        .map(|t| Some(i64::try_from(t.count).unwrap_or(i64::MAX)))
        .collect();

    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new(
            "domains",
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            false,
        ),
        Field::new("count", DataType::Int64, false),
    ]);

    let columns: Vec<ArrayRef> = vec![
        Arc::new(names),
        Arc::new(domains.finish()),
        Arc::new(counts),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

fn domain_filter(domains: &[&str]) -> Vec<String> {
    domains.iter().map(|d| d.to_uppercase()).collect()
}

fn shares_domain(term_domains: &[String], filter: &[String]) -> bool {
    term_domains.iter().any(|d| filter.contains(d))
}
