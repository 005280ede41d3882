//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::decode::JsonDecoder;
use crate::error::{Error, Result};
use crate::metabase::{
    MetabaseClient, SearchParameters, SearchResult, LIMIT_PARAM, QUERY_PARAM,
};
use crate::output::{
    aggregate_index_terms, articles_table, index_terms_table, write_articles_json, write_parquet,
};
use crate::types::{ExportFormat, METABASE_SEARCH_KEY};
use crate::webservices::{convert_xml_content, Endpoint, WebServicesClient};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = ClientConfig::load(self.cli.config.as_deref())?;
        let store = CredentialStore::new(&config.credentials_path);

        match &self.cli.command {
            Commands::Search {
                query,
                limit,
                params,
                full,
                output,
                format,
                fields,
            } => {
                let mut search_params = Self::search_parameters(&store, query, limit, params)?;
                self.search(
                    &config,
                    &mut search_params,
                    *full,
                    output.as_deref(),
                    *format,
                    fields,
                )
                .await
            }
            Commands::RateLimits => self.rate_limits(&config, &store).await,
            Commands::IndexTerms {
                query,
                params,
                domains,
                full,
                output,
            } => {
                let mut search_params = Self::search_parameters(&store, query, &None, params)?;
                self.index_terms(&config, &mut search_params, domains, *full, output.as_deref())
                    .await
            }
            Commands::SetKey { name, value } => {
                store.set(name, value)?;
                info!(name = %name, path = %store.path().display(), "Secret stored");
                Ok(())
            }
            Commands::Call {
                endpoint,
                params,
                xml_content,
                records,
            } => {
                self.call(&config, &store, *endpoint, params, *xml_content, records.as_deref())
                    .await
            }
        }
    }

    /// Build search parameters from command-line values
    fn search_parameters(
        store: &CredentialStore,
        query: &str,
        limit: &Option<String>,
        params: &[(String, String)],
    ) -> Result<SearchParameters> {
        let mut pairs: Vec<(String, String)> = params.to_vec();
        pairs.push((QUERY_PARAM.to_string(), query.to_string()));
        if let Some(limit) = limit {
            pairs.push((LIMIT_PARAM.to_string(), limit.clone()));
        }
        SearchParameters::from_map(pairs, store)
    }

    /// Fetch one page or the full dataset
    async fn fetch(
        client: &MetabaseClient,
        params: &mut SearchParameters,
        full: bool,
    ) -> Result<SearchResult> {
        if full {
            client.search_all(params).await
        } else {
            Ok(SearchResult::from(client.search(params).await?))
        }
    }

    async fn search(
        &self,
        config: &ClientConfig,
        params: &mut SearchParameters,
        full: bool,
        output: Option<&Path>,
        format: ExportFormat,
        fields: &[String],
    ) -> Result<()> {
        let client = MetabaseClient::new(config)?;

        let result = match Self::fetch(&client, params, full).await {
            Ok(result) => result,
            Err(e) => {
                // Keep whatever was gathered before a pagination abort
                if let (Some(partial), Some(path)) = (e.partial_result(), output) {
                    warn!(
                        articles = partial.len(),
                        "Pagination aborted, exporting partial result"
                    );
                    Self::export(partial, path, format, fields)?;
                }
                return Err(e);
            }
        };

        info!(total_results = result.total_results, "Search finished");
        match output {
            Some(path) => Self::export(&result, path, format, fields),
            None => self.output_message(&result),
        }
    }

    fn export(
        result: &SearchResult,
        path: &Path,
        format: ExportFormat,
        fields: &[String],
    ) -> Result<()> {
        match format {
            ExportFormat::Json => {
                write_articles_json(path, result.articles())?;
            }
            ExportFormat::Parquet => {
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                let batch = articles_table(result.articles(), &fields)?;
                write_parquet(path, &batch, None)?;
            }
        }
        Ok(())
    }

    async fn rate_limits(&self, config: &ClientConfig, store: &CredentialStore) -> Result<()> {
        let api_key = store.get_or_prompt(METABASE_SEARCH_KEY)?;
        let client = MetabaseClient::new(config)?;
        for limit in client.rate_limits(&api_key).await? {
            self.output_message(&limit)?;
        }
        Ok(())
    }

    async fn index_terms(
        &self,
        config: &ClientConfig,
        params: &mut SearchParameters,
        domains: &[String],
        full: bool,
        output: Option<&Path>,
    ) -> Result<()> {
        let client = MetabaseClient::new(config)?;
        let result = Self::fetch(&client, params, full).await?;

        let domains: Vec<&str> = domains.iter().map(String::as_str).collect();
        let terms = aggregate_index_terms(result.articles(), &domains);
        if terms.is_empty() {
            info!("No index terms to show");
        }

        match output {
            Some(path) => {
                write_parquet(path, &index_terms_table(&terms)?, None)?;
                Ok(())
            }
            None => terms.iter().try_for_each(|term| self.output_message(term)),
        }
    }

    async fn call(
        &self,
        config: &ClientConfig,
        store: &CredentialStore,
        endpoint: Endpoint,
        params: &[(String, String)],
        xml_content: bool,
        records: Option<&str>,
    ) -> Result<()> {
        let client = WebServicesClient::from_secrets(config, store)?;
        let mut data = client.call(endpoint, params.iter().cloned()).await?;

        if xml_content {
            convert_xml_content(&mut data)?;
        }

        match records {
            Some(path) => JsonDecoder::with_path(path)
                .select(data)
                .iter()
                .try_for_each(|record| self.output_message(record)),
            None => self.output_message(&data),
        }
    }

    /// Print one JSON message per line
    fn output_message<T: Serialize + ?Sized>(&self, msg: &T) -> Result<()> {
        let line = serde_json::to_string(msg)
            .map_err(|e| Error::output(format!("Failed to serialize output: {e}")))?;
        println!("{line}");
        Ok(())
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("command", &self.cli.command)
            .finish_non_exhaustive()
    }
}
