use std::sync::Arc;

use outfitter_agent::BriefParser;
use outfitter_core::catalog::{Catalog, RetailerDirectory};
use outfitter_core::config::{AppConfig, ConfigError};
use outfitter_core::errors::DomainError;
use thiserror::Error;
use tracing::info;

/// Everything the route layer needs, built once at startup. The catalog and
/// retailer directory are loaded into read-only structures here and never
/// mutated afterwards.
pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub directory: Arc<RetailerDirectory>,
    pub parser: Arc<BriefParser>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog integrity check failed: {0}")]
    Catalog(#[source] DomainError),
    #[error("brief parser setup failed: {0}")]
    Parser(anyhow::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(Catalog::builtin());
    let directory = Arc::new(RetailerDirectory::builtin());
    catalog.validate(&directory).map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        products = catalog.product_count(),
        retailers = directory.len(),
        "catalog and retailer directory loaded"
    );

    let parser = Arc::new(BriefParser::from_config(&config.llm).map_err(BootstrapError::Parser)?);
    info!(
        event_name = "system.bootstrap.parser_ready",
        correlation_id = "bootstrap",
        parsing_method = if parser.uses_llm() { "gemini_ai" } else { "rules" },
        "brief parser initialized"
    );

    Ok(Application { config, catalog, directory, parser })
}

#[cfg(test)]
mod tests {
    use outfitter_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use super::bootstrap_with_config;

    #[test]
    fn bootstrap_defaults_to_the_rule_based_parser() {
        let config = AppConfig::load(LoadOptions::default()).expect("default config loads");
        let app = bootstrap_with_config(config).expect("bootstrap should succeed");

        assert!(!app.parser.uses_llm());
        assert_eq!(app.catalog.product_count(), 20);
        assert_eq!(app.directory.len(), 4);
    }

    #[test]
    fn bootstrap_builds_the_llm_parser_when_enabled() {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                llm_enabled: Some(true),
                llm_api_key: Some("test-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config with llm overrides loads");

        let app = bootstrap_with_config(config).expect("bootstrap should succeed");
        assert!(app.parser.uses_llm());
        assert_eq!(app.parser.model(), Some("gemini-2.0-flash-lite"));
    }
}
