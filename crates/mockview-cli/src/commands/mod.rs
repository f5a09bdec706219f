pub mod evaluate;
pub mod history;
pub mod init;
pub mod meeting;
pub mod practice;
pub mod report;
pub mod validate;

use std::sync::Arc;

use anyhow::Result;

use mockview_core::evaluator::Evaluator;
use mockview_core::generation::QuestionGenerator;
use mockview_core::scoring::LocalScorer;
use mockview_core::store::JsonFileStore;
use mockview_providers::MockviewConfig;

use crate::ConfigArgs;

/// Load the config named by `--config`, or the default locations.
pub fn load(args: &ConfigArgs) -> Result<MockviewConfig> {
    mockview_providers::load_config_from(args.config.as_deref())
}

/// Open the session store, preferring `--store` over `store_path`.
pub fn open_store(args: &ConfigArgs, config: &MockviewConfig) -> JsonFileStore {
    let path = args
        .store
        .clone()
        .unwrap_or_else(|| config.store_path.clone());
    JsonFileStore::open(path)
}

/// Build the evaluator, and the question generator when one is enabled.
pub fn model_services(
    config: &MockviewConfig,
    local_only: bool,
) -> Result<(Evaluator, Option<QuestionGenerator>)> {
    let scorer = LocalScorer::new(config.scoring.clone());
    let provider = if local_only {
        None
    } else {
        config.model_provider()?
    };

    let Some(provider) = provider else {
        return Ok((Evaluator::local(scorer), None));
    };

    tracing::info!(provider = provider.name(), model = %config.model, "using model provider");
    let evaluator = if config.use_model_scoring {
        Evaluator::with_model(
            scorer,
            Arc::clone(&provider),
            config.model.clone(),
            config.model_timeout(),
        )
    } else {
        Evaluator::local(scorer)
    };
    let generator = config
        .use_model_generation
        .then(|| QuestionGenerator::new(provider, config.model.clone(), config.model_timeout()));

    Ok((evaluator, generator))
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(s: Option<&str>) -> Vec<String> {
    s.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
