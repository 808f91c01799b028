//! Process-wide classifier initialization.
//!
//! Models are set up once at startup and shared read-only by all workers.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use modgate_pipeline::{
    Blacklist, ClassifierAdapter, ClassifierError, DecisionPipeline, HttpModelClient,
    ProfanityMatcher, WordListMatcher,
};

use crate::config::Config;

/// Build the decision pipeline from configuration.
///
/// Uses a blocking HTTP client, so call this off the async runtime.
pub fn build_pipeline(config: &Config) -> Result<DecisionPipeline, ClassifierError> {
    let models = Arc::new(HttpModelClient::new(
        &config.model_server_url,
        Duration::from_secs(config.model_timeout_secs),
    )?);

    let profanity: Arc<dyn ProfanityMatcher> = match &config.profanity_words {
        Some(path) => Arc::new(WordListMatcher::from_file(path)?),
        None => Arc::new(WordListMatcher::builtin()),
    };

    let blacklist = Blacklist::default();
    info!(
        model_server = %models.base_url(),
        blacklist_terms = blacklist.len(),
        "Classifier models initialized"
    );

    let adapter = ClassifierAdapter::new(models.clone(), models, profanity);
    Ok(DecisionPipeline::new(adapter, blacklist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_with_builtin_words() {
        let config = Config::try_parse_from(["modgate-server"]).unwrap();
        assert!(build_pipeline(&config).is_ok());
    }

    #[test]
    fn test_missing_word_list_fails_startup() {
        let config = Config::try_parse_from([
            "modgate-server",
            "--profanity-words",
            "/nonexistent/words.txt",
        ])
        .unwrap();
        assert!(matches!(
            build_pipeline(&config),
            Err(ClassifierError::WordList { .. })
        ));
    }
}
