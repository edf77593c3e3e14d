// src/api/state.rs
use crate::config::AppConfig;
use crate::verifier::{GobraVerifier, Verifier};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Client,
    pub verifier: Arc<dyn Verifier>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let verifier = Arc::new(GobraVerifier::new(config.clone()));
        Self::with_verifier(config, verifier)
    }

    pub fn with_verifier(config: Arc<AppConfig>, verifier: Arc<dyn Verifier>) -> Self {
        Self {
            config,
            client: Client::new(),
            verifier,
        }
    }
}
