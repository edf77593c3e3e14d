// src/verifier.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::invocation::{Invocation, WorkArea};
use crate::models::{VerificationRequest, VerificationResponse};
use crate::runner;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Anything that can turn submitted source into a verdict.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResponse>;
}

/// Runs Gobra as a child JVM, one process and one scratch directory per request.
pub struct GobraVerifier {
    config: Arc<AppConfig>,
}

impl GobraVerifier {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Verifier for GobraVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResponse> {
        let run_id = Uuid::new_v4().to_string();
        let work_area = WorkArea::create(&run_id)?;

        let invocation = Invocation::build(&self.config, request, &work_area)?;
        log::info!("[{}] running {}", run_id, invocation.command_line());

        let outcome = runner::execute(&invocation, self.config.timeout).await?;
        let response = runner::reconcile(&run_id, &invocation, outcome).await?;

        if let Err(e) = work_area.close() {
            log::warn!("[{}] failed to remove work area: {}", run_id, e);
        }

        Ok(response)
    }
}
