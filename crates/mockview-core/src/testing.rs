//! Test doubles shared by the unit tests in this crate.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::traits::{GenerateRequest, GenerateResponse, LlmProvider, TokenUsage};

pub(crate) enum Script {
    Reply(String),
    Fail,
    Hang,
}

/// Provider that answers every request the same way.
pub(crate) struct ScriptedProvider {
    script: Script,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub(crate) fn reply(content: &str) -> Self {
        Self::new(Script::Reply(content.to_string()))
    }

    pub(crate) fn failing() -> Self {
        Self::new(Script::Fail)
    }

    pub(crate) fn hanging() -> Self {
        Self::new(Script::Hang)
    }

    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(content) => Ok(GenerateResponse {
                content: content.clone(),
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 1,
            }),
            Script::Fail => Err(ProviderError::ApiError {
                status: 500,
                message: "scripted failure".into(),
            }
            .into()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::Timeout(3600).into())
            }
        }
    }
}
