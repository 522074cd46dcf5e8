use std::thread;
use std::time::Duration;

use casecheck_config::PromptSettings;
use casecheck_core::{AnalysisOutcome, TestCaseRecord};

use crate::client::{ChatMessage, ChatRequest, ChatTransport};
use crate::error::AiError;
use crate::template::render_user_message;

/// Attempt budget and backoff for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause after the first failure; doubled after each further failure.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Pause after failed attempt `attempt` (1-based), or `None` after the
    /// last one.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.initial_backoff * 2u32.saturating_pow(attempt - 1))
    }
}

/// Turns test cases into outcomes. Never fails: a terminal error becomes an
/// `ERROR:` verdict with zero tokens.
pub struct Analyzer<T> {
    transport: T,
    model: String,
    prompt: PromptSettings,
    policy: RetryPolicy,
    sleep: Box<dyn Fn(Duration)>,
}

impl<T: ChatTransport> Analyzer<T> {
    pub fn new(transport: T, model: impl Into<String>, prompt: PromptSettings) -> Self {
        Self {
            transport,
            model: model.into(),
            prompt,
            policy: RetryPolicy::default(),
            sleep: Box::new(thread::sleep),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the backoff pause, e.g. to record delays instead of sleeping.
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(&self, record: &TestCaseRecord) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.prompt.system_message.as_str()),
                ChatMessage::user(render_user_message(&self.prompt.user_template, record)),
            ],
            max_tokens: self.prompt.max_tokens,
            temperature: self.prompt.temperature,
        }
    }

    pub fn analyze(&self, record: &TestCaseRecord) -> AnalysisOutcome {
        let request = self.build_request(record);
        let mut attempt = 1;

        loop {
            tracing::debug!(id = %record.id, attempt, model = %request.model, "sending chat completion");
            match self.transport.complete(&request) {
                Ok(resp) => return AnalysisOutcome::new(resp.content, resp.total_tokens),
                Err(e) => match self.policy.delay_after(attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            id = %record.id,
                            attempt,
                            max = self.policy.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "analysis failed, retrying"
                        );
                        (self.sleep)(delay);
                        attempt += 1;
                    }
                    None => return self.give_up(record, attempt, e),
                },
            }
        }
    }

    fn give_up(&self, record: &TestCaseRecord, attempts: u32, err: AiError) -> AnalysisOutcome {
        tracing::warn!(id = %record.id, attempts, error = %err, "analysis failed");
        AnalysisOutcome::error(format!("{} (after {} attempts)", err, attempts))
    }
}
