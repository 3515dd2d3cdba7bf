//! Mock implementations for testing
//!
//! Provides a scripted `LlmProvider` so the turn pipeline and the channel can
//! be exercised without a real completion service.

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
    ToolCall,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One canned reply from the mock provider
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Handoff { name: String, arguments: Value },
    Failure(String),
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        MockReply::Text(content.into())
    }

    pub fn handoff(name: impl Into<String>, arguments: Value) -> Self {
        MockReply::Handoff {
            name: name.into(),
            arguments,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        MockReply::Failure(message.into())
    }
}

/// Mock LLM provider for testing
///
/// Replies are served in order and wrap around once exhausted, so a single
/// reply repeats forever. Every request is recorded.
#[derive(Debug)]
pub struct MockLlmProvider {
    pub replies: Vec<MockReply>,
    pub current_reply: Arc<Mutex<usize>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub should_fail: bool,
}

impl MockLlmProvider {
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            current_reply: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub fn single_response(response: impl Into<String>) -> Self {
        Self::scripted(vec![MockReply::text(response)])
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::scripted(vec![])
        }
    }

    pub async fn get_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    fn completion(content: Option<String>, tool_calls: Option<Vec<ToolCall>>) -> CompletionResponse {
        CompletionResponse {
            finish_reason: if tool_calls.is_some() {
                FinishReason::ToolCalls
            } else {
                FinishReason::Stop
            },
            content,
            model: "mock-model".to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            tool_calls,
            metadata: HashMap::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().await.push(request);

        if self.should_fail {
            return Err(LlmError::RequestFailed("Mock LLM failure".to_string()));
        }

        let reply = {
            let mut current = self.current_reply.lock().await;
            let reply = if self.replies.is_empty() {
                MockReply::text("Mock response")
            } else {
                self.replies[*current % self.replies.len()].clone()
            };
            *current += 1;
            reply
        };

        match reply {
            MockReply::Text(content) => Ok(Self::completion(Some(content), None)),
            MockReply::Handoff { name, arguments } => Ok(Self::completion(
                None,
                Some(vec![ToolCall {
                    id: format!("call_{name}"),
                    name,
                    arguments,
                }]),
            )),
            MockReply::Failure(message) => Err(LlmError::ApiError(message)),
        }
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        if self.should_fail {
            Err(LlmError::RequestFailed(
                "Mock health check failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
