//! Scripted provider for tests and dry runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use examforge_core::traits::{GenerateRequest, GenerateResponse, LlmProvider};

/// A provider that replays scripted replies instead of calling a service.
///
/// Queued replies are served first, in order; once the queue is empty every
/// call gets the default reply. An `Err` reply makes the call fail.
pub struct MockProvider {
    queue: Mutex<VecDeque<Result<String, String>>>,
    default_reply: Result<String, String>,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Serve `replies` in order, then fail every further call.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            default_reply: Err("no scripted reply left".to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always return the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default_reply: Ok(response.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Fail every call with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default_reply: Err(message.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        let reply = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            Ok(content) => Ok(GenerateResponse {
                content,
                model: request.model.clone(),
                latency_ms: 1,
            }),
            Err(message) => Err(anyhow::anyhow!(message)),
        }
    }
}
