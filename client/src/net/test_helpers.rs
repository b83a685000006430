//! Recording transport for gateway and endpoint tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub type Hook = Box<dyn Fn() + Send + Sync>;

/// Replays queued responses in order (default `200 {}`) and records every
/// request it receives.
#[derive(Default)]
pub struct MockTransport {
    pub responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    pub sent: Mutex<Vec<HttpRequest>>,
    /// Runs after the request is recorded and before the response returns.
    pub before_respond: Mutex<Option<Hook>>,
}

impl MockTransport {
    pub fn with(responses: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self { responses: Mutex::new(responses.into()), ..Self::default() })
    }

    pub fn reply(status: u16, body: &str) -> Arc<Self> {
        Self::with(vec![Ok(HttpResponse::new(status, body))])
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        tokio::task::yield_now().await;
        if let Some(hook) = self.before_respond.lock().unwrap().as_ref() {
            hook();
        }
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }
}
