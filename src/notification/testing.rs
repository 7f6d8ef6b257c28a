//! 测试用的记录型传输

use std::sync::Mutex;

use super::channel::{WebhookRequest, WebhookTransport};
use crate::error::DeliveryError;

pub struct RecordingTransport {
    requests: Mutex<Vec<WebhookRequest>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// 每次都返回 503
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<WebhookRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl WebhookTransport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    fn post(&self, request: &WebhookRequest) -> Result<(), DeliveryError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(DeliveryError::Status(503));
        }
        Ok(())
    }
}
