//! Webhook HTTP 客户端
//!
//! 通过 reqwest blocking 客户端 POST 到 Rocket.Chat / Slack incoming webhook

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::channel::{PayloadEncoding, WebhookRequest, WebhookTransport};
use crate::error::DeliveryError;

/// 默认超时时间 (秒)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP 传输
///
/// 校验与不校验证书的两个客户端在创建时一次构建好。
#[derive(Debug)]
pub struct HttpTransport {
    verified: Client,
    unverified: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let build = |accept_invalid: bool| {
            Client::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(accept_invalid)
                .build()
                .map_err(|e| DeliveryError::Client(e.to_string()))
        };

        Ok(Self {
            verified: build(false)?,
            unverified: build(true)?,
        })
    }

    fn client(&self, verify_tls: bool) -> &Client {
        if verify_tls {
            &self.verified
        } else {
            &self.unverified
        }
    }
}

impl WebhookTransport for HttpTransport {
    fn name(&self) -> &str {
        "webhook"
    }

    fn post(&self, request: &WebhookRequest) -> Result<(), DeliveryError> {
        let builder = self.client(request.verify_tls).post(&request.url);
        let builder = match request.encoding {
            PayloadEncoding::Json => builder.json(&request.payload),
            PayloadEncoding::Form => {
                let document = serde_json::to_string(&request.payload)?;
                builder.form(&[("payload", document)])
            }
        };

        let start = std::time::Instant::now();
        let response = builder.send()?;
        let status = response.status();
        debug!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            verify_tls = request.verify_tls,
            "Webhook request completed"
        );

        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::payload::WebhookPayload;

    #[test]
    fn test_http_transport_builds() {
        let transport = HttpTransport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).unwrap();
        assert_eq!(transport.name(), "webhook");
    }

    #[test]
    fn test_connection_refused_is_delivery_error() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let request = WebhookRequest {
            // 端口 1 上不会有服务
            url: "http://127.0.0.1:1/hooks/none".to_string(),
            verify_tls: true,
            encoding: PayloadEncoding::Json,
            payload: WebhookPayload {
                channel: "#ops".to_string(),
                text: "x".to_string(),
                username: "rocketpy".to_string(),
                icon_emoji: ":sos:".to_string(),
                link_names: 1,
                attachments: vec![],
                mrkdwn: true,
            },
        };

        assert!(matches!(transport.post(&request), Err(DeliveryError::Http(_))));
    }
}
