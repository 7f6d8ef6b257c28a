//! 通知分发器 - 将批次打包成一个请求投递出去

use std::sync::Arc;

use tracing::{error, info, warn};

use super::batch::NotificationBatch;
use super::channel::{FormattedMessage, PayloadEncoding, SendResult, WebhookRequest, WebhookTransport};
use super::payload::WebhookPayload;
use super::webhook::HttpTransport;
use crate::config::{Destination, NotifierConfig};
use crate::error::DeliveryError;

/// 通知分发器
///
/// 每个非空批次恰好一次出站请求；失败不重试，批次直接丢弃。
pub struct NotificationDispatcher {
    channel: String,
    destination: Destination,
    attachment: Option<String>,
    verify_tls: bool,
    encoding: PayloadEncoding,
    transport: Arc<dyn WebhookTransport>,
}

impl NotificationDispatcher {
    /// 使用指定传输创建分发器
    pub fn new(config: &NotifierConfig, transport: Arc<dyn WebhookTransport>) -> Self {
        Self {
            channel: config.channel.clone(),
            destination: config.destination.clone(),
            attachment: config.attachment.clone(),
            verify_tls: config.verify_tls,
            encoding: config.encoding,
            transport,
        }
    }

    /// 使用 reqwest 传输创建分发器
    pub fn from_config(config: &NotifierConfig) -> Result<Self, DeliveryError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// 用本实例的目标配置包装一批消息
    pub fn batch(&self, messages: Vec<FormattedMessage>) -> NotificationBatch {
        NotificationBatch {
            channel: self.channel.clone(),
            destination: self.destination.clone(),
            attachment: self.attachment.clone(),
            verify_tls: self.verify_tls,
            messages,
        }
    }

    /// 投递批次
    ///
    /// 错误只记录日志，不向上传播。
    pub fn dispatch(&self, batch: NotificationBatch) -> SendResult {
        if batch.is_empty() {
            return SendResult::Skipped("empty batch".to_string());
        }

        let url = match &batch.destination {
            Destination::Webhook(url) => url.clone(),
            Destination::Token(_) => {
                warn!(
                    messages = batch.messages.len(),
                    "Token delivery is not implemented, dropping batch"
                );
                return SendResult::Skipped("token delivery not implemented".to_string());
            }
        };

        let request = WebhookRequest {
            url,
            verify_tls: batch.verify_tls,
            encoding: self.encoding,
            payload: WebhookPayload::from_batch(&batch),
        };

        match self.transport.post(&request) {
            Ok(()) => {
                info!(
                    transport = self.transport.name(),
                    channel = %batch.channel,
                    messages = batch.messages.len(),
                    "Sent notification over webhook"
                );
                SendResult::Sent
            }
            Err(e) => {
                error!(
                    transport = self.transport.name(),
                    channel = %batch.channel,
                    messages = batch.messages.len(),
                    error = %e,
                    "Webhook delivery failed, batch dropped"
                );
                SendResult::Failed(e.to_string())
            }
        }
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }
}
