//! 消息类型与 webhook 传输 trait

use super::payload::WebhookPayload;
use super::severity::Severity;
use crate::error::DeliveryError;

/// 格式化后的通知消息
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage {
    /// 消息内容（已格式化，含 emoji）
    pub text: String,
    /// 严重程度
    pub severity: Severity,
}

impl FormattedMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（空批次、token 渠道未实现）
    Skipped(String),
    /// 发送失败，本批次已丢弃
    Failed(String),
}

/// 请求体编码方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// `application/json` 请求体
    #[default]
    Json,
    /// 表单编码，JSON 文档放在 `payload` 字段
    Form,
}

/// 一次 webhook 投递请求
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    pub url: String,
    /// 是否校验 TLS 证书
    pub verify_tls: bool,
    pub encoding: PayloadEncoding,
    pub payload: WebhookPayload,
}

/// Webhook 传输 trait
///
/// 每次调用对应恰好一个出站 HTTP 请求。
pub trait WebhookTransport: Send + Sync {
    /// 传输名称（用于日志）
    fn name(&self) -> &str;

    /// 同步投递，2xx 视为成功
    fn post(&self, request: &WebhookRequest) -> Result<(), DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_message_new() {
        let msg = FormattedMessage::new("test", Severity::High);
        assert_eq!(msg.text, "test");
        assert_eq!(msg.severity, Severity::High);
    }

    #[test]
    fn test_default_encoding_is_json() {
        assert_eq!(PayloadEncoding::default(), PayloadEncoding::Json);
    }
}
