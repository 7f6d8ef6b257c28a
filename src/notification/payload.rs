//! Webhook payload 构建
//!
//! Rocket.Chat / Slack incoming webhook 兼容格式：
//! ```json
//! {
//!   "channel": "#ops",
//!   "text": "...",
//!   "username": "rocketpy",
//!   "icon_emoji": ":sos:",
//!   "link_names": 1,
//!   "attachments": [{"text": "...", "color": "danger"}],
//!   "mrkdwn": true
//! }
//! ```

use serde::Serialize;

use super::batch::NotificationBatch;

/// 固定的发送者名称
pub const SENDER_NAME: &str = "rocketpy";
pub const SENDER_ICON: &str = ":sos:";
pub const ATTACHMENT_COLOR: &str = "danger";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub color: String,
}

/// Webhook 请求载荷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub channel: String,
    pub text: String,
    pub username: String,
    pub icon_emoji: String,
    pub link_names: u8,
    pub attachments: Vec<Attachment>,
    pub mrkdwn: bool,
}

impl WebhookPayload {
    /// 一个批次对应一个 payload
    pub fn from_batch(batch: &NotificationBatch) -> Self {
        Self {
            channel: batch.channel.clone(),
            text: batch.text(),
            username: SENDER_NAME.to_string(),
            icon_emoji: SENDER_ICON.to_string(),
            link_names: 1,
            attachments: vec![Attachment {
                text: batch.attachment.clone(),
                color: ATTACHMENT_COLOR.to_string(),
            }],
            mrkdwn: true,
        }
    }
}
