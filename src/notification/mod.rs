//! 通知管道：格式化 → 累积 → 批量投递
//!
//! # 使用示例
//! ```ignore
//! use rocket_notifier::notification::{BatchAccumulator, NotificationDispatcher, format_state_change};
//!
//! let dispatcher = NotificationDispatcher::from_config(&config)?;
//! let mut batch = BatchAccumulator::new();
//! batch.append(format_state_change(&record));
//! dispatcher.dispatch(dispatcher.batch(batch.drain_and_reset()));
//! ```

pub mod batch;
pub mod channel;
pub mod dispatcher;
pub mod formatter;
pub mod payload;
pub mod severity;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchAccumulator, NotificationBatch};
pub use channel::{FormattedMessage, PayloadEncoding, SendResult, WebhookRequest, WebhookTransport};
pub use dispatcher::NotificationDispatcher;
pub use formatter::{format_state_change, select_emoji, select_rule, StateRule, STATE_RULES};
pub use payload::{Attachment, WebhookPayload};
pub use severity::Severity;
pub use webhook::HttpTransport;
