//! Rocket Notifier - supervisor 进程状态变更的聊天 webhook 通知

pub mod cli;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notification;
pub mod supervisor;

pub use config::{Destination, NotifierConfig};
pub use error::{ConfigError, DecodeError, DeliveryError, ProtocolError};
pub use monitor::{EventOutcome, ProcessStateMonitor, PROCESS_STATE_EVENTS};
pub use notification::{
    format_state_change, BatchAccumulator, FormattedMessage, NotificationBatch,
    NotificationDispatcher, SendResult, Severity, WebhookTransport,
};
pub use supervisor::{decode_state_change, EventListener, RawEvent, StateChangeRecord};
