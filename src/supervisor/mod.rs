//! Supervisor 事件监听：协议读写与事件解码

pub mod decoder;
pub mod protocol;

pub use decoder::{decode_state_change, StateChangeRecord};
pub use protocol::{EventListener, RawEvent};
