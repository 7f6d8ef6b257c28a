//! 错误类型定义
//!
//! 每一类错误对应一种处理策略：
//! - `ConfigError`：启动时致命，打印帮助后以 1 退出
//! - `DecodeError`：单个事件被跳过，监听循环继续
//! - `DeliveryError`：本批次丢弃，下一个 tick 继续
//! - `ProtocolError`：与 supervisor 的握手无法继续，进程退出

use thiserror::Error;

/// 启动配置错误
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// 未指定频道
    #[error("a channel is required (--channel)")]
    MissingChannel,

    /// 未指定 webhook 或 token
    #[error("one of --webhook or --token is required")]
    MissingDestination,

    /// 同时指定了 webhook 和 token
    #[error("--webhook and --token are mutually exclusive")]
    ConflictingDestination,

    /// tick 事件名不是 TICK_<秒数>
    #[error("invalid TICK event name: {0}")]
    InvalidTickEvent(String),

    /// 批次间隔不是正数
    #[error("--interval must be a positive number of minutes, got {0}")]
    InvalidInterval(String),

    /// 超时为 0 时每个请求都会立即失败
    #[error("--timeout must be greater than 0 seconds")]
    InvalidTimeout,

    /// 不是由 supervisor 启动
    #[error("Must run as a supervisor event listener")]
    NotUnderSupervisor,
}

/// 事件解码错误
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

/// 通知投递错误
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP 请求失败（网络、TLS、超时）
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 非 2xx 响应
    #[error("webhook responded with status {0}")]
    Status(u16),

    /// Payload 序列化失败
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP 客户端无法构建
    #[error("cannot create HTTP client: {0}")]
    Client(String),
}

/// 监听协议错误
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error on supervisor pipe: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("header line has no len field")]
    MissingLength,

    #[error("invalid len field: {0:?}")]
    InvalidLength(String),

    #[error("payload truncated: expected {expected} bytes, got {actual}")]
    ShortPayload { expected: usize, actual: usize },
}
