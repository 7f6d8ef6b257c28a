//! 运行配置
//!
//! 启动时验证一次，之后不再读取。

use std::time::Duration;

use sysinfo::System;

use crate::error::ConfigError;
use crate::notification::channel::PayloadEncoding;
use crate::notification::webhook::DEFAULT_TIMEOUT_SECS;

/// supervisor 启动监听器时设置的环境变量
pub const SUPERVISOR_ENV: &str = "SUPERVISOR_SERVER_URL";
pub const DEFAULT_TICK_EVENT: &str = "TICK_60";
/// 默认批次间隔（分钟）
pub const DEFAULT_INTERVAL_MINUTES: f64 = 1.0;

/// 投递目标，二者互斥
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Webhook(String),
    /// 旧版 token 渠道，未实现
    Token(String),
}

impl Destination {
    /// 从可选的 webhook / token 得到唯一目标
    pub fn resolve(webhook: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        let webhook = webhook.filter(|s| !s.is_empty());
        let token = token.filter(|s| !s.is_empty());
        match (webhook, token) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingDestination),
            (Some(url), None) => Ok(Destination::Webhook(url)),
            (None, Some(token)) => Ok(Destination::Token(token)),
            (None, None) => Err(ConfigError::MissingDestination),
        }
    }
}

/// 已验证的配置
#[derive(Debug, Clone, PartialEq)]
pub struct NotifierConfig {
    pub channel: String,
    pub destination: Destination,
    pub attachment: Option<String>,
    pub hostname: String,
    pub verify_tls: bool,
    /// 批次间隔（分钟）
    pub interval_minutes: f64,
    /// 触发 flush 的 tick 事件名
    pub tick_event: String,
    pub timeout: Duration,
    pub max_batch: Option<usize>,
    pub encoding: PayloadEncoding,
}

impl NotifierConfig {
    pub fn new(
        channel: impl Into<String>,
        destination: Destination,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            destination,
            attachment: None,
            hostname: hostname.into(),
            verify_tls: true,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            tick_event: DEFAULT_TICK_EVENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_batch: None,
            encoding: PayloadEncoding::Json,
        }
    }

    pub fn with_attachment(mut self, attachment: Option<String>) -> Self {
        self.attachment = attachment;
        self
    }

    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_tick(mut self, tick_event: impl Into<String>, interval_minutes: f64) -> Self {
        self.tick_event = tick_event.into();
        self.interval_minutes = interval_minutes;
        self
    }

    /// 每个 tick 事件代表的秒数
    pub fn tick_secs(&self) -> Result<u64, ConfigError> {
        tick_seconds(&self.tick_event)
    }

    /// 批次间隔换算成整秒
    pub fn interval_secs(&self) -> Result<u64, ConfigError> {
        interval_seconds(self.interval_minutes)
    }

    /// 启动时一次性检查数值参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tick_secs()?;
        self.interval_secs()?;
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

/// 分钟数换算成秒，四舍五入；不足 1 秒视为无效
pub fn interval_seconds(minutes: f64) -> Result<u64, ConfigError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(ConfigError::InvalidInterval(minutes.to_string()));
    }
    let secs = (minutes * 60.0).round();
    if secs < 1.0 {
        return Err(ConfigError::InvalidInterval(minutes.to_string()));
    }
    Ok(secs as u64)
}

/// 解析 `TICK_<秒数>`
pub fn tick_seconds(eventname: &str) -> Result<u64, ConfigError> {
    eventname
        .strip_prefix("TICK_")
        .and_then(|secs| secs.parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .ok_or_else(|| ConfigError::InvalidTickEvent(eventname.to_string()))
}

/// 系统主机名，取不到时用 localhost
pub fn system_hostname() -> String {
    System::host_name()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// 检查是否由 supervisor 启动
pub fn ensure_supervisor_env() -> Result<(), ConfigError> {
    check_supervisor_env(std::env::var_os(SUPERVISOR_ENV).is_some())
}

fn check_supervisor_env(present: bool) -> Result<(), ConfigError> {
    if present {
        Ok(())
    } else {
        Err(ConfigError::NotUnderSupervisor)
    }
}
