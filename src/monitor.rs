//! 进程状态监控循环
//!
//! 单线程顺序处理：每个事件处理完毕（解码 → 格式化 → 累积，或 flush → 投递）
//! 后才读取下一个事件。

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::config::NotifierConfig;
use crate::error::{ConfigError, ProtocolError};
use crate::notification::{format_state_change, BatchAccumulator, NotificationDispatcher, SendResult};
use crate::supervisor::{decode_state_change, EventListener, RawEvent};

/// 订阅的进程状态事件
pub const PROCESS_STATE_EVENTS: &[&str] = &[
    "PROCESS_STATE_FATAL",
    "PROCESS_STATE_RUNNING",
    "PROCESS_STATE_EXITED",
    "PROCESS_STATE_STOPPED",
    "SUPERVISOR_STATE_CHANGE",
];

/// 单个事件的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// 消息已加入批次
    Queued,
    /// 事件格式错误，已跳过
    Skipped(String),
    /// tick 已计入，未到 flush 间隔
    Ticked,
    /// 批次已 flush
    Flushed(SendResult),
    /// 未订阅的事件
    Ignored,
}

pub struct ProcessStateMonitor<R, W> {
    listener: EventListener<R, W>,
    dispatcher: NotificationDispatcher,
    batch: BatchAccumulator,
    hostname: String,
    tick_event: String,
    tick_secs: u64,
    interval_secs: u64,
}

impl<R: BufRead, W: Write> ProcessStateMonitor<R, W> {
    pub fn new(
        config: &NotifierConfig,
        dispatcher: NotificationDispatcher,
        reader: R,
        writer: W,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            listener: EventListener::new(reader, writer),
            dispatcher,
            batch: BatchAccumulator::new().with_max_messages(config.max_batch),
            hostname: config.hostname.clone(),
            tick_event: config.tick_event.clone(),
            tick_secs: config.tick_secs()?,
            interval_secs: config.interval_secs()?,
        })
    }

    /// 运行直到 stdin 关闭或协议出错
    pub fn run(&mut self) -> Result<(), ProtocolError> {
        info!(
            hostname = %self.hostname,
            tick_event = %self.tick_event,
            interval_secs = self.interval_secs,
            "Listening for supervisor events"
        );

        while let Some(event) = self.listener.wait()? {
            let outcome = self.handle_event(&event);
            debug!(?outcome, "Event handled");
            self.listener.ok()?;
        }

        info!(pending = self.batch.len(), "Supervisor closed stdin, exiting");
        Ok(())
    }

    /// 按事件名分类处理
    pub fn handle_event(&mut self, event: &RawEvent) -> EventOutcome {
        match event.eventname() {
            Some(name) if PROCESS_STATE_EVENTS.contains(&name) => self.handle_state_change(event),
            Some(name) if name == self.tick_event => self.handle_tick(),
            _ => EventOutcome::Ignored,
        }
    }

    fn handle_state_change(&mut self, event: &RawEvent) -> EventOutcome {
        match decode_state_change(event, &self.hostname) {
            Ok(record) => {
                let message = format_state_change(&record);
                info!(severity = %message.severity, "{}", message.text);
                self.batch.append(message);
                EventOutcome::Queued
            }
            Err(e) => {
                warn!(error = %e, eventname = event.eventname().unwrap_or("-"), "Skipping event");
                EventOutcome::Skipped(e.to_string())
            }
        }
    }

    fn handle_tick(&mut self) -> EventOutcome {
        if self.batch.record_tick(self.tick_secs) < self.interval_secs {
            return EventOutcome::Ticked;
        }
        EventOutcome::Flushed(self.flush())
    }

    /// 取出当前批次并投递，无论成败批次都会被清空
    pub fn flush(&mut self) -> SendResult {
        let messages = self.batch.drain_and_reset();
        self.dispatcher.dispatch(self.dispatcher.batch(messages))
    }

    pub fn batch(&self) -> &BatchAccumulator {
        &self.batch
    }

    pub fn into_inner(self) -> (R, W) {
        self.listener.into_inner()
    }
}
