//! 批次累积 - 在两次 flush 之间缓存消息

use std::collections::VecDeque;

use tracing::warn;

use super::channel::FormattedMessage;
use crate::config::Destination;

/// 待发送的批次
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationBatch {
    pub channel: String,
    pub destination: Destination,
    pub attachment: Option<String>,
    pub verify_tls: bool,
    pub messages: Vec<FormattedMessage>,
}

impl NotificationBatch {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 按顺序拼接的消息文本，每条一行
    pub fn text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 消息累积器
///
/// 默认无上限；设置 `max_messages` 后满了丢弃最旧的一条。
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    messages: VecDeque<FormattedMessage>,
    /// 本批次已经过的 tick 秒数
    elapsed_secs: u64,
    max_messages: Option<usize>,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容量上限
    pub fn with_max_messages(mut self, max_messages: Option<usize>) -> Self {
        self.max_messages = max_messages.filter(|&n| n > 0);
        self
    }

    /// 追加消息到批次末尾
    pub fn append(&mut self, message: FormattedMessage) {
        if let Some(max) = self.max_messages {
            if self.messages.len() >= max {
                if let Some(dropped) = self.messages.pop_front() {
                    warn!(
                        max_messages = max,
                        severity = %dropped.severity,
                        "Batch full, dropping oldest message"
                    );
                }
            }
        }
        self.messages.push_back(message);
    }

    /// 记录一次 tick，返回累计秒数
    pub fn record_tick(&mut self, secs: u64) -> u64 {
        self.elapsed_secs = self.elapsed_secs.saturating_add(secs);
        self.elapsed_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// 取出全部消息（按插入顺序）并清空状态
    pub fn drain_and_reset(&mut self) -> Vec<FormattedMessage> {
        self.elapsed_secs = 0;
        std::mem::take(&mut self.messages).into()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &VecDeque<FormattedMessage> {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::severity::Severity;

    fn msg(text: &str) -> FormattedMessage {
        FormattedMessage::new(text, Severity::Low)
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut acc = BatchAccumulator::new();
        acc.append(msg("a"));
        acc.append(msg("b"));
        acc.append(msg("c"));

        let drained = acc.drain_and_reset();
        let texts: Vec<_> = drained.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_double_drain_is_empty() {
        let mut acc = BatchAccumulator::new();
        acc.append(msg("a"));
        assert_eq!(acc.drain_and_reset().len(), 1);
        assert!(acc.drain_and_reset().is_empty());
    }

    #[test]
    fn test_drain_empty() {
        let mut acc = BatchAccumulator::new();
        assert!(acc.drain_and_reset().is_empty());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut acc = BatchAccumulator::new();
        for i in 0..1000 {
            acc.append(msg(&i.to_string()));
        }
        assert_eq!(acc.len(), 1000);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut acc = BatchAccumulator::new().with_max_messages(Some(2));
        acc.append(msg("a"));
        acc.append(msg("b"));
        acc.append(msg("c"));

        let texts: Vec<_> = acc.messages().iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_zero_cap_means_unbounded() {
        let mut acc = BatchAccumulator::new().with_max_messages(Some(0));
        acc.append(msg("a"));
        acc.append(msg("b"));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_tick_clock_resets_on_drain() {
        let mut acc = BatchAccumulator::new();
        assert_eq!(acc.record_tick(30), 30);
        assert_eq!(acc.record_tick(30), 60);
        acc.drain_and_reset();
        assert_eq!(acc.elapsed_secs(), 0);
    }

    #[test]
    fn test_tick_clock_is_exact() {
        let mut acc = BatchAccumulator::new();
        for _ in 0..6 {
            acc.record_tick(5);
        }
        assert_eq!(acc.elapsed_secs(), 30);
    }

    #[test]
    fn test_cap_keeps_newest_under_load() {
        let mut acc = BatchAccumulator::new().with_max_messages(Some(3));
        for i in 0..10_000 {
            acc.append(msg(&i.to_string()));
        }
        let texts: Vec<_> = acc.drain_and_reset().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["9997", "9998", "9999"]);
    }

    #[test]
    fn test_batch_text_joins_lines() {
        let batch = NotificationBatch {
            channel: "#ops".to_string(),
            destination: Destination::Webhook("https://chat/hook".to_string()),
            attachment: None,
            verify_tls: true,
            messages: vec![msg("one"), msg("two")],
        };
        assert_eq!(batch.text(), "one\ntwo");
        assert!(!batch.is_empty());
    }
}
