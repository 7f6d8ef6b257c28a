//! 消息格式化 - 将进程状态变更转换为聊天消息
//!
//! 输出不含时间戳或随机内容，同一条记录总是得到相同的文本。

use super::channel::FormattedMessage;
use super::severity::Severity;
use crate::supervisor::StateChangeRecord;

/// Emoji tokens
pub mod emoji {
    pub const SAD: &str = ":sob:";
    pub const CELEBRATE: &str = ":clap:";
    pub const NEUTRAL: &str = ":smile:";
}

/// 状态关键字规则：子串匹配，按顺序第一条命中的生效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRule {
    pub pattern: &'static str,
    pub emoji: &'static str,
    pub severity: Severity,
}

/// 规则顺序固定，调整顺序会改变匹配结果
pub const STATE_RULES: &[StateRule] = &[
    StateRule {
        pattern: "EXITED",
        emoji: emoji::SAD,
        severity: Severity::Medium,
    },
    StateRule {
        pattern: "STOPPED",
        emoji: emoji::SAD,
        severity: Severity::Medium,
    },
    StateRule {
        pattern: "FATAL",
        emoji: emoji::SAD,
        severity: Severity::High,
    },
    StateRule {
        pattern: "RUNNING",
        emoji: emoji::CELEBRATE,
        severity: Severity::Low,
    },
];

/// 未命中任何规则时使用
pub static DEFAULT_RULE: StateRule = StateRule {
    pattern: "",
    emoji: emoji::NEUTRAL,
    severity: Severity::Low,
};

/// 查找目标状态对应的规则
pub fn select_rule(to_state: &str) -> &'static StateRule {
    STATE_RULES
        .iter()
        .find(|rule| to_state.contains(rule.pattern))
        .unwrap_or(&DEFAULT_RULE)
}

pub fn select_emoji(to_state: &str) -> &'static str {
    select_rule(to_state).emoji
}

/// 格式化一条状态变更
pub fn format_state_change(record: &StateChangeRecord) -> FormattedMessage {
    let rule = select_rule(&record.to_state);
    let text = format!(
        "```Host      : [{host}]\nProcess   : [{process}]\nGroupname : [{group}]\nStatus    : {from} => {to}```{emoji}",
        host = record.hostname,
        process = record.process_name,
        group = record.group_name,
        from = record.from_state,
        to = record.to_state,
        emoji = rule.emoji,
    );
    FormattedMessage::new(text, rule.severity)
}
