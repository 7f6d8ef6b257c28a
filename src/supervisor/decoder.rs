//! 进程状态变更事件解码

use super::protocol::{parse_token_line, RawEvent};
use crate::error::DecodeError;

const PROCESS_STATE_PREFIX: &str = "PROCESS_STATE_";

/// 一次进程状态变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeRecord {
    /// 监听器所在主机（来自配置，不取自事件）
    pub hostname: String,
    pub process_name: String,
    pub group_name: String,
    pub from_state: String,
    /// 目标状态，`PROCESS_STATE_RUNNING` 记为 `RUNNING`
    pub to_state: String,
}

/// 从事件名得到目标状态
pub fn to_state_from_eventname(eventname: &str) -> &str {
    eventname
        .strip_prefix(PROCESS_STATE_PREFIX)
        .unwrap_or(eventname)
}

/// 解码进程状态变更事件
///
/// payload 第一行是 `processname:web1 groupname:web from_state:STARTING ...`，
/// 缺少任何必需字段都返回 `MalformedEvent`。
pub fn decode_state_change(
    event: &RawEvent,
    hostname: &str,
) -> Result<StateChangeRecord, DecodeError> {
    let eventname = event
        .eventname()
        .ok_or_else(|| DecodeError::MalformedEvent("missing eventname header".to_string()))?;

    let first_line = event.payload.lines().next().unwrap_or("");
    let fields = parse_token_line(first_line).map_err(|token| {
        DecodeError::MalformedEvent(format!("bad payload token {:?}", token))
    })?;

    let field = |key: &str| {
        fields
            .get(key)
            .cloned()
            .ok_or_else(|| DecodeError::MalformedEvent(format!("payload has no {}", key)))
    };

    Ok(StateChangeRecord {
        hostname: hostname.to_string(),
        process_name: field("processname")?,
        group_name: field("groupname")?,
        from_state: field("from_state")?,
        to_state: to_state_from_eventname(eventname).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn event(eventname: &str, payload: &str) -> RawEvent {
        let mut headers = BTreeMap::new();
        headers.insert("eventname".to_string(), eventname.to_string());
        RawEvent::new(headers, payload)
    }

    #[test]
    fn test_decode_running() {
        let record = decode_state_change(
            &event(
                "PROCESS_STATE_RUNNING",
                "processname:web1 groupname:web from_state:STARTING pid:2766",
            ),
            "host-a",
        )
        .unwrap();

        assert_eq!(
            record,
            StateChangeRecord {
                hostname: "host-a".to_string(),
                process_name: "web1".to_string(),
                group_name: "web".to_string(),
                from_state: "STARTING".to_string(),
                to_state: "RUNNING".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_only_reads_first_payload_line() {
        let record = decode_state_change(
            &event(
                "PROCESS_STATE_EXITED",
                "processname:cat groupname:cat from_state:RUNNING expected:0\nnot tokens here",
            ),
            "h",
        )
        .unwrap();
        assert_eq!(record.to_state, "EXITED");
        assert_eq!(record.from_state, "RUNNING");
    }

    #[test]
    fn test_decode_missing_field() {
        let err = decode_state_change(&event("PROCESS_STATE_FATAL", "processname:x groupname:x"), "h")
            .unwrap_err();
        assert_eq!(err, DecodeError::MalformedEvent("payload has no from_state".to_string()));
    }

    #[test]
    fn test_decode_bad_token() {
        let err = decode_state_change(&event("PROCESS_STATE_FATAL", "not a payload"), "h");
        assert!(matches!(err, Err(DecodeError::MalformedEvent(_))));
    }

    #[test]
    fn test_decode_missing_eventname() {
        let raw = RawEvent::new(BTreeMap::new(), "processname:a groupname:a from_state:RUNNING");
        assert!(decode_state_change(&raw, "h").is_err());
    }

    #[test]
    fn test_supervisor_state_change_keeps_name() {
        assert_eq!(to_state_from_eventname("SUPERVISOR_STATE_CHANGE_STOPPING"), "SUPERVISOR_STATE_CHANGE_STOPPING");
        assert_eq!(to_state_from_eventname("PROCESS_STATE_STOPPED"), "STOPPED");
    }
}
