//! Supervisor event listener 协议
//!
//! 握手流程（stdout 只能用于协议，日志一律走 stderr）：
//! 1. 写 `READY\n`
//! 2. 读一行 header：空格分隔的 `key:value`，必须包含 `len`
//! 3. 按 `len` 读取 payload
//! 4. 处理完成后写 `RESULT 2\nOK`

use std::collections::BTreeMap;
use std::io::{BufRead, Read, Write};

use tracing::debug;

use crate::error::ProtocolError;

const READY_TOKEN: &[u8] = b"READY\n";
const OK_TOKEN: &[u8] = b"RESULT 2\nOK";

/// 从 supervisor 收到的原始事件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub headers: BTreeMap<String, String>,
    pub payload: String,
}

impl RawEvent {
    pub fn new(headers: BTreeMap<String, String>, payload: impl Into<String>) -> Self {
        Self {
            headers,
            payload: payload.into(),
        }
    }

    /// 事件名（header 中的 `eventname`）
    pub fn eventname(&self) -> Option<&str> {
        self.headers.get("eventname").map(String::as_str)
    }
}

/// 解析 `key:value key:value` 形式的行，在第一个 `:` 处切分
///
/// 没有 `:` 的 token 视为格式错误，返回该 token。
pub fn parse_token_line(line: &str) -> Result<BTreeMap<String, String>, String> {
    line.split_whitespace()
        .map(|token| {
            token
                .split_once(':')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| token.to_string())
        })
        .collect()
}

/// Event listener 协议读写端
pub struct EventListener<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> EventListener<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// 通知 supervisor 可以接收下一个事件
    pub fn ready(&mut self) -> Result<(), ProtocolError> {
        self.writer.write_all(READY_TOKEN)?;
        self.writer.flush()?;
        Ok(())
    }

    /// 确认当前事件已处理
    pub fn ok(&mut self) -> Result<(), ProtocolError> {
        self.writer.write_all(OK_TOKEN)?;
        self.writer.flush()?;
        Ok(())
    }

    /// 写 READY 并阻塞等待下一个事件
    ///
    /// 在 header 边界遇到 EOF 返回 `Ok(None)`（supervisor 关闭了管道）。
    pub fn wait(&mut self) -> Result<Option<RawEvent>, ProtocolError> {
        self.ready()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let header_line = line.trim_end_matches(['\r', '\n']);
        if header_line.trim().is_empty() {
            return Err(ProtocolError::MalformedHeader(header_line.to_string()));
        }
        let headers = parse_token_line(header_line)
            .map_err(|_| ProtocolError::MalformedHeader(header_line.to_string()))?;

        let len_field = headers.get("len").ok_or(ProtocolError::MissingLength)?;
        let expected: usize = len_field
            .parse()
            .map_err(|_| ProtocolError::InvalidLength(len_field.clone()))?;

        let mut buf = Vec::with_capacity(expected);
        (&mut self.reader).take(expected as u64).read_to_end(&mut buf)?;
        if buf.len() < expected {
            return Err(ProtocolError::ShortPayload {
                expected,
                actual: buf.len(),
            });
        }

        let event = RawEvent::new(headers, String::from_utf8_lossy(&buf));
        debug!(
            eventname = event.eventname().unwrap_or("-"),
            len = expected,
            "Received supervisor event"
        );
        Ok(Some(event))
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
