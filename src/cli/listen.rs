//! 监听命令 - 参数解析、验证与运行
//!
//! 配置错误打印帮助到 stderr 并以 1 退出；stdout 只留给 supervisor 协议。

use std::io::{self, BufReader};

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{
    ensure_supervisor_env, system_hostname, Destination, NotifierConfig, DEFAULT_INTERVAL_MINUTES,
    DEFAULT_TICK_EVENT,
};
use crate::error::ConfigError;
use crate::monitor::ProcessStateMonitor;
use crate::notification::webhook::DEFAULT_TIMEOUT_SECS;
use crate::notification::{NotificationDispatcher, PayloadEncoding};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "rocket-notifier")]
#[command(about = "Supervisor event listener that posts process state changes to a Rocket.Chat / Slack webhook")]
#[command(version)]
pub struct ListenArgs {
    /// RocketChat Token
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// RocketChat Channel
    #[arg(short = 'c', long)]
    pub channel: Option<String>,

    /// RocketChat WebHook URL
    #[arg(short = 'w', long)]
    pub webhook: Option<String>,

    /// RocketChat Attachment text
    #[arg(short = 'a', long)]
    pub attachment: Option<String>,

    /// System Hostname (默认取系统主机名)
    #[arg(short = 'n', long)]
    pub hostname: Option<String>,

    /// Skip server certificate verification
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// 批次间隔（分钟）
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MINUTES)]
    pub interval: f64,

    /// 触发 flush 的 tick 事件
    #[arg(long, default_value = DEFAULT_TICK_EVENT)]
    pub tick_event: String,

    /// Webhook 请求超时（秒）
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// 批次最大消息数，满了丢弃最旧的（默认不限）
    #[arg(long)]
    pub max_batch: Option<usize>,

    /// 以表单 `payload=<json>` 发送，而不是 JSON 请求体
    #[arg(long)]
    pub form_encoded: bool,
}

impl ListenArgs {
    /// 验证参数并生成配置
    pub fn into_config(self) -> Result<NotifierConfig, ConfigError> {
        let destination = Destination::resolve(self.webhook, self.token)?;
        let channel = self
            .channel
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingChannel)?;
        let hostname = self
            .hostname
            .filter(|h| !h.is_empty())
            .unwrap_or_else(system_hostname);

        let mut config = NotifierConfig::new(channel, destination, hostname)
            .with_attachment(self.attachment)
            .with_tick(self.tick_event, self.interval)
            .with_encoding(if self.form_encoded {
                PayloadEncoding::Form
            } else {
                PayloadEncoding::Json
            });
        config.verify_tls = !self.insecure;
        config.timeout = std::time::Duration::from_secs(self.timeout);
        config.max_batch = self.max_batch;

        config.validate()?;
        Ok(config)
    }
}

/// 初始化 tracing 日志系统
///
/// 通过 RUST_LOG 环境变量控制日志级别，默认为 info。日志只写 stderr。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rocket_notifier=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// 解析命令行参数
///
/// `--help` / `--version` 照常以 0 退出；其余解析错误与配置错误一样以 1 退出。
pub fn parse_args() -> ListenArgs {
    match ListenArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                eprintln!("\n{}", ListenArgs::command().render_help());
                std::process::exit(1);
            }
        },
    }
}

/// 打印帮助到 stderr 并退出
fn exit_with_usage(err: &ConfigError) -> ! {
    eprintln!("error: {}\n", err);
    eprintln!("{}", ListenArgs::command().render_help());
    std::process::exit(1);
}

/// 处理监听命令
pub fn handle_listen(args: ListenArgs) -> Result<()> {
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => exit_with_usage(&e),
    };

    if let Err(e) = ensure_supervisor_env() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let dispatcher = NotificationDispatcher::from_config(&config)?;
    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    let mut monitor = ProcessStateMonitor::new(&config, dispatcher, stdin, stdout)?;

    if let Err(e) = monitor.run() {
        error!(error = %e, "Supervisor protocol error, exiting");
        std::process::exit(1);
    }

    Ok(())
}
