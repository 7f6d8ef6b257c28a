//! Rocket Notifier
//!
//! Supervisor event listener：把进程状态变更批量推送到聊天 webhook

use anyhow::Result;
use rocket_notifier::cli::{handle_listen, init_tracing, parse_args};

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args();
    handle_listen(args)
}
