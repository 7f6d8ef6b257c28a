//! 旧入口，行为与 rocket-notifier 相同

use anyhow::Result;
use rocket_notifier::cli::{handle_listen, init_tracing, parse_args};
use tracing::warn;

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args();
    warn!("fatalslack is deprecated. Please use rocket-notifier instead");
    handle_listen(args)
}
