use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use lsb_vault::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_hide, handle_recover},
};

/// 解析参数，按 `-v` 的次数设置日志级别，再交给对应子命令的处理函数。
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG 优先于 -v
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new().filter_level(level).parse_default_env().init();

    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Capacity(args) => handle_capacity(args),
    }
}
