use std::io::Write as _;

use clap::Parser;
use colored::Colorize;
use jsgrade_cli::cmd::GlobalArgs;
use jsgrade_core::style::ColorTheme;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "[{}] {}",
                level.to_string().as_str().color(level.color()).bold(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() {
    init_logger();

    let app = GlobalArgs::parse();
    let passed = app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
    if !passed {
        std::process::exit(1);
    }
}
