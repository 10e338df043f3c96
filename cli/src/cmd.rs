pub mod check;
pub mod hint;
pub mod init;
pub mod run;

use std::path::PathBuf;

use anyhow::Context as _;
use jsgrade_core::{Config, GradingResult};

use crate::util;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Config file to use instead of the nearest jsgrade.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Run(run::Args),

    #[command(alias("c"))]
    Check(check::Args),

    Hint(hint::Args),
    Init(init::Args),
}

/// `Ok(false)` means the command ran but grading did not pass.
pub type SubcmdResult = anyhow::Result<bool>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Run(args) => run::exec(args, self).await,
            Check(args) => check::exec(args, self).await,
            Hint(args) => hint::exec(args, self),
            Init(args) => init::exec(args, self),
        }
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::from_toml_file(path.clone()).with_context(|| {
                format!(
                    "Failed to load config {}",
                    util::replace_homedir_to_tilde(path).to_string_lossy()
                )
            }),
            None => Config::from_file_finding_in_ancestors_or_default(util::current_dir()),
        }
    }
}

pub fn print_json(res: &GradingResult) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), res).context("Failed to write JSON")?;
    println!();
    Ok(())
}
