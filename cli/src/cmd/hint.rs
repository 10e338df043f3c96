use std::path::PathBuf;

use jsgrade_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()]
    pub exercise_file: PathBuf,

    /// Show every hint up to this level
    #[arg(short, long, default_value_t = 1)]
    pub level: u32,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    action::show_hints(&args.exercise_file, args.level)?;
    Ok(true)
}
