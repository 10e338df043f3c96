use jsgrade_core::{action, print_success, Config};
use std::path::PathBuf;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    pub dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    action::init_config(&args.dir)?;
    print_success!(
        "Successfully created {}. (path: {})",
        Config::FILENAME,
        args.dir.to_string_lossy()
    );
    Ok(true)
}
