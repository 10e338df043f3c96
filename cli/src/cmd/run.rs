use std::path::PathBuf;

use jsgrade_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub program_file: PathBuf,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = global_args.load_config()?;

    if args.json {
        let source = action::read_program(&args.program_file, &cfg)?;
        let label = args.program_file.to_string_lossy();
        let res = action::grade_with_spinner(&label, source, Vec::new(), &cfg).await?;
        super::print_json(&res)?;
        return Ok(res.error.is_none());
    }

    let res = action::do_run(&args.program_file, &cfg).await?;
    Ok(res.error.is_none())
}
