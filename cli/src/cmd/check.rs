use std::path::PathBuf;

use jsgrade_core::action;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Exercise file (.json or .toml)
    #[arg()]
    pub exercise_file: PathBuf,

    /// Program to grade
    #[arg(required_unless_present = "solution", conflicts_with = "solution")]
    pub program_file: Option<PathBuf>,

    /// Grade the exercise's own solution
    #[arg(long)]
    pub solution: bool,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = global_args.load_config()?;
    let program_file = args.program_file.as_deref();

    let res = if args.json {
        let exercise = action::load_exercise(&args.exercise_file)?;
        let res = action::check_exercise(&exercise, program_file, &cfg).await?;
        super::print_json(&res)?;
        res
    } else {
        action::do_check(&args.exercise_file, program_file, &cfg).await?
    };
    Ok(res.all_passed)
}
