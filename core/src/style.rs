use std::collections::HashMap;

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;

use crate::exercise::Hint;
use crate::grading::{AssertionVerdict, GradingResult, JudgeCode};
use crate::sandbox::FailureKind;

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

const BOLD_LINE: &str = "━";
const THIN_LINE: &str = "─";

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for JudgeCode {
    fn color(&self) -> Color {
        use JudgeCode::*;
        if !self::is_truecolor_supported() {
            return match self {
                AC => Color::Green,
                WA => Color::Yellow,
                RE => Color::Magenta,
            };
        }

        match self {
            AC => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            WA => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            RE => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
        }
    }
}

pub fn judge_icon(judge: JudgeCode) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", judge)
        .on_color(judge.color())
        .bold()
        .color(fg)
}

fn terminal_cols() -> usize {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    cols as usize
}

fn print_sub_title(s: &str, cols: usize) {
    println!(
        "{}{}",
        s.cyan().bold(),
        THIN_LINE.repeat(cols.saturating_sub(s.chars().count() + 1)).bright_black(),
    )
}

pub fn failure_label(kind: Option<FailureKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "Error".to_owned(),
    }
}

/// The program's own output, or the failure that ended it.
pub fn print_run_output(res: &GradingResult) {
    let cols = terminal_cols();
    print_sub_title("[output]", cols);
    if res.output.is_empty() {
        println!("{}", "No output".magenta().dimmed());
    } else {
        println!("{}", res.output);
    }

    if let Some(error) = &res.error {
        print_sub_title("[error]", cols);
        println!(
            "{}: {}",
            failure_label(res.error_kind).bright_red().bold(),
            error.bright_red()
        );
    }
}

pub fn print_grading_summary(res: &GradingResult) {
    let bar = "-".repeat(5);
    print!("{} ", bar);

    let count: HashMap<JudgeCode, usize> =
        res.verdicts.iter().fold(HashMap::new(), |mut count, v| {
            *count.entry(v.judge).or_default() += 1;
            count
        });

    let num_total_test = res.verdicts.len();
    let num_passed = res.num_passed();
    let num_failed = res.num_failed();

    if res.all_passed {
        let msg = format!("All {} tests passed ✨", num_total_test);
        print!("{}", msg.green());
    } else if num_total_test == 0 {
        print!("{}", "Program failed 💀".bright_red());
    } else {
        let summary_msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_total_test)
        } else {
            format!("All {} tests failed 💀", num_total_test)
        };

        let mut failed_judges: Vec<_> = count
            .iter()
            .filter(|(&judge, _)| judge != JudgeCode::AC)
            .collect();
        failed_judges.sort_by_key(|(&judge, _)| judge.to_string());

        let detail_msg = failed_judges
            .into_iter()
            .map(|(&judge, &cnt)| {
                format!(
                    "{}{}{}",
                    self::judge_icon(judge),
                    "x".dimmed(),
                    cnt.to_string().bold().bright_white(),
                )
            })
            .collect::<Vec<String>>()
            .join(", ");

        print!("{} ({})", summary_msg.bright_red(), detail_msg);
    }

    println!(" {}", bar);
}

/// One line per assertion, in the order they were given.
pub fn print_verdict_list(res: &GradingResult) {
    for v in &res.verdicts {
        let name = if v.passed {
            v.name.green()
        } else {
            v.name.bright_red()
        };
        println!("{} {}", self::judge_icon(v.judge), name);
    }
}

pub fn print_verdict_detail(v: &AssertionVerdict) {
    let cols = terminal_cols();
    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    println!(
        "\n{}: {}\n{}",
        v.name.color(Color::BrightYellow).bold(),
        self::judge_icon(v.judge),
        bold_bar,
    );

    print_sub_title("[expected]", cols);
    let expected_lines: Vec<_> = v
        .expected
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if expected_lines.is_empty() {
        println!("{}", "<EMPTY>".magenta().dimmed());
    }
    for line in expected_lines {
        if v.actual.contains(line) {
            println!("{} {}", "✔".green(), line);
        } else {
            println!(
                "{} {}{}",
                "✘".bright_red(),
                line,
                " Not found in output ".on_yellow().black().bold()
            );
        }
    }

    print_sub_title("[actual]", cols);
    if v.actual.is_empty() {
        println!("{}", "<EMPTY>".magenta().dimmed());
    } else {
        println!("{}", v.actual);
    }

    println!("{}", bold_bar);
}

pub fn print_hints(hints: &[&Hint]) {
    if hints.is_empty() {
        return;
    }
    print_sub_title("[hints]", terminal_cols());
    for hint in hints {
        println!(
            "{} {}",
            format!("Hint {}:", hint.level).bright_yellow().bold(),
            hint.text
        );
        if let Some(code) = &hint.code {
            for line in code.lines() {
                println!("    {}", line.dimmed());
            }
        }
    }
}
