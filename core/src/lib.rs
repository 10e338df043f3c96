pub mod action;
pub mod config;
pub mod exercise;
pub mod grading;
pub mod sandbox;
pub mod session;
pub mod style;

pub use crate::config::Config;
pub use crate::exercise::{Exercise, Hint};
pub use crate::grading::{
    grade, run, Assertion, AssertionVerdict, CodeRunner, GradingResult, JudgeCode,
};
pub use crate::sandbox::{ExecutionLimits, ExecutionOutcome, Failure, FailureKind, Sandbox};
pub use crate::session::Session;
