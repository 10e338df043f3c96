use super::{assertion::Assertion, grader, result::GradingResult};
use crate::config::RunnerConfig;
use crate::sandbox::{ExecutionLimits, Sandbox};

/// Evaluate `source` once and grade it against `assertions`.
#[derive(Debug, Clone, Default)]
pub struct CodeRunner {
    sandbox: Sandbox,
}

impl CodeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &RunnerConfig) -> Self {
        Self::new().limits(cfg.limits())
    }

    pub fn limits(mut self, limits: ExecutionLimits) -> Self {
        self.sandbox = self.sandbox.limits(limits);
        self
    }

    pub fn get_limits(&self) -> &ExecutionLimits {
        self.sandbox.get_limits()
    }

    pub fn run(&self, source: &str, assertions: &[Assertion]) -> GradingResult {
        let outcome = self.sandbox.execute(source);
        grader::grade(outcome, assertions)
    }
}

/// [`CodeRunner::run`] with default limits.
pub fn run(source: &str, assertions: &[Assertion]) -> GradingResult {
    CodeRunner::new().run(source, assertions)
}
