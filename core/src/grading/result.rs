use serde::{Deserialize, Serialize};

use crate::sandbox::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum JudgeCode {
    /// Every expected line was found in the output.
    AC,
    /// The run succeeded but some expected line is missing.
    WA,
    /// The run failed, so no assertion can hold.
    RE,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionVerdict {
    pub name: String,
    pub passed: bool,
    pub judge: JudgeCode,
    pub expected: String,
    /// The whole captured output of the run, identical across verdicts.
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub output: String,
    pub error: Option<String>,
    pub error_kind: Option<FailureKind>,
    pub verdicts: Vec<AssertionVerdict>,
    pub all_passed: bool,
}

impl AssertionVerdict {
    pub fn new(
        name: impl Into<String>,
        judge: JudgeCode,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: judge == JudgeCode::AC,
            judge,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl GradingResult {
    pub fn num_passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed).count()
    }

    pub fn num_failed(&self) -> usize {
        self.verdicts.len() - self.num_passed()
    }

    pub fn failed_verdicts(&self) -> impl Iterator<Item = &AssertionVerdict> {
        self.verdicts.iter().filter(|v| !v.passed)
    }
}
