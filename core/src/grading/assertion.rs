use serde::{Deserialize, Serialize};

/// A named expectation on a program's captured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    pub name: String,

    #[serde(default)]
    pub expected_output: String,

    /// Kept for exercise files that carry it. Programs get no stdin, so
    /// grading never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl Assertion {
    pub fn new(name: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expected_output: expected_output.into(),
            input: None,
        }
    }

    /// Trimmed, non-blank lines of the expected output.
    pub fn expected_lines(&self) -> impl Iterator<Item = &str> {
        self.expected_output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// An assertion without any expected line checks nothing and always holds.
    pub fn is_vacuous(&self) -> bool {
        self.expected_lines().next().is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn expected_lines_are_trimmed_and_blank_lines_dropped() {
        let a = Assertion::new("t", "  Line 1  \n\n\t\nLine 2\r\n   ");
        assert_eq!(a.expected_lines().collect::<Vec<_>>(), ["Line 1", "Line 2"]);
    }

    #[test]
    fn blank_expectation_is_vacuous() {
        assert!(Assertion::new("t", "").is_vacuous());
        assert!(Assertion::new("t", " \n \t\n").is_vacuous());
        assert!(!Assertion::new("t", "x").is_vacuous());
    }

    #[test]
    fn deserializes_exercise_test_case_shape() {
        let a: Assertion = serde_json::from_str(
            r#"{ "name": "prints hello", "input": "", "expectedOutput": "Hello" }"#,
        )
        .unwrap();
        assert_eq!(a.name, "prints hello");
        assert_eq!(a.expected_output, "Hello");
        assert_eq!(a.input.as_deref(), Some(""));

        let a: Assertion = serde_json::from_str(r#"{ "name": "no expectation" }"#).unwrap();
        assert!(a.is_vacuous());
    }
}
