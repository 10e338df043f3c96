use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grading::Assertion;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported exercise file format (expected .json or .toml): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid exercise {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub level: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub test_cases: Vec<Assertion>,
    #[serde(default)]
    pub hints: Vec<Hint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn detect(filepath: &Path) -> Option<Self> {
        let ext = filepath.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

impl Exercise {
    pub fn from_file(filepath: impl AsRef<Path>) -> Result<Self> {
        let filepath = filepath.as_ref();
        let exercise: Self = match Format::detect(filepath) {
            Some(Format::Json) => fsutil::read_json_with_deserialize(filepath)?,
            Some(Format::Toml) => fsutil::read_toml_with_deserialize(filepath)?,
            None => return Err(Error::UnsupportedFormat(filepath.to_owned())),
        };
        exercise.validate().map_err(|reason| Error::Invalid {
            path: filepath.to_owned(),
            reason,
        })?;
        Ok(exercise)
    }

    pub fn from_json(s: &str) -> ::std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    fn validate(&self) -> ::std::result::Result<(), String> {
        if let Some(i) = self
            .test_cases
            .iter()
            .position(|t| t.name.trim().is_empty())
        {
            return Err(format!("testCases[{}] has an empty name", i));
        }
        Ok(())
    }

    /// Hints whose level is at most `level`, easiest first.
    pub fn hints_up_to(&self, level: u32) -> Vec<&Hint> {
        let mut hints: Vec<_> = self.hints.iter().filter(|h| h.level <= level).collect();
        hints.sort_by_key(|h| h.level);
        hints
    }

    pub fn max_hint_level(&self) -> Option<u32> {
        self.hints.iter().map(|h| h.level).max()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EXERCISE_JSON: &str = r#"{
        "description": "Print a greeting, then the sum of 2 and 3.",
        "starterCode": "// your code here\n",
        "solution": "console.log('Hello'); console.log(2 + 3)",
        "testCases": [
            { "name": "greets", "expectedOutput": "Hello" },
            { "name": "adds", "input": "", "expectedOutput": "5" }
        ],
        "hints": [
            { "level": 2, "text": "Use the + operator", "code": "2 + 3" },
            { "level": 1, "text": "console.log prints a line" },
            { "level": 3, "text": "Call console.log twice" }
        ]
    }"#;

    #[test]
    fn parses_platform_exercise_json() {
        let ex = Exercise::from_json(EXERCISE_JSON).unwrap();
        assert_eq!(ex.test_cases.len(), 2);
        assert_eq!(ex.test_cases[1], Assertion {
            name: "adds".to_owned(),
            expected_output: "5".to_owned(),
            input: Some("".to_owned()),
        });
        assert_eq!(ex.hints.len(), 3);
        assert_eq!(ex.max_hint_level(), Some(3));
        assert!(ex.validate().is_ok());
    }

    #[test]
    fn hints_up_to_filters_and_sorts() {
        let ex = Exercise::from_json(EXERCISE_JSON).unwrap();
        let levels: Vec<_> = ex.hints_up_to(2).iter().map(|h| h.level).collect();
        assert_eq!(levels, [1, 2]);
        assert!(ex.hints_up_to(0).is_empty());
        assert_eq!(ex.hints_up_to(10).len(), 3);
    }

    #[test]
    fn solution_passes_its_own_test_cases() {
        let ex = Exercise::from_json(EXERCISE_JSON).unwrap();
        let res = crate::run(&ex.solution, &ex.test_cases);
        assert!(res.all_passed, "{:?}", res);

        let res = crate::run(&ex.starter_code, &ex.test_cases);
        assert!(!res.all_passed);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let ex = Exercise::from_json("{}").unwrap();
        assert!(ex.test_cases.is_empty());
        assert!(ex.hints.is_empty());
        assert_eq!(ex.max_hint_level(), None);
    }

    #[test]
    fn unnamed_test_case_is_invalid() {
        let ex = Exercise::from_json(r#"{ "testCases": [{ "name": " ", "expectedOutput": "x" }] }"#)
            .unwrap();
        assert!(ex.validate().is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = Exercise::from_file("lesson.yaml").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
