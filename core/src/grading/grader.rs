use super::{assertion::Assertion, result::*};
use crate::sandbox::ExecutionOutcome;

/// Judge every assertion against one run.
///
/// Containment is loose: each expected line only has to appear
/// somewhere in the output, in any order, not on a line of its own.
pub fn grade(outcome: ExecutionOutcome, assertions: &[Assertion]) -> GradingResult {
    let ExecutionOutcome {
        captured_output: output,
        failure,
    } = outcome;

    let verdicts: Vec<_> = assertions
        .iter()
        .map(|assertion| {
            let judge = judge(&output, failure.is_some(), assertion);
            AssertionVerdict::new(
                &assertion.name,
                judge,
                &assertion.expected_output,
                &output,
            )
        })
        .collect();

    let all_passed = failure.is_none() && verdicts.iter().all(|v| v.passed);

    log::debug!(
        "Graded {} assertion(s): {} passed, all_passed={}",
        verdicts.len(),
        verdicts.iter().filter(|v| v.passed).count(),
        all_passed
    );

    let (error, error_kind) = match failure {
        Some(f) => (Some(f.message), Some(f.kind)),
        None => (None, None),
    };
    GradingResult {
        output,
        error,
        error_kind,
        verdicts,
        all_passed,
    }
}

fn judge(output: &str, run_failed: bool, assertion: &Assertion) -> JudgeCode {
    if run_failed {
        JudgeCode::RE
    } else if output_contains_expected(output, assertion) {
        JudgeCode::AC
    } else {
        JudgeCode::WA
    }
}

pub fn output_contains_expected(output: &str, assertion: &Assertion) -> bool {
    assertion.expected_lines().all(|line| output.contains(line))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sandbox::{Failure, FailureKind};

    fn ok(output: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            captured_output: output.to_owned(),
            failure: None,
        }
    }

    fn failed(output: &str, message: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            captured_output: output.to_owned(),
            failure: Some(Failure::new(FailureKind::Runtime, message)),
        }
    }

    #[test]
    fn containment_is_substring_anywhere() {
        let res = grade(
            ok("foo bar"),
            &[
                Assertion::new("contains foo", "foo"),
                Assertion::new("contains bar", "bar"),
                Assertion::new("contains baz", "baz"),
            ],
        );
        let judges: Vec<_> = res.verdicts.iter().map(|v| v.judge).collect();
        assert_eq!(judges, [JudgeCode::AC, JudgeCode::AC, JudgeCode::WA]);
        assert!(!res.all_passed);
    }

    #[test]
    fn multiline_expectation_ignores_order_and_position() {
        let outcome = ok("Line 2\nnoise Line 1 noise");
        let res = grade(outcome, &[Assertion::new("t", "  Line 1\n\nLine 2  ")]);
        assert!(res.verdicts[0].passed);
        assert!(res.all_passed);
    }

    #[test]
    fn expected_line_spanning_two_output_lines_matches_joined_output() {
        let res = grade(ok("a\nb"), &[Assertion::new("t", "a\nb"), Assertion::new("u", "ab")]);
        assert!(res.verdicts[0].passed);
        assert!(!res.verdicts[1].passed);
    }

    #[test]
    fn vacuous_assertion_passes_on_any_successful_run() {
        let res = grade(ok(""), &[Assertion::new("empty", ""), Assertion::new("blank", " \n ")]);
        assert!(res.verdicts.iter().all(|v| v.passed));
        assert!(res.all_passed);
    }

    #[test]
    fn failure_fails_every_verdict() {
        let res = grade(
            failed("anything", "crash"),
            &[
                Assertion::new("test 1", "anything"),
                Assertion::new("test 2", ""),
            ],
        );
        assert!(res.verdicts.iter().all(|v| v.judge == JudgeCode::RE && !v.passed));
        assert_eq!(res.error.as_deref(), Some("crash"));
        assert_eq!(res.error_kind, Some(FailureKind::Runtime));
        assert!(!res.all_passed);
    }

    #[test]
    fn no_assertions() {
        let res = grade(ok("test"), &[]);
        assert!(res.verdicts.is_empty());
        assert!(res.all_passed);

        let res = grade(failed("", "boom"), &[]);
        assert!(res.verdicts.is_empty());
        assert_eq!(res.error.as_deref(), Some("boom"));
        assert!(!res.all_passed);
    }

    #[test]
    fn verdicts_keep_order_and_carry_whole_output() {
        let assertions: Vec<_> = ["c", "a", "b"]
            .iter()
            .map(|name| Assertion::new(*name, *name))
            .collect();
        let res = grade(ok("a\nb"), &assertions);

        let names: Vec<_> = res.verdicts.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert!(res.verdicts.iter().all(|v| v.actual == "a\nb"));
        assert_eq!(res.verdicts[0].expected, "c");
        assert_eq!(res.num_passed(), 2);
        assert_eq!(res.num_failed(), 1);
    }
}
