//! Idempotence checks for rig synthesis.
//!
//! Synthesizers must leave a skeleton byte-identical when run again on their
//! own output. [`verify_idempotent`] runs an operation repeatedly on a copy
//! of a skeleton and compares the pretty JSON document after each run.
//!
//! # Example
//!
//! ```rust,ignore
//! use autorig_tests::idempotence::verify_idempotent;
//!
//! let result = verify_idempotent(&skeleton, 3, |s| synthesize_hands(s).map(drop));
//! result.assert_idempotent();
//! ```

use std::fmt;

use autorig_skeleton::{RigResult, Skeleton};

/// First differing line between two serialized skeletons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    /// One-based line number.
    pub line: usize,
    pub expected: String,
    pub actual: String,
    /// Which run (0-indexed) diverged from the first.
    pub run_index: usize,
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Difference at line {} (run {}):\n  expected: {}\n  actual:   {}",
            self.line, self.run_index, self.expected, self.actual
        )
    }
}

/// Result of an idempotence verification.
#[derive(Debug, Clone)]
pub struct IdempotenceResult {
    pub is_idempotent: bool,
    pub runs: usize,
    /// Size of the serialized skeleton after the first run.
    pub document_size: usize,
    pub diff: Option<LineDiff>,
}

impl IdempotenceResult {
    /// Panics with the first difference if the runs diverged.
    pub fn assert_idempotent(&self) {
        if let Some(diff) = &self.diff {
            panic!(
                "Synthesis is not idempotent!\nRuns: {}\nDocument size: {} bytes\n{}",
                self.runs, self.document_size, diff
            );
        }
    }
}

fn first_line_diff(expected: &str, actual: &str, run_index: usize) -> Option<LineDiff> {
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return None,
            (e, a) if e == a => continue,
            (e, a) => {
                return Some(LineDiff {
                    line,
                    expected: e.unwrap_or("<end of document>").to_string(),
                    actual: a.unwrap_or("<end of document>").to_string(),
                    run_index,
                })
            }
        }
    }
}

/// Runs `op` `runs` times on a copy of `skeleton` and checks that every run
/// after the first leaves the serialized skeleton unchanged.
///
/// Errors from `op` are returned as-is.
pub fn verify_idempotent<F>(
    skeleton: &Skeleton,
    runs: usize,
    mut op: F,
) -> RigResult<IdempotenceResult>
where
    F: FnMut(&mut Skeleton) -> RigResult<()>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify idempotence");

    let mut working = skeleton.clone();
    op(&mut working)?;
    let reference = working.to_json_pretty()?;

    for run_index in 1..runs {
        op(&mut working)?;
        let document = working.to_json_pretty()?;
        if let Some(diff) = first_line_diff(&reference, &document, run_index) {
            return Ok(IdempotenceResult {
                is_idempotent: false,
                runs,
                document_size: reference.len(),
                diff: Some(diff),
            });
        }
    }

    Ok(IdempotenceResult {
        is_idempotent: true,
        runs,
        document_size: reference.len(),
        diff: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use autorig_skeleton::Vec3;
    use pretty_assertions::assert_eq;

    fn single_bone() -> Skeleton {
        let mut skeleton = Skeleton::new();
        skeleton
            .edit()
            .add_bone("Root", Vec3::zeros(), Vec3::z(), None)
            .unwrap();
        skeleton
    }

    #[test]
    fn test_noop_is_idempotent() {
        let result = verify_idempotent(&single_bone(), 3, |_| Ok(())).unwrap();
        assert!(result.is_idempotent);
        assert_eq!(result.runs, 3);
        result.assert_idempotent();
    }

    #[test]
    fn test_detects_growth() {
        let mut counter = 0;
        let result = verify_idempotent(&single_bone(), 2, |skeleton| {
            counter += 1;
            skeleton.bone_mut("Root")?.set_layer(counter)
        })
        .unwrap();
        assert!(!result.is_idempotent);
        let diff = result.diff.unwrap();
        assert_eq!(diff.run_index, 1);
        assert!(diff.actual.contains("\"layer\": 2"));
    }

    #[test]
    fn test_line_diff_end_of_document() {
        let diff = first_line_diff("a\nb", "a", 1).unwrap();
        assert_eq!(diff.line, 2);
        assert_eq!(diff.actual, "<end of document>");
        assert!(first_line_diff("a\nb", "a\nb", 1).is_none());
    }

    #[test]
    #[should_panic(expected = "not idempotent")]
    fn test_assert_panics() {
        let mut counter = 0;
        verify_idempotent(&single_bone(), 2, |skeleton| {
            counter += 1;
            skeleton.bone_mut("Root")?.set_layer(counter)
        })
        .unwrap()
        .assert_idempotent();
    }
}
