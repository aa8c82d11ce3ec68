use std::collections::HashSet;
use std::ops::RangeInclusive;

use thiserror::Error;

use crate::models::ProblemDraft;

pub const TITLE_CHARS: RangeInclusive<usize> = 3..=100;
pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const TIME_LIMIT_MS: RangeInclusive<u32> = 100..=10_000;
pub const MEMORY_LIMIT_MB: RangeInclusive<u32> = 16..=1024;
pub const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemValidationError {
    #[error("Title must be between 3 and 100 characters (got {0})")]
    TitleLength(usize),

    #[error("Description must be at least 20 characters")]
    DescriptionTooShort,

    #[error("Time limit must be between 100 and 10000 ms (got {0})")]
    TimeLimitOutOfRange(u32),

    #[error("Memory limit must be between 16 and 1024 MB (got {0})")]
    MemoryLimitOutOfRange(u32),

    #[error("At least one test case is required")]
    NoTestCases,

    #[error("Test case {0} has no expected output")]
    EmptyExpectedOutput(usize),

    #[error("At least one test case must be marked as a sample")]
    NoSampleTestCase,

    #[error("Tag \"{0}\" is listed more than once")]
    DuplicateTag(String),

    #[error("At most 5 tags are allowed (got {0})")]
    TooManyTags(usize),
}

impl ProblemDraft {
    /// Every rule the draft breaks, in form order.
    pub fn validate(&self) -> Result<(), Vec<ProblemValidationError>> {
        let mut errors = Vec::new();

        let title_len = self.title.trim().chars().count();
        if !TITLE_CHARS.contains(&title_len) {
            errors.push(ProblemValidationError::TitleLength(title_len));
        }

        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            errors.push(ProblemValidationError::DescriptionTooShort);
        }

        if !TIME_LIMIT_MS.contains(&self.time_limit_ms) {
            errors.push(ProblemValidationError::TimeLimitOutOfRange(self.time_limit_ms));
        }
        if !MEMORY_LIMIT_MB.contains(&self.memory_limit_mb) {
            errors.push(ProblemValidationError::MemoryLimitOutOfRange(
                self.memory_limit_mb,
            ));
        }

        let tags = normalized_tags(&self.tags);
        if tags.len() > MAX_TAGS {
            errors.push(ProblemValidationError::TooManyTags(tags.len()));
        }
        let mut seen = HashSet::new();
        for tag in &tags {
            if !seen.insert(tag.to_lowercase()) {
                errors.push(ProblemValidationError::DuplicateTag(tag.clone()));
            }
        }

        if self.test_cases.is_empty() {
            errors.push(ProblemValidationError::NoTestCases);
        } else {
            for (index, case) in self.test_cases.iter().enumerate() {
                if case.expected_output.trim().is_empty() {
                    errors.push(ProblemValidationError::EmptyExpectedOutput(index + 1));
                }
            }
            if !self.test_cases.iter().any(|case| case.is_sample) {
                errors.push(ProblemValidationError::NoSampleTestCase);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Copy with trimmed text fields and blank tags removed, ready to send.
    pub fn normalized(&self) -> ProblemDraft {
        ProblemDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            tags: normalized_tags(&self.tags),
            constraints: self.constraints.trim().to_string(),
            ..self.clone()
        }
    }
}

fn normalized_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Splits the comma separated tag field of the form.
pub fn parse_tags(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, TestCase};

    fn valid_draft() -> ProblemDraft {
        ProblemDraft {
            title: "Two Sum".to_string(),
            description: "Find two indices whose values add up to the target.".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["array".to_string(), "hash-map".to_string()],
            constraints: "2 <= n <= 10^4".to_string(),
            time_limit_ms: 1000,
            memory_limit_mb: 256,
            test_cases: vec![
                TestCase {
                    input: "4\n2 7 11 15\n9".to_string(),
                    expected_output: "0 1".to_string(),
                    is_sample: true,
                },
                TestCase {
                    input: "3\n3 2 4\n6".to_string(),
                    expected_output: "1 2".to_string(),
                    is_sample: false,
                },
            ],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(valid_draft().validate(), Ok(()));
    }

    #[test]
    fn reports_every_violation() {
        let draft = ProblemDraft {
            title: "  A ".to_string(),
            description: "too short".to_string(),
            time_limit_ms: 50,
            memory_limit_mb: 4096,
            test_cases: Vec::new(),
            ..valid_draft()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ProblemValidationError::TitleLength(1),
                ProblemValidationError::DescriptionTooShort,
                ProblemValidationError::TimeLimitOutOfRange(50),
                ProblemValidationError::MemoryLimitOutOfRange(4096),
                ProblemValidationError::NoTestCases,
            ]
        );
    }

    #[test]
    fn test_cases_need_output_and_a_sample() {
        let mut draft = valid_draft();
        for case in &mut draft.test_cases {
            case.is_sample = false;
        }
        draft.test_cases[1].expected_output = "   ".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ProblemValidationError::EmptyExpectedOutput(2),
                ProblemValidationError::NoSampleTestCase,
            ]
        );
    }

    #[test]
    fn tags_are_unique_and_bounded() {
        let mut draft = valid_draft();
        draft.tags = parse_tags("dp, Greedy, greedy, , math, graphs, trees");
        let errors = draft.validate().unwrap_err();
        assert!(errors.contains(&ProblemValidationError::TooManyTags(6)));
        assert!(errors.contains(&ProblemValidationError::DuplicateTag("greedy".to_string())));
    }

    #[test]
    fn normalized_trims_fields() {
        let mut draft = valid_draft();
        draft.title = "  Two Sum  ".to_string();
        draft.tags = vec![" array ".to_string(), "".to_string()];
        let clean = draft.normalized();
        assert_eq!(clean.title, "Two Sum");
        assert_eq!(clean.tags, vec!["array"]);
        assert_eq!(clean.test_cases, draft.test_cases);
    }
}
