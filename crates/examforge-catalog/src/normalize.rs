//! Column-header normalization for catalog files.
//!
//! Headers arrive in many spellings ("Yêu cầu cần đạt", "yeu_cau_can_dat",
//! "YCCĐ", "Outcome"). Each header is tidied, then reduced to an
//! accent-free lowercase key and looked up in the alias table.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const SUBJECT: &str = "Subject";
pub const TOPIC: &str = "Topic";
pub const LESSON: &str = "Lesson";
pub const LESSON_TITLE: &str = "LessonTitle";
pub const OUTCOME_TEXT: &str = "OutcomeText";

/// Canonical columns every outcome catalog must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [SUBJECT, TOPIC, LESSON, LESSON_TITLE, OUTCOME_TEXT];

/// Accent-free lowercase key → canonical column.
const ALIASES: &[(&str, &str)] = &[
    ("mon", SUBJECT),
    ("mon hoc", SUBJECT),
    ("subject", SUBJECT),
    ("chu de", TOPIC),
    ("chu diem", TOPIC),
    ("chu de/chu diem", TOPIC),
    ("topic", TOPIC),
    ("bai", LESSON),
    ("lesson", LESSON),
    ("lesson number", LESSON),
    ("bai hoc", LESSON_TITLE),
    ("ten bai hoc", LESSON_TITLE),
    ("ten bai", LESSON_TITLE),
    ("lesson title", LESSON_TITLE),
    ("lessontitle", LESSON_TITLE),
    ("yccd", OUTCOME_TEXT),
    ("yeu cau can dat", OUTCOME_TEXT),
    ("yeu cau can dat (tom tat)", OUTCOME_TEXT),
    ("outcome", OUTCOME_TEXT),
    ("outcome text", OUTCOME_TEXT),
    ("outcometext", OUTCOME_TEXT),
    ("learning outcome", OUTCOME_TEXT),
];

/// Trim, turn underscores into spaces and collapse whitespace.
pub fn tidy_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, diacritic-free form of a header used for alias lookup.
pub fn header_key(header: &str) -> String {
    tidy_header(header)
        .to_lowercase()
        .replace('đ', "d")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Map a raw header to its canonical name, or its tidied form if unknown.
pub fn canonical_column(header: &str) -> String {
    let key = header_key(header);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| tidy_header(header))
}
