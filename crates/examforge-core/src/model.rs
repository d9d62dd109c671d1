//! Core data model types for examforge.
//!
//! These are the types that flow through the whole system: matrix rows
//! planned by the exam author, the per-question plans expanded from them, and
//! the exam items that carry generated content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::content::QuestionContent;

/// Status string for an item whose content was generated without degradation.
pub const STATUS_OK: &str = "OK";

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Matching,
    FillBlank,
    Essay,
}

impl QuestionType {
    /// All question types in display order.
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::Matching,
        QuestionType::FillBlank,
        QuestionType::Essay,
    ];

    /// Stable tag used in files and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::Matching => "matching",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::Essay => "essay",
        }
    }

    /// Label printed in the exam document.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Trắc nghiệm nhiều lựa chọn",
            QuestionType::TrueFalse => "Đúng/Sai",
            QuestionType::Matching => "Nối cột",
            QuestionType::FillBlank => "Điền khuyết",
            QuestionType::Essay => "Tự luận",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().replace(['-', ' '], "_").as_str() {
            "multiple_choice" | "mcq" | "mc" => return Ok(QuestionType::MultipleChoice),
            "true_false" | "tf" => return Ok(QuestionType::TrueFalse),
            "matching" | "match" => return Ok(QuestionType::Matching),
            "fill_blank" | "fill_in_blank" | "fill" => return Ok(QuestionType::FillBlank),
            "essay" => return Ok(QuestionType::Essay),
            _ => {}
        }
        QuestionType::ALL
            .into_iter()
            .find(|t| t.label() == trimmed)
            .ok_or_else(|| format!("unsupported question type: {trimmed}"))
    }
}

/// Difficulty level, ordered from recall to application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    M1,
    M2,
    M3,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::M1, Level::M2, Level::M3];

    /// Full label, e.g. "M1 – Nhận biết".
    pub fn label(&self) -> &'static str {
        match self {
            Level::M1 => "M1 – Nhận biết",
            Level::M2 => "M2 – Kết nối",
            Level::M3 => "M3 – Vận dụng",
        }
    }

    /// What a question at this level asks of the student.
    pub fn description(&self) -> &'static str {
        match self {
            Level::M1 => {
                "Recall: restate, describe or apply knowledge directly in a familiar situation."
            }
            Level::M2 => {
                "Connect: link and organise knowledge to solve a similar problem."
            }
            Level::M3 => {
                "Apply: use knowledge in a new or near-real-life situation."
            }
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::M1 => write!(f, "M1"),
            Level::M2 => write!(f, "M2"),
            Level::M3 => write!(f, "M3"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let short = trimmed.get(..2).unwrap_or(trimmed).to_uppercase();
        match short.as_str() {
            "M1" => Ok(Level::M1),
            "M2" => Ok(Level::M2),
            "M3" => Ok(Level::M3),
            _ => Err(format!("unknown level: {trimmed} (expected M1, M2 or M3)")),
        }
    }
}

/// One planned exam item before any content exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatrixRow {
    /// Short opaque identifier.
    pub id: String,
    pub subject: String,
    pub topic: String,
    /// Lesson label, e.g. "Bài 3: Phân số thập phân".
    pub lesson: String,
    /// Learning-outcome text the items must target.
    pub outcome: String,
    pub question_type: QuestionType,
    pub level: Level,
    /// Base point value per item, used when allocation has not run.
    pub points: f64,
    /// Number of items this row expands into.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Instructional periods for the lesson; 0 means unknown.
    #[serde(default)]
    pub periods: u32,
    /// Point pool this row belongs to in two-block mode.
    #[serde(default = "default_block")]
    pub block: u8,
    /// Share of the pool in percent, set by allocation.
    #[serde(default)]
    pub ratio: Option<f64>,
    /// Allocated point value, set by allocation.
    #[serde(default)]
    pub allocated_points: Option<f64>,
    /// Where an auto-filled period count came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_note: Option<String>,
}

fn default_count() -> u32 {
    1
}

fn default_block() -> u8 {
    1
}

impl MatrixRow {
    /// Create a row with a fresh identifier and no allocation.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject: impl Into<String>,
        topic: impl Into<String>,
        lesson: impl Into<String>,
        outcome: impl Into<String>,
        question_type: QuestionType,
        level: Level,
        points: f64,
        count: u32,
    ) -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(8);
        Self {
            id,
            subject: subject.into(),
            topic: topic.into(),
            lesson: lesson.into(),
            outcome: outcome.into(),
            question_type,
            level,
            points,
            count: count.max(1),
            periods: 0,
            block: default_block(),
            ratio: None,
            allocated_points: None,
            period_note: None,
        }
    }

    pub fn with_periods(mut self, periods: u32) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_block(mut self, block: u8) -> Self {
        self.block = block;
        self
    }

    /// Point value each expanded item receives: the allocated value when
    /// present and non-zero, the base value otherwise.
    pub fn effective_points(&self) -> f64 {
        match self.allocated_points {
            Some(p) if p != 0.0 => p,
            _ => self.points,
        }
    }

    /// Expand this row into `count` independent question plans.
    pub fn expand(&self) -> Vec<QuestionPlan> {
        let plan = QuestionPlan {
            subject: self.subject.clone(),
            topic: self.topic.clone(),
            lesson: self.lesson.clone(),
            outcome: self.outcome.clone(),
            question_type: self.question_type,
            level: self.level,
            points: self.effective_points(),
        };
        vec![plan; self.count.max(1) as usize]
    }
}

/// Everything the generator needs to write one question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionPlan {
    pub subject: String,
    pub topic: String,
    pub lesson: String,
    pub outcome: String,
    pub question_type: QuestionType,
    pub level: Level,
    pub points: f64,
}

/// A generated question in the exam.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamItem {
    #[serde(flatten)]
    pub plan: QuestionPlan,
    pub content: QuestionContent,
    /// "OK", or the reason the content was degraded to a placeholder.
    pub status: String,
}

impl ExamItem {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_parse() {
        assert_eq!(
            "multiple_choice".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert_eq!(
            "fill-blank".parse::<QuestionType>().unwrap(),
            QuestionType::FillBlank
        );
        assert_eq!(
            "Đúng/Sai".parse::<QuestionType>().unwrap(),
            QuestionType::TrueFalse
        );
        assert_eq!("Tự luận".parse::<QuestionType>().unwrap(), QuestionType::Essay);
        let err = "crossword".parse::<QuestionType>().unwrap_err();
        assert!(err.contains("crossword"));
    }

    #[test]
    fn level_parse_and_order() {
        assert_eq!("m2".parse::<Level>().unwrap(), Level::M2);
        assert_eq!("M3 – Vận dụng".parse::<Level>().unwrap(), Level::M3);
        assert!("M4".parse::<Level>().is_err());
        assert!(Level::M1 < Level::M2 && Level::M2 < Level::M3);
    }

    #[test]
    fn expand_uses_allocated_points_when_set() {
        let mut row = MatrixRow::new(
            "Toán",
            "Số thập phân",
            "Bài 3: Khái niệm",
            "Nhận biết số thập phân",
            QuestionType::MultipleChoice,
            Level::M1,
            1.0,
            3,
        );
        let plans = row.expand();
        assert_eq!(plans.len(), 3);
        assert!(plans.iter().all(|p| p.points == 1.0));

        row.allocated_points = Some(2.5);
        assert!(row.expand().iter().all(|p| p.points == 2.5));

        row.allocated_points = Some(0.0);
        assert!(row.expand().iter().all(|p| p.points == 1.0));
    }

    #[test]
    fn new_row_defaults() {
        let row = MatrixRow::new("a", "b", "c", "d", QuestionType::Essay, Level::M3, 1.0, 0);
        assert_eq!(row.id.len(), 8);
        assert_eq!(row.count, 1);
        assert_eq!(row.block, 1);
        assert!(row.ratio.is_none() && row.allocated_points.is_none());
    }

    #[test]
    fn matrix_row_deserializes_with_defaults() {
        let json = r#"{
            "id": "abc12345", "subject": "Toán", "topic": "T", "lesson": "Bài 1",
            "outcome": "O", "question_type": "essay", "level": "M2", "points": 1.0
        }"#;
        let row: MatrixRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.count, 1);
        assert_eq!(row.periods, 0);
        assert_eq!(row.block, 1);
        assert_eq!(row.ratio, None);
    }
}
