//! Generation instructions and offline placeholder content.

use std::collections::BTreeMap;

use crate::content::{
    BlankText, Essay, EssayPrompt, FillBlank, Matching, MatchingColumns, MultipleChoice,
    Options, QuestionContent, Statement, TrueFalse,
};
use crate::model::{QuestionPlan, QuestionType};

/// Audience settings folded into every instruction.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// School grade of the students.
    pub grade: u8,
    /// Language the question must be written in.
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            grade: 5,
            language: "Vietnamese".to_string(),
        }
    }
}

const SHAPES: &str = r#"- multiple_choice:
{
  "stem": "...",
  "options": {"A": "...", "B": "...", "C": "...", "D": "..."},
  "correct_answer": "A|B|C|D",
  "explanation": "Short explanation."
}

- true_false:
{
  "stem": "...",
  "statements": [{"statement": "...", "answer": true}, {"statement": "...", "answer": false}],
  "explanation": "Short explanation."
}

- matching:
{
  "stem": "Match column A with column B: ...",
  "matching": {
    "left": ["1) ...", "2) ...", "3) ...", "4) ..."],
    "right": ["A) ...", "B) ...", "C) ...", "D) ..."],
    "answer": {"1": "A", "2": "B", "3": "C", "4": "D"}
  },
  "explanation": "Short explanation."
}

- fill_blank:
{
  "stem": "...",
  "fill_blank": {"text": "... ____ ...", "answer": "..."},
  "explanation": "Short explanation."
}

- essay:
{
  "stem": "...",
  "essay": {"prompt": "...", "rubric": ["Point 1 (x points)", "Point 2 (y points)"]},
  "explanation": "Grading notes."
}"#;

/// Build the natural-language instruction for one question.
pub fn build_prompt(plan: &QuestionPlan, options: &PromptOptions) -> String {
    format!(
        "Subject: {subject}
Topic: {topic}
Lesson: {lesson}
Learning outcome: {outcome}
Question type: {qtype} ({qlabel})
Level: {level_label} ({level})
Points: {points}

Return EXACTLY ONE JSON object (no markdown, no text outside the JSON) in the {qtype} shape below:

{shapes}

Pedagogical constraints:
- Suitable for grade {grade} students; clear wording, no trick questions, no ambiguity.
- Write all question text in {language}.
- Follow the learning outcome closely: {outcome}
- Difficulty: {level_description}
- The question is worth {points} points.",
        subject = plan.subject,
        topic = plan.topic,
        lesson = plan.lesson,
        outcome = plan.outcome,
        qtype = plan.question_type.tag(),
        qlabel = plan.question_type.label(),
        level_label = plan.level.label(),
        level = plan.level,
        points = plan.points,
        shapes = SHAPES,
        grade = options.grade,
        language = options.language,
        level_description = plan.level.description(),
    )
}

/// Deterministic content used offline or when generated content is rejected.
///
/// Always passes validation for the plan's question type.
pub fn placeholder(plan: &QuestionPlan) -> QuestionContent {
    let level = plan.level;
    let outcome = &plan.outcome;
    match plan.question_type {
        QuestionType::MultipleChoice => QuestionContent::MultipleChoice(MultipleChoice {
            stem: format!("({level}) Chọn đáp án đúng: {outcome}"),
            options: Options {
                a: "Phương án A".into(),
                b: "Phương án B".into(),
                c: "Phương án C".into(),
                d: "Phương án D".into(),
            },
            correct_answer: "A".into(),
            explanation: Some("Giải thích ngắn gọn theo nội dung bài học.".into()),
        }),
        QuestionType::TrueFalse => QuestionContent::TrueFalse(TrueFalse {
            stem: format!("({level}) Đánh dấu Đ/S theo yêu cầu: {outcome}"),
            statements: vec![
                Statement {
                    statement: "Mệnh đề 1".into(),
                    answer: true,
                },
                Statement {
                    statement: "Mệnh đề 2".into(),
                    answer: false,
                },
            ],
            explanation: Some("Giải thích ngắn gọn.".into()),
        }),
        QuestionType::Matching => {
            let answer: BTreeMap<String, String> = [("1", "A"), ("2", "B"), ("3", "C"), ("4", "D")]
                .into_iter()
                .map(|(l, r)| (l.to_string(), r.to_string()))
                .collect();
            QuestionContent::Matching(Matching {
                stem: format!("({level}) Nối cột A với cột B cho phù hợp: {outcome}"),
                matching: MatchingColumns {
                    left: vec!["1) A1".into(), "2) A2".into(), "3) A3".into(), "4) A4".into()],
                    right: vec!["A) B1".into(), "B) B2".into(), "C) B3".into(), "D) B4".into()],
                    answer,
                },
                explanation: Some("Giải thích ngắn gọn.".into()),
            })
        }
        QuestionType::FillBlank => QuestionContent::FillBlank(FillBlank {
            stem: format!("({level}) Điền vào chỗ trống: {outcome}"),
            fill_blank: BlankText {
                text: "Nội dung ____ cần điền.".into(),
                answer: "đáp án".into(),
            },
            explanation: Some("Giải thích ngắn gọn.".into()),
        }),
        QuestionType::Essay => QuestionContent::Essay(Essay {
            stem: format!("({level}) Trả lời: {outcome}"),
            essay: EssayPrompt {
                prompt: "Viết câu trả lời đầy đủ.".into(),
                rubric: Some(vec![
                    "Ý 1 (0,5–1 điểm)".into(),
                    "Ý 2 (0,5–1 điểm)".into(),
                ]),
            },
            explanation: Some("Gợi ý chấm.".into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;

    fn plan(question_type: QuestionType, level: Level) -> QuestionPlan {
        QuestionPlan {
            subject: "Khoa học".into(),
            topic: "Chất".into(),
            lesson: "Bài 2: Đất".into(),
            outcome: "Nêu được thành phần của đất".into(),
            question_type,
            level,
            points: 0.5,
        }
    }

    #[test]
    fn every_placeholder_validates_for_its_type() {
        for question_type in QuestionType::ALL {
            for level in Level::ALL {
                let content = placeholder(&plan(question_type, level));
                assert_eq!(content.question_type(), question_type);
                let validation = content.validate();
                assert!(validation.ok, "{question_type}/{level}: {}", validation.message);
            }
        }
    }

    #[test]
    fn placeholder_is_deterministic() {
        let p = plan(QuestionType::Matching, Level::M2);
        assert_eq!(placeholder(&p), placeholder(&p));
        assert!(placeholder(&p).stem().starts_with("(M2)"));
    }

    #[test]
    fn prompt_mentions_plan_and_level() {
        let prompt = build_prompt(&plan(QuestionType::FillBlank, Level::M3), &PromptOptions::default());
        assert!(prompt.contains("Subject: Khoa học"));
        assert!(prompt.contains("Nêu được thành phần của đất"));
        assert!(prompt.contains("fill_blank"));
        assert!(prompt.contains(Level::M3.description()));
        assert!(prompt.contains("grade 5"));
        assert!(prompt.contains("Vietnamese"));
        assert!(prompt.contains("0.5 points"));
    }
}
