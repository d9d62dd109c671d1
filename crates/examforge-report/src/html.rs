//! Printable exam document.
//!
//! Produces a self-contained HTML file with all CSS inlined: the question
//! section, a page break, then the answer key.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examforge_core::content::QuestionContent;
use examforge_core::model::ExamItem;

/// Header information printed above the questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub title: String,
    /// Defaults to the first item's subject.
    pub subject: Option<String>,
    pub grade: u8,
    pub time_minutes: u32,
}

impl Default for ExportMeta {
    fn default() -> Self {
        Self {
            title: "ĐỀ KIỂM TRA ĐỊNH KÌ".to_string(),
            subject: None,
            grade: 5,
            time_minutes: 40,
        }
    }
}

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Point value without trailing zeros ("1", "0.5", "2.25").
pub fn format_points(points: f64) -> String {
    let text = format!("{points:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn paragraph(html: &mut String, class: &str, text: &str) {
    html.push_str(&format!("<p class=\"{class}\">{}</p>\n", html_escape(text)));
}

/// Generate the exam document for `items`.
pub fn generate_html(meta: &ExportMeta, items: &[ExamItem]) -> String {
    let subject = meta
        .subject
        .clone()
        .or_else(|| items.first().map(|i| i.plan.subject.clone()))
        .unwrap_or_default();

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<meta name=\"generator\" content=\"examforge {}\">\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    ));
    html.push_str(&format!("<title>{}</title>\n", html_escape(&meta.title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{}</h1>\n",
        html_escape(&meta.title.to_uppercase())
    ));
    paragraph(
        &mut html,
        "meta",
        &format!(
            "Môn: {subject}  •  Lớp: {}  •  Thời gian: {} phút",
            meta.grade, meta.time_minutes
        ),
    );
    html.push_str("</header>\n");

    html.push_str("<section class=\"questions\">\n");
    html.push_str("<h2>I. PHẦN CÂU HỎI</h2>\n");
    for (i, item) in items.iter().enumerate() {
        push_question(&mut html, i + 1, item);
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"answer-key\">\n");
    html.push_str("<h2>ĐÁP ÁN - HƯỚNG DẪN</h2>\n");
    for (i, item) in items.iter().enumerate() {
        html.push_str(&format!("<p class=\"item-header\">Câu {}:</p>\n", i + 1));
        paragraph(&mut html, "answer", &answer_line(&item.content));
    }
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn push_question(html: &mut String, number: usize, item: &ExamItem) {
    html.push_str("<div class=\"item\">\n");
    paragraph(
        html,
        "item-header",
        &format!(
            "Câu {number}. ({} điểm) {} - {}",
            format_points(item.plan.points),
            item.plan.question_type.label(),
            item.plan.level.label()
        ),
    );
    paragraph(html, "stem", item.content.stem());

    match &item.content {
        QuestionContent::MultipleChoice(q) => {
            for (letter, option) in q.options.lettered() {
                paragraph(html, "option", &format!("{letter}. {option}"));
            }
        }
        QuestionContent::TrueFalse(q) => {
            for (j, s) in q.statements.iter().enumerate() {
                paragraph(html, "option", &format!("{}) {}", j + 1, s.statement));
            }
        }
        QuestionContent::Matching(q) => {
            let columns = &q.matching;
            let rows = columns.left.len().max(columns.right.len()).max(1);
            html.push_str("<table class=\"matching\">\n");
            html.push_str("<thead><tr><th>Cột A</th><th>Cột B</th></tr></thead>\n<tbody>\n");
            for r in 0..rows {
                let cell = |side: &[String]| side.get(r).map(|s| html_escape(s)).unwrap_or_default();
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    cell(&columns.left),
                    cell(&columns.right)
                ));
            }
            html.push_str("</tbody></table>\n");
        }
        QuestionContent::FillBlank(q) => paragraph(html, "text", &q.fill_blank.text),
        QuestionContent::Essay(q) => paragraph(html, "text", &q.essay.prompt),
    }
    html.push_str("</div>\n");
}

/// Answer-key line for one item.
fn answer_line(content: &QuestionContent) -> String {
    match content {
        QuestionContent::MultipleChoice(q) => format!("Đáp án: {}", q.correct_answer),
        QuestionContent::TrueFalse(q) => {
            let pattern = q
                .statements
                .iter()
                .enumerate()
                .map(|(j, s)| format!("{}={}", j + 1, if s.answer { "Đ" } else { "S" }))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Đáp án: {pattern}")
        }
        QuestionContent::Matching(q) => {
            let map = q
                .matching
                .pairs()
                .into_iter()
                .map(|(left, right)| format!("{left}→{right}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Đáp án: {map}")
        }
        QuestionContent::FillBlank(q) => format!("Đáp án: {}", q.fill_blank.answer),
        QuestionContent::Essay(q) => match q.essay.rubric.as_deref() {
            Some(rubric) if !rubric.is_empty() => format!("Gợi ý chấm: {}", rubric.join("; ")),
            _ => "Gợi ý chấm: (GV tự chấm theo đáp án/ý chính)".to_string(),
        },
    }
}

/// Write the exam document to a file.
pub fn write_html_report(meta: &ExportMeta, items: &[ExamItem], path: &Path) -> Result<()> {
    let html = generate_html(meta, items);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write exam document: {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
@page { size: A4; margin: 2cm 2cm 2cm 3cm; }
body { font-family: 'Times New Roman', Times, serif; font-size: 13pt; line-height: 1.15; margin: 0 auto; max-width: 17cm; color: #000; }
header { text-align: center; }
h1 { font-size: 14pt; margin-bottom: 0.3rem; }
h2 { font-size: 13pt; margin-top: 1.5rem; }
p { margin: 0 0 6pt 0; }
.item { margin-bottom: 10pt; }
.item-header { font-weight: bold; }
.option { padding-left: 1.5rem; }
table.matching { border-collapse: collapse; margin: 6pt 0; }
table.matching th, table.matching td { border: 1px solid #000; padding: 4pt 10pt; text-align: left; }
.answer-key { page-break-before: always; break-before: page; }
"#;
