//! Period-count extraction from a teaching-plan document.
//!
//! The plan lists lessons per subject as `Bài 12: Title (3 tiết)`. Text is
//! split into subject sections by their `Môn ...` headings, then lessons
//! are matched inside each section.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::periods::PeriodRow;

/// Turns a teaching-plan document into period rows.
pub trait PeriodExtractor {
    fn extract(&self, bytes: &[u8], source: &str) -> Result<Vec<PeriodRow>>;

    fn extract_file(&self, path: &Path) -> Result<Vec<PeriodRow>> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.extract(&bytes, &source)
    }
}

/// Extracts from PDF text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPeriodExtractor;

impl PeriodExtractor for PdfPeriodExtractor {
    fn extract(&self, bytes: &[u8], source: &str) -> Result<Vec<PeriodRow>> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| anyhow::anyhow!("failed to read PDF text from {source}: {e:?}"))?;
        let rows = extract_from_text(&text, source);
        tracing::info!(source, lessons = rows.len(), "extracted period counts");
        Ok(rows)
    }
}

/// Subject name and the heading that opens its section.
const SUBJECT_HEADINGS: &[(&str, &str)] = &[
    ("Tiếng Việt", r"(?i)Môn\s+TIẾNG\s+VIỆT"),
    ("Toán", r"(?i)Môn\s+TOÁN"),
    ("Lịch sử và Địa lí", r"(?i)Môn\s+LỊCH\s+SỬ\s+VÀ\s+ĐỊA\s+LÍ"),
    ("Khoa học", r"(?i)Môn\s+KHOA\s+HỌC"),
    ("Tin học", r"(?i)Môn\s+TIN\s+HỌC"),
    ("Công nghệ", r"(?i)Môn\s+CÔNG\s+NGHỆ"),
];

static HEADING_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SUBJECT_HEADINGS
        .iter()
        .map(|(name, pat)| (*name, Regex::new(pat).unwrap()))
        .collect()
});

/// `Bài 12: Title (3 tiết)`
static PARENTHESIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Bài\s*(\d{1,3})\s*[:\-–]?\s*([^\(\n\r]{0,120}?)\s*\(\s*(\d{1,2})\s*tiết\s*\)")
        .unwrap()
});

/// `Bài 12 Title 3 tiết`
static TRAILING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Bài\s*(\d{1,3})\s*[:\-–]?\s*([^\n\r]{0,120}?)\s*(\d{1,2})\s*tiết\b").unwrap()
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Split `text` into subject sections in document order.
fn sections(text: &str) -> Vec<(&'static str, &str)> {
    let mut starts: Vec<(usize, &'static str)> = HEADING_RES
        .iter()
        .filter_map(|(name, re)| re.find(text).map(|m| (m.start(), *name)))
        .collect();
    starts.sort();
    starts
        .iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = starts.get(i + 1).map(|(s, _)| *s).unwrap_or(text.len());
            (*name, &text[*start..end])
        })
        .collect()
}

fn clean_title(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(raw, " ")
        .trim_matches(|c: char| " -–:;,.".contains(c))
        .to_string()
}

/// Extract lesson period counts from plain text.
///
/// `(n tiết)` matches win; a bare `n tiết` only fills lessons still missing
/// and needs a title of at least three characters. The first match of a
/// lesson number wins.
pub fn extract_from_text(text: &str, source: &str) -> Vec<PeriodRow> {
    let mut rows = Vec::new();
    for (subject, section) in sections(text) {
        let mut found: BTreeMap<u32, (String, u32)> = BTreeMap::new();

        for caps in PARENTHESIZED_RE.captures_iter(section) {
            let (Ok(number), Ok(periods)) = (caps[1].parse::<u32>(), caps[3].parse::<u32>()) else {
                continue;
            };
            found
                .entry(number)
                .or_insert_with(|| (clean_title(&caps[2]), periods));
        }

        for caps in TRAILING_RE.captures_iter(section) {
            let (Ok(number), Ok(periods)) = (caps[1].parse::<u32>(), caps[3].parse::<u32>()) else {
                continue;
            };
            if found.contains_key(&number) {
                continue;
            }
            let title = clean_title(&caps[2]);
            if title.chars().count() >= 3 {
                found.insert(number, (title, periods));
            }
        }

        tracing::debug!(subject, lessons = found.len(), "matched lessons in section");
        rows.extend(found.into_iter().map(|(number, (title, periods))| PeriodRow {
            subject: subject.to_string(),
            lesson_number: number,
            title,
            periods,
            provenance: source.to_string(),
        }));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "KẾ HOẠCH DẠY HỌC LỚP 5
Môn TOÁN
Bài 2: Ôn tập phân số (2 tiết)
Bài 1 - Ôn tập số tự nhiên (3 tiết)
Bài 2: Trùng lặp (9 tiết)
Bài 5 Phân số thập phân 2 tiết
Bài 6 ab 1 tiết
Môn Khoa học
Bài 1: Thành phần   của đất. (2 tiết)
Bài 3 Vai trò của nước 3 tiết
";

    #[test]
    fn extracts_per_subject_sorted() {
        let rows = extract_from_text(PLAN, "K5.pdf");
        let toan: Vec<_> = rows.iter().filter(|r| r.subject == "Toán").collect();
        assert_eq!(
            toan.iter().map(|r| r.lesson_number).collect::<Vec<_>>(),
            vec![1, 2, 5]
        );
        assert_eq!(toan[0].title, "Ôn tập số tự nhiên");
        assert_eq!(toan[0].periods, 3);
        assert_eq!(toan[1].title, "Ôn tập phân số");
        assert_eq!(toan[1].periods, 2, "first match wins");
        assert_eq!(toan[2].title, "Phân số thập phân");
        assert!(toan.iter().all(|r| r.provenance == "K5.pdf"));

        let science: Vec<_> = rows.iter().filter(|r| r.subject == "Khoa học").collect();
        assert_eq!(science.len(), 2);
        assert_eq!(science[0].title, "Thành phần của đất");
        assert_eq!(science[1].periods, 3);
    }

    #[test]
    fn short_trailing_titles_are_skipped() {
        let rows = extract_from_text(PLAN, "K5.pdf");
        assert!(!rows
            .iter()
            .any(|r| r.subject == "Toán" && r.lesson_number == 6));
    }

    #[test]
    fn text_without_headings_yields_nothing() {
        assert!(extract_from_text("Bài 1: Số (2 tiết)", "x").is_empty());
    }

    #[test]
    fn sections_follow_document_order() {
        let text = "Môn Khoa học\nBài 1: Đất đai (2 tiết)\nMôn Toán\nBài 1: Số học (4 tiết)\n";
        let rows = extract_from_text(text, "plan.pdf");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject, "Khoa học");
        assert_eq!(rows[0].periods, 2);
        assert_eq!(rows[1].subject, "Toán");
        assert_eq!(rows[1].periods, 4);
    }
}
