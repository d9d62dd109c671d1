//! The learning-outcome catalog (YCCĐ) the exam matrix is built from.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use calamine::Reader;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::normalize::{
    canonical_column, LESSON, LESSON_TITLE, OUTCOME_TEXT, REQUIRED_COLUMNS, SUBJECT, TOPIC,
};

/// One learning outcome of one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub subject: String,
    pub topic: String,
    /// Lesson identifier as written in the catalog, usually a number.
    pub lesson: String,
    pub lesson_title: String,
    pub outcome: String,
}

/// All learning outcomes, in file order.
#[derive(Debug, Clone, Default)]
pub struct OutcomeCatalog {
    rows: Vec<OutcomeRow>,
}

/// Extensions read as spreadsheets; the first worksheet holds the catalog.
const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

impl OutcomeCatalog {
    /// Load a catalog file: `.csv`, or a spreadsheet such as `.xlsx`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let spreadsheet = SPREADSHEET_EXTENSIONS.contains(&extension.as_str());
        if extension != "csv" && !spreadsheet {
            return Err(CatalogError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            });
        }
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let catalog = if spreadsheet {
            Self::from_workbook(path)?
        } else {
            let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_reader(file)?
        };
        tracing::info!(
            path = %path.display(),
            outcomes = catalog.len(),
            "loaded outcome catalog"
        );
        Ok(catalog)
    }

    /// Parse CSV data with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let records = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;
        Self::from_table(&headers, records)
    }

    /// Read the first worksheet of a spreadsheet. Its first row is the header.
    pub fn from_workbook(path: &Path) -> Result<Self, CatalogError> {
        let mut workbook = calamine::open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CatalogError::EmptyWorkbook(path.to_path_buf()))??;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
        let headers = rows.next().unwrap_or_default();
        Self::from_table(&headers, rows)
    }

    /// Map a header row onto the canonical columns and collect the rows that
    /// carry outcome text.
    fn from_table(
        headers: &[String],
        records: impl IntoIterator<Item = Vec<String>>,
    ) -> Result<Self, CatalogError> {
        let headers: Vec<String> = headers.iter().map(|h| canonical_column(h)).collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !headers.iter().any(|h| h == *c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::MissingColumns {
                missing,
                required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: headers,
            });
        }
        let index = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
        let (subject, topic, lesson, title, outcome) = (
            index(SUBJECT),
            index(TOPIC),
            index(LESSON),
            index(LESSON_TITLE),
            index(OUTCOME_TEXT),
        );

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for record in records {
            let cell = |i: usize| record.get(i).map(|c| c.trim()).unwrap_or_default().to_string();
            let row = OutcomeRow {
                subject: cell(subject),
                topic: cell(topic),
                lesson: cell(lesson),
                lesson_title: cell(title),
                outcome: cell(outcome),
            };
            if row.outcome.is_empty() {
                dropped += 1;
                continue;
            }
            rows.push(row);
        }
        if dropped > 0 {
            tracing::debug!(dropped, "dropped catalog rows without outcome text");
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[OutcomeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct subjects, sorted.
    pub fn subjects(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|r| &r.subject))
    }

    /// Distinct topics of a subject, sorted.
    pub fn topics(&self, subject: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|r| r.subject == subject)
                .map(|r| &r.topic),
        )
    }

    /// Distinct lessons of a topic, ordered so that "2" sorts before "10".
    pub fn lessons(&self, subject: &str, topic: &str) -> Vec<String> {
        let mut lessons = distinct(
            self.rows
                .iter()
                .filter(|r| r.subject == subject && r.topic == topic)
                .map(|r| &r.lesson),
        );
        lessons.sort_by(|a, b| (a.chars().count(), a).cmp(&(b.chars().count(), b)));
        lessons
    }

    /// Outcome texts of a lesson, in file order.
    pub fn outcomes(&self, subject: &str, topic: &str, lesson: &str) -> Vec<&OutcomeRow> {
        self.rows
            .iter()
            .filter(|r| r.subject == subject && r.topic == topic && r.lesson == lesson)
            .collect()
    }

    /// Title of a lesson, taken from its first catalog row.
    pub fn lesson_title(&self, subject: &str, topic: &str, lesson: &str) -> Option<&str> {
        self.outcomes(subject, topic, lesson)
            .first()
            .map(|r| r.lesson_title.as_str())
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\u{feff}Môn,Chủ đề/Chủ điểm,Bài,Tên bài học,Yêu cầu cần đạt,Ghi chú
Toán,Số thập phân,10,Khái niệm số thập phân,Đọc viết được số thập phân,
Toán,Số thập phân,2,Ôn tập phân số, So sánh được hai phân số ,x
Toán,Số thập phân,2,Ôn tập phân số,   ,
Toán,Hình học,15,Hình tam giác,Nhận biết hình tam giác,
Khoa học,Chất,1,Thành phần của đất,Nêu được thành phần của đất,
";

    #[test]
    fn loads_and_normalizes() {
        let catalog = OutcomeCatalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4, "blank outcome row is dropped");
        assert_eq!(catalog.rows()[1].outcome, "So sánh được hai phân số");
        assert_eq!(catalog.subjects(), vec!["Khoa học", "Toán"]);
        assert_eq!(catalog.topics("Toán"), vec!["Hình học", "Số thập phân"]);
        assert_eq!(catalog.lessons("Toán", "Số thập phân"), vec!["2", "10"]);
        assert_eq!(
            catalog.lesson_title("Toán", "Số thập phân", "10"),
            Some("Khái niệm số thập phân")
        );
        assert_eq!(catalog.outcomes("Toán", "Số thập phân", "2").len(), 1);
    }

    #[test]
    fn missing_columns_are_listed() {
        let data = "Subject,Topic,Lesson\nToán,Số,1\n";
        let err = OutcomeCatalog::from_reader(data.as_bytes()).unwrap_err();
        match err {
            CatalogError::MissingColumns { missing, found, .. } => {
                assert_eq!(missing, vec!["LessonTitle", "OutcomeText"]);
                assert_eq!(found, vec!["Subject", "Topic", "Lesson"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_rejects_other_extensions_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("outcomes.pdf");
        std::fs::write(&pdf, b"").unwrap();
        assert!(matches!(
            OutcomeCatalog::load(&pdf),
            Err(CatalogError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            OutcomeCatalog::load(&dir.path().join("missing.csv")),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            OutcomeCatalog::load(&dir.path().join("missing.xlsx")),
            Err(CatalogError::NotFound(_))
        ));

        let broken = dir.path().join("broken.xlsx");
        std::fs::write(&broken, b"not a workbook").unwrap();
        assert!(matches!(
            OutcomeCatalog::load(&broken),
            Err(CatalogError::Spreadsheet(_))
        ));
    }

    #[test]
    fn load_from_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("khoi5.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        let header = ["Môn", "Chủ đề/Chủ điểm", "Bài", "Tên bài học", "Yêu cầu cần đạt"];
        for (col, name) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        let rows = [
            ("Toán", "Số thập phân", 10.0, "Khái niệm số thập phân", " Đọc, viết được số thập phân "),
            ("Toán", "Số thập phân", 2.0, "Ôn tập phân số", ""),
            ("Khoa học", "Chất", 1.0, "Thành phần của đất", "Nêu được thành phần của đất"),
        ];
        for (i, (subject, topic, lesson, title, outcome)) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string(r, 0, *subject).unwrap();
            sheet.write_string(r, 1, *topic).unwrap();
            sheet.write_number(r, 2, *lesson).unwrap();
            sheet.write_string(r, 3, *title).unwrap();
            if !outcome.is_empty() {
                sheet.write_string(r, 4, *outcome).unwrap();
            }
        }
        workbook.save(&path).unwrap();

        let catalog = OutcomeCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2, "blank outcome row is dropped");
        assert_eq!(catalog.rows()[0].lesson, "10");
        assert_eq!(catalog.rows()[0].outcome, "Đọc, viết được số thập phân");
        assert_eq!(catalog.subjects(), vec!["Khoa học", "Toán"]);
        assert_eq!(
            catalog.lesson_title("Toán", "Số thập phân", "10"),
            Some("Khái niệm số thập phân")
        );
    }

    #[test]
    fn spreadsheet_missing_columns_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Subject").unwrap();
        sheet.write_string(0, 1, "Topic").unwrap();
        sheet.write_string(1, 0, "Toán").unwrap();
        workbook.save(&path).unwrap();

        match OutcomeCatalog::load(&path) {
            Err(CatalogError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["Lesson", "LessonTitle", "OutcomeText"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let catalog = OutcomeCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 4);
    }
}
