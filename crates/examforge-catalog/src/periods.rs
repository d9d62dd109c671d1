//! Lesson → period-count catalog and matrix auto-fill.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use examforge_core::model::MatrixRow;

/// Period count of one lesson of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRow {
    #[serde(rename = "Subject", alias = "Mon")]
    pub subject: String,
    #[serde(rename = "LessonNumber", alias = "Bai_so")]
    pub lesson_number: u32,
    #[serde(rename = "ExtractedTitle", alias = "Ten_bai_trich_xuat")]
    pub title: String,
    #[serde(rename = "PeriodCount", alias = "So_tiet")]
    pub periods: u32,
    #[serde(rename = "Provenance", alias = "Nguon")]
    pub provenance: String,
}

/// Result of looking up a lesson's period count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodLookup {
    Found { periods: u32, note: String },
    Missing { reason: String },
}

impl PeriodLookup {
    pub fn periods(&self) -> Option<u32> {
        match self {
            PeriodLookup::Found { periods, .. } => Some(*periods),
            PeriodLookup::Missing { .. } => None,
        }
    }

    pub fn note(&self) -> &str {
        match self {
            PeriodLookup::Found { note, .. } => note,
            PeriodLookup::Missing { reason } => reason,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodCatalog {
    rows: Vec<PeriodRow>,
}

impl PeriodCatalog {
    pub fn new(rows: Vec<PeriodRow>) -> Self {
        Self { rows }
    }

    /// Load a catalog CSV. A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no period catalog found, starting empty");
            return Ok(Self::default());
        }
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open period catalog: {}", path.display()))?;
        let rows = reader
            .deserialize()
            .enumerate()
            .map(|(idx, record)| {
                record.with_context(|| format!("failed to read period catalog row {}", idx + 1))
            })
            .collect::<Result<Vec<PeriodRow>>>()?;
        tracing::info!(path = %path.display(), lessons = rows.len(), "loaded period catalog");
        Ok(Self { rows })
    }

    /// Write the catalog as CSV with canonical headers.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create period catalog: {}", path.display()))?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        tracing::info!(path = %path.display(), lessons = self.rows.len(), "saved period catalog");
        Ok(())
    }

    pub fn rows(&self) -> &[PeriodRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Period count for the lesson number found in `lesson_text`.
    pub fn find_periods(&self, subject: &str, lesson_text: &str) -> PeriodLookup {
        let Some(number) = lesson_number(lesson_text) else {
            return PeriodLookup::Missing {
                reason: "no lesson number in the lesson label".to_string(),
            };
        };
        match self
            .rows
            .iter()
            .find(|r| r.subject == subject && r.lesson_number == number)
        {
            Some(row) => PeriodLookup::Found {
                periods: row.periods,
                note: format!("matched lesson {number} – {}", row.title),
            },
            None => PeriodLookup::Missing {
                reason: format!("lesson {number} of {subject} is not in the period catalog"),
            },
        }
    }

    /// Fill period counts of rows that have none. Returns how many matched.
    pub fn autofill(&self, rows: &mut [MatrixRow]) -> usize {
        let mut matched = 0;
        for row in rows.iter_mut().filter(|r| r.periods == 0) {
            let lookup = self.find_periods(&row.subject, &row.lesson);
            if let Some(periods) = lookup.periods() {
                matched += 1;
                row.periods = periods;
            }
            row.period_note = Some(lookup.note().to_string());
        }
        tracing::debug!(matched, "auto-filled period counts");
        matched
    }
}

static LESSON_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,3}").unwrap());

/// First run of 1-3 digits in a lesson label.
pub fn lesson_number(text: &str) -> Option<u32> {
    LESSON_NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use examforge_core::model::{Level, QuestionType};

    fn catalog() -> PeriodCatalog {
        PeriodCatalog::new(vec![
            PeriodRow {
                subject: "Toán".into(),
                lesson_number: 3,
                title: "Phân số thập phân".into(),
                periods: 2,
                provenance: "K5.pdf".into(),
            },
            PeriodRow {
                subject: "Khoa học".into(),
                lesson_number: 3,
                title: "Đất".into(),
                periods: 3,
                provenance: "K5.pdf".into(),
            },
        ])
    }

    fn row(subject: &str, lesson: &str, periods: u32) -> MatrixRow {
        MatrixRow::new(
            subject,
            "Chủ đề",
            lesson,
            "Yêu cầu",
            QuestionType::Essay,
            Level::M1,
            1.0,
            1,
        )
        .with_periods(periods)
    }

    #[test]
    fn lesson_number_takes_first_digits() {
        assert_eq!(lesson_number("Bài 12: Hình tròn"), Some(12));
        assert_eq!(lesson_number("7"), Some(7));
        assert_eq!(lesson_number("Bài 1234"), Some(123));
        assert_eq!(lesson_number("Ôn tập"), None);
    }

    #[test]
    fn find_periods_matches_subject_and_number() {
        let catalog = catalog();
        let lookup = catalog.find_periods("Khoa học", "Bài 3: Đất");
        assert_eq!(lookup.periods(), Some(3));
        assert!(lookup.note().contains("lesson 3"));

        let lookup = catalog.find_periods("Toán", "Bài 9");
        assert_eq!(lookup.periods(), None);
        assert!(lookup.note().contains("not in the period catalog"));

        let lookup = catalog.find_periods("Toán", "Ôn tập");
        assert!(lookup.note().contains("no lesson number"));
    }

    #[test]
    fn autofill_only_touches_unknown_rows() {
        let mut rows = vec![
            row("Toán", "Bài 3: Phân số thập phân", 0),
            row("Toán", "Bài 3: Phân số thập phân", 5),
            row("Toán", "Bài 40", 0),
        ];
        let matched = catalog().autofill(&mut rows);
        assert_eq!(matched, 1);
        assert_eq!(rows[0].periods, 2);
        assert_eq!(rows[1].periods, 5);
        assert!(rows[1].period_note.is_none());
        assert_eq!(rows[2].periods, 0);
        assert!(rows[2].period_note.is_some());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ppct").join("periods.csv");
        catalog().save(&path).unwrap();
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("Subject,LessonNumber,ExtractedTitle,PeriodCount,Provenance"));
        let loaded = PeriodCatalog::load(&path).unwrap();
        assert_eq!(loaded.rows(), catalog().rows());
    }

    #[test]
    fn load_accepts_legacy_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ppct_k5_extracted.csv");
        std::fs::write(
            &path,
            "Mon,Bai_so,Ten_bai_trich_xuat,So_tiet,Nguon\nToán,3,Phân số thập phân,2,K5.pdf\n",
        )
        .unwrap();
        let loaded = PeriodCatalog::load(&path).unwrap();
        assert_eq!(loaded.find_periods("Toán", "Bài 3").periods(), Some(2));
    }

    #[test]
    fn missing_file_is_empty() {
        let loaded = PeriodCatalog::load(Path::new("/nonexistent/periods.csv")).unwrap();
        assert!(loaded.is_empty());
    }
}
