//! Working state of one exam: the matrix and the generated items.
//!
//! The session is plain data owned by the caller and persisted as JSON with
//! exactly two top-level fields, `matrix_rows` and `exam`.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::allocator::{allocate, AllocationMode};
use crate::content::QuestionContent;
use crate::error::{AllocationError, EditError};
use crate::generator::QuestionGenerator;
use crate::model::{ExamItem, MatrixRow, QuestionPlan, STATUS_OK};

/// Progress reporting for exam generation passes. Item indices are 1-based.
pub trait ProgressReporter: Send + Sync {
    fn on_item_start(&self, index: usize, total: usize, plan: &QuestionPlan);
    fn on_item_complete(&self, index: usize, item: &ExamItem);
    fn on_exam_complete(&self, total: usize, degraded: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_item_start(&self, _: usize, _: usize, _: &QuestionPlan) {}
    fn on_item_complete(&self, _: usize, _: &ExamItem) {}
    fn on_exam_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Expand matrix rows into one plan per item, in matrix order.
pub fn blueprint(rows: &[MatrixRow]) -> Vec<QuestionPlan> {
    rows.iter().flat_map(MatrixRow::expand).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub matrix_rows: Vec<MatrixRow>,
    #[serde(default)]
    pub exam: Vec<ExamItem>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the session as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        tracing::info!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Load a session from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let session: Session =
            serde_json::from_str(&content).context("failed to parse session JSON")?;
        Ok(session)
    }

    /// Append a row to the matrix.
    pub fn add_row(&mut self, row: MatrixRow) {
        self.matrix_rows.push(row);
    }

    /// Remove every matrix row.
    pub fn clear_matrix(&mut self) {
        self.matrix_rows.clear();
    }

    /// Recompute ratio and points of every row.
    pub fn allocate(&mut self, mode: AllocationMode) -> Result<(), AllocationError> {
        allocate(&mut self.matrix_rows, mode)
    }

    /// The plans the current matrix expands into.
    pub fn blueprint(&self) -> Vec<QuestionPlan> {
        blueprint(&self.matrix_rows)
    }

    /// Replace the exam with freshly generated items for the current matrix.
    pub async fn generate_exam(
        &mut self,
        generator: &QuestionGenerator,
        progress: &dyn ProgressReporter,
    ) {
        let plans = self.blueprint();
        self.exam = generate_items(plans, generator, progress).await;
    }

    /// Regenerate content for the existing items, keeping their plans.
    pub async fn regenerate_exam(
        &mut self,
        generator: &QuestionGenerator,
        progress: &dyn ProgressReporter,
    ) {
        let plans = self.exam.iter().map(|item| item.plan.clone()).collect();
        self.exam = generate_items(plans, generator, progress).await;
    }

    /// Replace the content of question `number` (1-based) with `content`.
    ///
    /// The new content must pass validation for the item's question type;
    /// otherwise the item is left unchanged.
    pub fn edit_item(&mut self, number: usize, content: Value) -> Result<(), EditError> {
        let len = self.exam.len();
        let item = number
            .checked_sub(1)
            .and_then(|i| self.exam.get_mut(i))
            .ok_or(EditError::NoSuchItem { index: number, len })?;
        let content = QuestionContent::from_value(item.plan.question_type, content)
            .map_err(EditError::Rejected)?;
        item.content = content;
        item.status = STATUS_OK.to_string();
        Ok(())
    }

    /// Sum of the exam's item points.
    pub fn total_points(&self) -> f64 {
        self.exam.iter().map(|item| item.plan.points).sum()
    }
}

async fn generate_items(
    plans: Vec<QuestionPlan>,
    generator: &QuestionGenerator,
    progress: &dyn ProgressReporter,
) -> Vec<ExamItem> {
    let start = Instant::now();
    let total = plans.len();
    let mut items = Vec::with_capacity(total);
    let mut degraded = 0usize;

    for (index, plan) in plans.into_iter().enumerate() {
        progress.on_item_start(index + 1, total, &plan);
        let generation = generator.generate(&plan).await;
        if !generation.ok {
            degraded += 1;
        }
        let item = ExamItem {
            plan,
            content: generation.content,
            status: generation.status,
        };
        progress.on_item_complete(index + 1, &item);
        items.push(item);
    }

    tracing::info!(total, degraded, "exam generation pass complete");
    progress.on_exam_complete(total, degraded, start.elapsed());
    items
}
