//! The `examforge generate` command.

use std::time::Duration;

use anyhow::Result;

use examforge_core::model::{ExamItem, QuestionPlan};
use examforge_core::session::ProgressReporter;
use examforge_providers::create_generator;

use super::Globals;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_item_start(&self, index: usize, total: usize, plan: &QuestionPlan) {
        eprintln!(
            "  Generating {index}/{total}: {} {} ({})",
            plan.question_type.label(),
            plan.level,
            plan.lesson
        );
    }

    fn on_item_complete(&self, index: usize, item: &ExamItem) {
        if item.is_ok() {
            eprintln!("  Done: Câu {index} OK");
        } else {
            eprintln!("  Done: Câu {index} {}", item.status);
        }
    }

    fn on_exam_complete(&self, total: usize, degraded: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {total} item(s), {degraded} with placeholder content ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(globals: &Globals, offline: bool, regenerate: bool) -> Result<()> {
    let config = globals.load_config()?;
    let mut session = globals.load_session()?;

    if regenerate {
        anyhow::ensure!(
            !session.exam.is_empty(),
            "no exam to regenerate; run `examforge generate` first"
        );
    } else {
        anyhow::ensure!(
            !session.matrix_rows.is_empty(),
            "matrix is empty; add rows with `examforge add-row`"
        );
    }

    let generator = create_generator(&config, offline)?;
    let reporter = ConsoleReporter;
    if regenerate {
        session.regenerate_exam(&generator, &reporter).await;
    } else {
        session.generate_exam(&generator, &reporter).await;
    }
    globals.save_session(&session)?;

    println!(
        "Generated {} item(s) into {}.",
        session.exam.len(),
        globals.session.display()
    );
    Ok(())
}
