//! The `examforge show` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use examforge_core::session::Session;

use super::Globals;

pub fn execute(globals: &Globals) -> Result<()> {
    let session = globals.load_session()?;

    if session.matrix_rows.is_empty() {
        println!("Matrix is empty. Add rows with `examforge add-row`.");
    } else {
        println!("{}", matrix_table(&session));
        println!("Items planned: {}", session.blueprint().len());
    }

    if !session.exam.is_empty() {
        println!("\n{}", exam_table(&session));
        let degraded = session.exam.iter().filter(|i| !i.is_ok()).count();
        println!(
            "Exam: {} item(s), {} point(s), {} with placeholder content",
            session.exam.len(),
            examforge_report::html::format_points(session.total_points()),
            degraded
        );
    }
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn matrix_table(session: &Session) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "#", "Subject", "Lesson", "Outcome", "Type", "Level", "Points", "Count", "Periods",
        "Block", "Ratio %", "Alloc.",
    ]);
    for (i, row) in session.matrix_rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&row.subject),
            Cell::new(&row.lesson),
            Cell::new(&row.outcome),
            Cell::new(row.question_type.label()),
            Cell::new(row.level),
            Cell::new(row.points),
            Cell::new(row.count),
            Cell::new(row.periods),
            Cell::new(row.block),
            Cell::new(optional(row.ratio)),
            Cell::new(optional(row.allocated_points)),
        ]);
    }
    table
}

fn exam_table(session: &Session) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Câu", "Type", "Level", "Points", "Stem", "Status"]);
    for (i, item) in session.exam.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(item.plan.question_type.label()),
            Cell::new(item.plan.level),
            Cell::new(item.plan.points),
            Cell::new(item.content.stem()),
            Cell::new(&item.status),
        ]);
    }
    table
}
