//! The `examforge export` command.

use std::path::PathBuf;

use anyhow::Result;

use examforge_report::{write_html_report, ExportMeta};

use super::Globals;

pub fn execute(
    globals: &Globals,
    output: PathBuf,
    title: Option<String>,
    subject: Option<String>,
    time: Option<u32>,
) -> Result<()> {
    let config = globals.load_config()?;
    let session = globals.load_session()?;
    anyhow::ensure!(
        !session.exam.is_empty(),
        "no exam to export; run `examforge generate` first"
    );

    let meta = ExportMeta {
        title: title.unwrap_or_else(|| config.exam.title.clone()),
        subject,
        grade: config.exam.grade,
        time_minutes: time.unwrap_or(config.exam.time_minutes),
    };

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");

    let html_path = output.join(format!("exam-{timestamp}.html"));
    write_html_report(&meta, &session.exam, &html_path)?;
    println!("Exam document: {}", html_path.display());

    let session_path = output.join(format!("session-{timestamp}.json"));
    session.save_json(&session_path)?;
    println!("Session snapshot: {}", session_path.display());
    Ok(())
}
