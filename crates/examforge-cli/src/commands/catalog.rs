//! The `examforge catalog` command.

use std::path::PathBuf;

use anyhow::Result;

use examforge_catalog::{OutcomeCatalog, PeriodCatalog};

use super::Globals;

pub fn execute(
    globals: &Globals,
    subject: Option<String>,
    topic: Option<String>,
    lesson: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let config = globals.load_config()?;
    let path = file.unwrap_or_else(|| config.data.outcomes.clone());
    let catalog = OutcomeCatalog::load(&path)?;

    let Some(subject) = subject else {
        println!("Subjects ({} outcomes):", catalog.len());
        for s in catalog.subjects() {
            println!("  {s}");
        }
        return Ok(());
    };

    let Some(topic) = topic else {
        println!("Topics of {subject}:");
        for t in catalog.topics(&subject) {
            println!("  {t}");
        }
        return Ok(());
    };

    let Some(lesson) = lesson else {
        println!("Lessons of {subject} / {topic}:");
        for l in catalog.lessons(&subject, &topic) {
            let title = catalog.lesson_title(&subject, &topic, &l).unwrap_or_default();
            println!("  {l:>4}  {title}");
        }
        return Ok(());
    };

    let outcomes = catalog.outcomes(&subject, &topic, &lesson);
    anyhow::ensure!(
        !outcomes.is_empty(),
        "no outcomes for {subject} / {topic} / lesson {lesson}"
    );
    println!(
        "Bài {lesson}: {}",
        catalog.lesson_title(&subject, &topic, &lesson).unwrap_or_default()
    );

    let periods = PeriodCatalog::load(&config.data.periods)?;
    if !periods.is_empty() {
        let lookup = periods.find_periods(&subject, &lesson);
        match lookup.periods() {
            Some(n) => println!("Suggested periods: {n} ({})", lookup.note()),
            None => println!("Suggested periods: none ({})", lookup.note()),
        }
    }

    println!("Outcomes:");
    for (i, row) in outcomes.iter().enumerate() {
        println!("  {}. {}", i + 1, row.outcome);
    }
    Ok(())
}
