//! The `examforge add-row` command.

use anyhow::{Context, Result};

use examforge_catalog::{OutcomeCatalog, PeriodCatalog};
use examforge_core::model::{Level, MatrixRow, QuestionType};

use super::Globals;

pub struct RowArgs {
    pub subject: String,
    pub topic: String,
    pub lesson: String,
    pub outcome: Option<usize>,
    pub outcome_text: Option<String>,
    pub question_type: String,
    pub level: String,
    pub points: f64,
    pub count: u32,
    pub periods: u32,
    pub block: u8,
}

pub fn execute(globals: &Globals, args: RowArgs) -> Result<()> {
    let question_type: QuestionType = args.question_type.parse().map_err(anyhow::Error::msg)?;
    let level: Level = args.level.parse().map_err(anyhow::Error::msg)?;
    anyhow::ensure!(args.points > 0.0, "points must be positive");
    anyhow::ensure!(
        args.block == 1 || args.block == 2,
        "block must be 1 or 2"
    );

    let config = globals.load_config()?;

    let (lesson, outcome) = match (args.outcome, args.outcome_text) {
        (_, Some(text)) => (args.lesson.clone(), text),
        (Some(number), None) => {
            let catalog = OutcomeCatalog::load(&config.data.outcomes)?;
            let outcomes = catalog.outcomes(&args.subject, &args.topic, &args.lesson);
            let row = number
                .checked_sub(1)
                .and_then(|i| outcomes.get(i))
                .with_context(|| {
                    format!(
                        "outcome {number} not found; lesson {} has {} outcome(s)",
                        args.lesson,
                        outcomes.len()
                    )
                })?;
            (
                format!("Bài {}: {}", args.lesson, row.lesson_title)
                    .trim()
                    .to_string(),
                row.outcome.clone(),
            )
        }
        (None, None) => anyhow::bail!("either --outcome or --outcome-text is required"),
    };

    let mut periods = args.periods;
    if periods == 0 {
        let catalog = PeriodCatalog::load(&config.data.periods)?;
        if let Some(found) = catalog.find_periods(&args.subject, &lesson).periods() {
            println!("Using {found} period(s) from the period catalog.");
            periods = found;
        }
    }

    let row = MatrixRow::new(
        args.subject,
        args.topic,
        lesson,
        outcome,
        question_type,
        level,
        args.points,
        args.count,
    )
    .with_periods(periods)
    .with_block(args.block);

    let mut session = globals.load_session()?;
    println!(
        "Added row {} ({} x {}, {}).",
        row.id,
        row.count,
        row.question_type.label(),
        row.level
    );
    session.add_row(row);
    globals.save_session(&session)?;
    println!("Matrix now has {} row(s).", session.matrix_rows.len());
    Ok(())
}
