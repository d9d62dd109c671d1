//! The `examforge fill-periods` command.

use anyhow::Result;

use examforge_catalog::PeriodCatalog;

use super::Globals;

pub fn execute(globals: &Globals) -> Result<()> {
    let config = globals.load_config()?;
    let catalog = PeriodCatalog::load(&config.data.periods)?;
    anyhow::ensure!(
        !catalog.is_empty(),
        "period catalog {} is empty; run `examforge extract-periods` first",
        config.data.periods.display()
    );

    let mut session = globals.load_session()?;
    let unknown = session.matrix_rows.iter().filter(|r| r.periods == 0).count();
    let matched = catalog.autofill(&mut session.matrix_rows);
    globals.save_session(&session)?;

    for row in session.matrix_rows.iter().filter(|r| r.period_note.is_some()) {
        println!(
            "  {} {}: {}",
            row.subject,
            row.lesson,
            row.period_note.as_deref().unwrap_or_default()
        );
    }
    println!("Filled {matched} of {unknown} row(s) without period counts.");
    Ok(())
}
