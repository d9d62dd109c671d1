//! The `examforge extract-periods` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use examforge_catalog::{PdfPeriodExtractor, PeriodCatalog, PeriodExtractor};

use super::Globals;

pub fn execute(globals: &Globals, pdf: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let config = globals.load_config()?;
    let output = output.unwrap_or_else(|| config.data.periods.clone());

    let rows = PdfPeriodExtractor.extract_file(&pdf)?;
    anyhow::ensure!(
        !rows.is_empty(),
        "no lesson period counts found in {}",
        pdf.display()
    );

    let mut per_subject: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        *per_subject.entry(row.subject.as_str()).or_default() += 1;
    }
    for (subject, lessons) in &per_subject {
        println!("  {subject}: {lessons} lesson(s)");
    }

    let count = rows.len();
    PeriodCatalog::new(rows).save(&output)?;
    println!("Saved {count} lesson(s) to {}", output.display());
    Ok(())
}
