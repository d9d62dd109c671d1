//! The `examforge allocate` command.

use anyhow::Result;

use examforge_core::allocator::AllocationMode;

use super::Globals;

pub fn execute(
    globals: &Globals,
    whole_exam: bool,
    block1: Option<f64>,
    block2: Option<f64>,
) -> Result<()> {
    let config = globals.load_config()?;
    let mode = if whole_exam {
        AllocationMode::WholeExam
    } else {
        AllocationMode::TwoBlock {
            block1_points: block1.unwrap_or(config.allocation.block1_points),
            block2_points: block2.unwrap_or(config.allocation.block2_points),
        }
    };

    let mut session = globals.load_session()?;
    let result = session.allocate(mode);
    globals.save_session(&session)?;
    result?;

    for row in &session.matrix_rows {
        println!(
            "  {} {} → {}% / {} point(s)",
            row.id,
            row.lesson,
            row.ratio.unwrap_or_default(),
            row.allocated_points.unwrap_or_default()
        );
    }
    println!("Allocated points for {} row(s).", session.matrix_rows.len());
    Ok(())
}
