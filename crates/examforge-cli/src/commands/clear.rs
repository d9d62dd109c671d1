//! The `examforge clear` command.

use anyhow::Result;

use super::Globals;

pub fn execute(globals: &Globals) -> Result<()> {
    let mut session = globals.load_session()?;
    let removed = session.matrix_rows.len();
    session.clear_matrix();
    globals.save_session(&session)?;
    println!("Removed {removed} matrix row(s).");
    Ok(())
}
