//! The `examforge edit` command.

use std::path::PathBuf;

use anyhow::Result;

use super::{read_json, Globals};

pub fn execute(globals: &Globals, item: usize, content: PathBuf) -> Result<()> {
    let value = read_json(&content)?;
    let mut session = globals.load_session()?;
    session.edit_item(item, value)?;
    globals.save_session(&session)?;
    println!("Updated Câu {item}.");
    Ok(())
}
