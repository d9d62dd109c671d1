//! The `examforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examforge_core::model::QuestionType;
use examforge_core::validator::validate;

use super::read_json;

pub fn execute(question_type: String, content: PathBuf) -> Result<()> {
    let question_type: QuestionType = question_type.parse().map_err(anyhow::Error::msg)?;
    let value = read_json(&content)?;

    let validation = validate(question_type, &value);
    anyhow::ensure!(validation.ok, "invalid content: {}", validation.message);
    println!("{}: {}", question_type.label(), validation.message);
    Ok(())
}
