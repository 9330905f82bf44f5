//! Interactive role filter selection.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use ods_model::RoleFilter;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("input closed before an answer was given")]
    Eof,
}

/// Ask whether to filter by role and, if so, which role.
///
/// `y` or `yes` (any casing) opens the role prompt; any other answer
/// selects every active organisation.
pub fn prompt_role_filter<R, W>(input: &mut R, output: &mut W) -> Result<RoleFilter, PromptError>
where
    R: BufRead,
    W: Write,
{
    let answer = ask(input, output, "Filter by role name? (y/n): ")?;
    if !is_yes(&answer) {
        return Ok(RoleFilter::None);
    }
    let role = ask(
        input,
        output,
        "Enter role name (e.g. SUB ICB LOCATION, PHARMACY): ",
    )?;
    Ok(RoleFilter::from_input(&role))
}

fn ask<R, W>(input: &mut R, output: &mut W, question: &str) -> Result<String, PromptError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Eof);
    }
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
