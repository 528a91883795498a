//! Interactive prompts

use anyhow::Result;
use std::io::{self, Write};

/// Ask a yes/no question on the terminal
///
/// Returns `false` without asking when stdin is not a TTY.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
