//! Profile selection by ordinal position

use super::SyncError;
use std::io::{BufRead, Write};

/// Chooses one profile from the eligible list
pub trait ProfileSelector {
    /// Index into `profiles` of the chosen profile
    fn select(&mut self, profiles: &[String]) -> Result<usize, SyncError>;
}

/// Parse a 1-based ordinal into an index; anything else is rejected
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SyncError> {
    let invalid = || SyncError::InvalidSelection {
        input: input.trim().to_string(),
        count,
    };

    let ordinal: usize = input.trim().parse().map_err(|_| invalid())?;
    if ordinal == 0 || ordinal > count {
        return Err(invalid());
    }
    Ok(ordinal - 1)
}

/// Selection given up front (e.g. `--profile 2`)
#[derive(Debug, Clone)]
pub struct FixedSelection(pub String);

impl ProfileSelector for FixedSelection {
    fn select(&mut self, profiles: &[String]) -> Result<usize, SyncError> {
        parse_selection(&self.0, profiles.len())
    }
}

/// Lists the profiles and reads one answer; no retry on a bad answer
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ProfileSelector for PromptSelector<R, W> {
    fn select(&mut self, profiles: &[String]) -> Result<usize, SyncError> {
        writeln!(self.output, "Profiles:")?;
        for (i, profile) in profiles.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, profile)?;
        }
        write!(self.output, "Select a profile by number: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        parse_selection(&answer, profiles.len())
    }
}
