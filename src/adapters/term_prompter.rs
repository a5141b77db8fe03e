//! `TermPrompter`: the `Prompter` port backed by stderr/stdin, in the style
//! of the teacher's `commands::command_approval` and `configure_shell`
//! `[y/N]` prompts. Only compiled for the `cli` binary.

use std::io::{self, IsTerminal, Write};

use crate::error::{Error, Result};
use crate::ports::{BranchConflictChoice, Prompter};

pub struct TermPrompter;

impl TermPrompter {
    fn read_line(&self, prompt: &str) -> Result<String> {
        eprint!("{prompt}");
        io::stderr()
            .flush()
            .map_err(|e| Error::io(".", e))?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|e| Error::io(".", e))?;
        Ok(input.trim().to_string())
    }
}

impl Prompter for TermPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        if !self.is_interactive() {
            return Ok(false);
        }
        let answer = self.read_line(&format!("{message} [y/N] "))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn select(&self, message: &str, options: &[String]) -> Result<usize> {
        if !self.is_interactive() {
            return Err(Error::Cancelled {
                reason: "no interactive terminal available".into(),
            });
        }
        eprintln!("{message}");
        for (i, option) in options.iter().enumerate() {
            eprintln!("  {}) {option}", i + 1);
        }
        let answer = self.read_line("> ")?;
        answer
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1 && *n <= options.len())
            .map(|n| n - 1)
            .ok_or_else(|| Error::validation(format!("invalid selection: {answer}")))
    }

    fn multi_select(&self, message: &str, options: &[String]) -> Result<Vec<usize>> {
        if !self.is_interactive() {
            return Err(Error::Cancelled {
                reason: "no interactive terminal available".into(),
            });
        }
        eprintln!("{message}");
        for (i, option) in options.iter().enumerate() {
            eprintln!("  {}) {option}", i + 1);
        }
        let answer = self.read_line("> (comma-separated) ")?;
        answer
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1 && *n <= options.len())
                    .map(|n| n - 1)
                    .ok_or_else(|| Error::validation(format!("invalid selection: {s}")))
            })
            .collect()
    }

    fn resolve_branch_conflict(&self, branch: &str) -> Result<BranchConflictChoice> {
        if !self.is_interactive() {
            return Ok(BranchConflictChoice::Cancel);
        }
        let answer = self.read_line(&format!(
            "Branch '{branch}' already exists locally. [o]verwrite, [u]se existing, [c]ancel? "
        ))?;
        Ok(match answer.to_lowercase().as_str() {
            "o" | "overwrite" => BranchConflictChoice::Overwrite,
            "u" | "use" | "use existing" => BranchConflictChoice::UseExisting,
            _ => BranchConflictChoice::Cancel,
        })
    }

    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }
}
