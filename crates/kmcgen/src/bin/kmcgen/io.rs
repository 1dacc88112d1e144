use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use kmcgen::model::ProcessList;

pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn load_model(path: &Path) -> Result<ProcessList> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    ProcessList::from_json(&text)
        .with_context(|| format!("Invalid model: {}", path.display()))
}

/// Ask on the terminal whether `path` may be overwritten. Non-interactive
/// runs always decline.
pub fn confirm_overwrite(path: &Path) -> bool {
    if !(stdin_is_tty() && stderr_is_tty()) {
        return false;
    }
    {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{} already exists. Overwrite? [y/N] ", path.display());
        let _ = stderr.flush();
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
