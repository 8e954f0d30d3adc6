//! Terminal output for the CLI
//!
//! Human-readable output goes to stdout, except failures and warnings which
//! go to stderr so `--json` output stays parseable when piped.

use colored::*;
use serde::Serialize;

const RULE_WIDTH: usize = 60;

/// Print a section header framed by horizontal rules
pub fn section(title: &str) {
    let rule = "━".repeat(RULE_WIDTH);
    println!();
    println!("{}", rule.bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", rule.bright_black());
}

/// Print a passed check, e.g. a valid configuration or escrow
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print a failed check on stderr
pub fn error(message: &str) {
    eprintln!("  {} {}", "✗".bright_red(), message.bright_red());
}

/// Print a non-fatal notice on stderr
pub fn warning(message: &str) {
    eprintln!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print an indented key-value pair under a labeled value
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Print a labeled value
pub fn labeled(label: &str, value: &str) {
    println!("  {}: {}", label.bright_white(), value.bright_cyan());
}

/// Print a value as pretty JSON on stdout
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
