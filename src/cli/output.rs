//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;
use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::domain::{Disposition, Summary};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

fn tint(disposition: Disposition, count: usize) -> ColoredString {
    let text = count.to_string();
    if count == 0 {
        return text.normal();
    }
    match disposition {
        Disposition::PassThrough => text.green(),
        Disposition::Rewritten => text.cyan(),
        Disposition::Excluded => text.yellow(),
        Disposition::Skipped => text.magenta(),
    }
}

/// Print the end-of-run report.
///
/// ```text
/// ✓ src -> dest
///   copied:      12
///   rewritten:   3
///   excluded:    7
///   directories: 4
/// ```
pub fn summary(src: &Path, dest: &Path, summary: &Summary) {
    if summary.dry_run {
        println!("{}", "Dry run: nothing written".cyan().bold());
    }
    println!("{} {} -> {}", "✓".green(), src.display(), dest.display());

    let mut rows = vec![
        (Disposition::PassThrough, summary.pass_through),
        (Disposition::Rewritten, summary.rewritten),
        (Disposition::Excluded, summary.excluded),
    ];
    if summary.skipped > 0 {
        rows.push((Disposition::Skipped, summary.skipped));
    }
    for (disposition, count) in rows {
        let label = format!("{}:", disposition);
        println!("  {:<12} {}", label, tint(disposition, count));
    }
    println!("  {:<12} {}", "directories:", summary.directories);
}
