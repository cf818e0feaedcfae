//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::{Link, Mechanic};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One catalog row: `#id name (year)` plus the description, dimmed.
pub fn mechanic_row(m: &Mechanic) {
    let id = format!("#{}", m.id);
    match m.description.as_deref() {
        Some(desc) if !desc.is_empty() => {
            println!("{:>5} {}  {}", id.dimmed(), m, desc.dimmed())
        }
        _ => println!("{:>5} {}", id.dimmed(), m),
    }
}

/// One link row, resolving names through `name_of` when possible.
pub fn link_row(l: &Link, name_of: impl Fn(i64) -> Option<String>) {
    let end = |id: i64| name_of(id).unwrap_or_else(|| format!("#{id}"));
    println!(
        "{:>5} {} {} {}",
        format!("#{}", l.id).dimmed(),
        end(l.from_id),
        format!("--{}->", l.kind.label()).blue(),
        end(l.to_id)
    );
}
