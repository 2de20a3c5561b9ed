use colored::Colorize;

/// Width of the stage banner separators.
const BANNER_WIDTH: usize = 60;

/// Print a bannered stage line: separator, message, separator.
pub fn stage_banner(msg: &str) {
    let line = "=".repeat(BANNER_WIDTH);
    println!();
    println!("{}", line.cyan());
    println!("  {}", msg.bold());
    println!("{}", line.cyan());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.len()).dimmed());
}
