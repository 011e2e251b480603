//! Pure formatting functions for UI output.
//!
//! Progress and results go to stdout, errors and warnings to stderr.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the tag change about to be made.
///
/// # Arguments
/// * `old_tag` - Latest existing tag (None when starting from the baseline)
/// * `new_tag` - The tag being created
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Display manual push instruction for a tag that exists only locally.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} Tag {} exists locally only. Push it once the remote is reachable:\n  {}\n  or delete it with: {}",
        style("→").yellow(),
        tag,
        style(format!("git push {} {}", remote, tag)).cyan(),
        style(format!("git tag -d {}", tag)).cyan()
    );
}

/// Display the manual steps after a detected conflict.
pub fn display_conflict_instructions(branch: &str, target: &str) {
    println!(
        "\n{} Resolve manually on '{}':\n  {}\n  fix the conflicts, then commit",
        style("→").yellow(),
        target,
        style(format!("git merge {}", branch)).cyan()
    );
}
