//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Category, Entry, Ledger};

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

const CHILD_PREFIX: &str = "-- ";

/// Amount with a fixed number of decimals.
pub fn format_amount(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Variance as a percentage with a fixed number of decimals.
pub fn format_variance(variance: f64, precision: usize) -> String {
    format!("{variance:.precision$}%")
}

fn colored_variance(text: String, variance: f64) -> String {
    if variance > 0.0 {
        text.green().to_string()
    } else if variance < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Render the ledger as a `Label | Value | Variance %` table with a grand total row.
pub fn render_table(ledger: &Ledger, precision: usize) -> String {
    let rows: Vec<(String, &Entry)> = ledger
        .categories()
        .iter()
        .flat_map(|category| {
            std::iter::once((category.entry().label().to_string(), category.entry())).chain(
                category
                    .children()
                    .unwrap_or(&[])
                    .iter()
                    .map(|child| (format!("{CHILD_PREFIX}{}", child.label()), child)),
            )
        })
        .collect();

    let total_label = "Grand Total";
    let total = format_amount(ledger.grand_total(), precision);

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain([total_label.len(), "Label".len()])
        .max()
        .unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, entry)| format_amount(entry.value(), precision).len())
        .chain([total.len(), "Value".len()])
        .max()
        .unwrap_or(0);
    let variance_width = rows
        .iter()
        .map(|(_, entry)| format_variance(entry.variance(), precision).len())
        .chain(["Variance %".len()])
        .max()
        .unwrap_or(0);

    let header = format!(
        "{:<label_width$}  {:>value_width$}  {:>variance_width$}",
        "Label", "Value", "Variance %"
    );
    let body = rows.iter().map(|(label, entry)| {
        let variance = format!(
            "{:>variance_width$}",
            format_variance(entry.variance(), precision)
        );
        format!(
            "{:<label_width$}  {:>value_width$}  {}",
            label,
            format_amount(entry.value(), precision),
            colored_variance(variance, entry.variance())
        )
    });
    let footer = format!("{:<label_width$}  {:>value_width$}", total_label, total);

    std::iter::once(header.cyan().bold().to_string())
        .chain(body)
        .chain(std::iter::once(footer.bold().to_string()))
        .join("\n")
}

fn entry_line(entry: &Entry, precision: usize) -> String {
    format!(
        "{} [{}] {} ({})",
        entry.label(),
        entry.id(),
        format_amount(entry.value(), precision),
        format_variance(entry.variance(), precision)
    )
}

/// Render the ledger as a tree rooted at the grand total.
pub fn render_tree(ledger: &Ledger, precision: usize) -> Tree<String> {
    let leaves = ledger.categories().iter().map(|category| {
        let node = Tree::new(entry_line(category.entry(), precision));
        match category {
            Category::Leaf(_) => node,
            Category::Parent { children, .. } => node.with_leaves(
                children
                    .iter()
                    .map(|child| Tree::new(entry_line(child, precision))),
            ),
        }
    });
    Tree::new(format!(
        "Grand Total {}",
        format_amount(ledger.grand_total(), precision)
    ))
    .with_leaves(leaves)
}
