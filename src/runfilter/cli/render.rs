//! Terminal output. Layout math lives here so handlers stay one-liners.

use colored::*;
use runfilter::api::FilterView;
use runfilter::error::Result;
use runfilter::nav::Navigator;
use runfilter::operators::{OperatorDescriptor, OperatorMode};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const CHIP_MARKER: &str = "●";
const COLUMN_GAP: usize = 2;

pub fn print_query(query: &str) {
    println!("{}", query);
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_chips<N: Navigator>(view: &FilterView<'_, N>) {
    let chips = view.chips();
    if chips.is_empty() {
        println!("{}", "No filters.".dimmed());
    }
    let policy = &view.filters().context().policy;
    for (chip, field) in chips.iter().zip(view.filters().fields()) {
        let line = format!("  {} {}", CHIP_MARKER, chip);
        if policy.is_remove_blocked(field) {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    let pagination = view.filters().pagination();
    println!(
        "{}",
        format!(
            "page {}, {} per page",
            pagination.page, pagination.page_size
        )
        .dimmed()
    );
}

fn mode_name(mode: OperatorMode) -> &'static str {
    match mode {
        OperatorMode::Single => "single",
        OperatorMode::Multi => "multi",
        OperatorMode::Bool => "bool",
    }
}

pub fn print_operators(operators: &[&OperatorDescriptor]) {
    let name_width = column_width(operators.iter().map(|d| d.name));
    let label_width = column_width(operators.iter().map(|d| d.label));

    for d in operators {
        println!(
            "  {}{}{}{}{}{}{}",
            d.name.bold(),
            pad(d.name, name_width),
            d.wire.yellow(),
            " ".repeat(COLUMN_GAP + 1),
            d.label,
            pad(d.label, label_width),
            mode_name(d.mode).dimmed(),
        );
    }
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|c| c.width()).max().unwrap_or(0) + COLUMN_GAP
}

fn pad(cell: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(cell.width()))
}
