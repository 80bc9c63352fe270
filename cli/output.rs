use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use codesnap_core::{AppError, Statistics};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::io::{self, Write};

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn readable_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Prints a short yellow summary of entries that were skipped while scanning.
pub fn print_diagnostics(diagnostics: &[AppError], quiet: bool) {
    if diagnostics.is_empty() || quiet {
        return;
    }
    eprintln!(
        "\n{}",
        format!(
            "⚠️ Warning: {} entries were skipped or degraded:",
            diagnostics.len()
        )
        .yellow()
    );
    for err in diagnostics {
        eprintln!(" - {}", err);
    }
    eprintln!("---");
}

pub fn print_stats_pretty_table(stats: &Statistics) -> Result<()> {
    println!();
    println!("{}", " Snapshot Statistics ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Total Files:".green(),
        stats.total_files.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Total Lines:".green(),
        stats.total_lines.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Average Size:".green(),
        format!("{:.2} bytes", stats.average_size).cyan()
    );
    if stats.total_files > 0 {
        println!(
            "{:<20} {} ({}, {} lines)",
            "Largest File:".green(),
            stats.largest_file.name.cyan(),
            readable_size(stats.largest_file.size),
            stats.largest_file.lines
        );
    }

    if stats.files_per_extension.is_empty() {
        println!("\n{}", "(No files included in the snapshot)".yellow());
        println!();
        return Ok(());
    }

    println!("\n{}", " Per Extension ".green().bold().underline());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Extension").fg(Color::Green),
        Cell::new("Files").fg(Color::Green),
        Cell::new("Lines").fg(Color::Green),
    ]);
    for (ext, files) in &stats.files_per_extension {
        let lines = stats.lines_per_extension.get(ext).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(ext).fg(Color::Cyan),
            Cell::new(files).set_alignment(CellAlignment::Right),
            Cell::new(lines).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}
