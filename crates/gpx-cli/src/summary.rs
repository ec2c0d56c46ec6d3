use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::DocumentSummary;

pub fn print_summary(path: &Path, summary: &DocumentSummary) {
    println!("File: {}", path.display());
    println!("Version: {}", summary.version);
    if let Some(creator) = &summary.creator {
        println!("Creator: {creator}");
    }
    if let Some(name) = &summary.name {
        println!("Name: {name}");
    }
    if let Some(time) = &summary.time {
        println!("Time: {time}");
    }
    println!("{}", summary_table(summary));
}

/// Count table: one row per collection, with the nested item counts.
pub fn summary_table(summary: &DocumentSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Collection"),
        header_cell("Items"),
        header_cell("Segments"),
        header_cell("Points"),
    ]);
    apply_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    table.add_row(vec![
        Cell::new("Waypoints"),
        Cell::new(summary.waypoints),
        dim_cell("-"),
        Cell::new(summary.waypoints),
    ]);
    table.add_row(vec![
        Cell::new("Routes"),
        Cell::new(summary.routes),
        dim_cell("-"),
        Cell::new(summary.route_points),
    ]);
    table.add_row(vec![
        Cell::new("Tracks"),
        Cell::new(summary.tracks),
        Cell::new(summary.track_segments),
        Cell::new(summary.track_points),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.waypoints + summary.routes + summary.tracks)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.track_segments).add_attribute(Attribute::Bold),
        Cell::new(summary.waypoints + summary.route_points + summary.track_points)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
