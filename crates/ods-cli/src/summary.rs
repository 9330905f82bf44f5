use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ods_cli::pipeline::{PostcodeStats, RunReport};

pub fn print_summary(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Postcode"),
        header_cell("Returned"),
        header_cell("Matched"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for stats in &report.run.postcodes {
        table.add_row(vec![
            Cell::new(&stats.postcode),
            Cell::new(stats.returned),
            count_cell(stats.matched),
            status_cell(stats),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.run.postcodes.iter().map(|s| s.returned).sum::<usize>())
            .add_attribute(Attribute::Bold),
        count_cell(report.run.total_found()).add_attribute(Attribute::Bold),
        failed_cell(report.run.failed_postcodes()),
    ]);
    println!("{table}");
    println!(
        "Found {} total matching organisations ({})",
        report.run.total_found(),
        report.role_filter
    );
    println!(
        "Saved {} unique organisations to {}",
        report.unique.len(),
        report.output_path.display()
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn status_cell(stats: &PostcodeStats) -> Cell {
    match (&stats.error, stats.had_results) {
        (Some(reason), _) => Cell::new(format!("failed: {reason}")).fg(Color::Red),
        (None, true) => Cell::new("ok"),
        (None, false) => dim_cell("none found"),
    }
}

fn failed_cell(failed: usize) -> Cell {
    if failed > 0 {
        Cell::new(format!("{failed} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}
