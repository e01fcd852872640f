use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use et_domain::{Isk, ItemProfitability, TradeOpportunity};
use thousands::Separable;

/// `1234567.89` renders as `1.234.567,89`.
pub fn format_isk(amount: Isk) -> String {
    format_hundredths(amount.cents())
}

pub fn format_decimal(value: f64) -> String {
    format_hundredths((value * 100.0).round() as i64)
}

fn format_hundredths(hundredths: i64) -> String {
    let sign = if hundredths < 0 { "-" } else { "" };
    let abs = hundredths.unsigned_abs();
    format!("{}{},{:02}", sign, (abs / 100).separate_with_dots(), abs % 100)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn align_numbers(table: &mut Table, first_numeric_column: usize) {
    let column_count = table.column_count();
    for index in first_numeric_column..column_count {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn items_table(items: &[ItemProfitability], top: usize) -> Table {
    let mut table = new_table(vec!["Item", "Units", "Unit Volume", "Total Profit", "Unit Profit", "Profit / m³"]);

    for item in items.iter().take(top) {
        table.add_row(vec![
            item.name.clone(),
            item.units.separate_with_dots(),
            format_decimal(item.unit_volume),
            format_isk(item.total_profit),
            format_decimal(item.unit_profit),
            format_decimal(item.profit_per_volume),
        ]);
    }
    align_numbers(&mut table, 1);
    table
}

pub fn opportunities_table(opportunities: &[TradeOpportunity], top: usize) -> Table {
    let mut table = new_table(vec!["From", "To", "Item", "Units", "Unit Volume", "Total Profit", "Unit Profit", "Profit / m³"]);

    for opportunity in opportunities.iter().take(top) {
        table.add_row(vec![
            opportunity.origin.clone(),
            opportunity.destination.clone(),
            opportunity.item_name.clone(),
            opportunity.units.separate_with_dots(),
            format_decimal(opportunity.unit_volume),
            format_isk(opportunity.total_profit),
            format_decimal(opportunity.unit_profit),
            format_decimal(opportunity.profit_per_volume),
        ]);
    }
    align_numbers(&mut table, 3);
    table
}

pub fn route_line(route: &[String]) -> String {
    let jumps = route.len().saturating_sub(1);
    format!("{} ({} {})", route.join(" -> "), jumps, if jumps == 1 { "jump" } else { "jumps" })
}
