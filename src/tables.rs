use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{Comparison, Modality},
    quantity::cost::Cost,
};

#[must_use]
pub fn build_comparison_table(comparison: &Comparison) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec![
        "Modality",
        "Peak demand",
        "Off-peak demand",
        "Consumption",
        "Peak demand cost",
        "Off-peak demand cost",
        "Total",
    ]);

    let green = &comparison.green;
    table.add_row(vec![
        modality_cell(Modality::Green, comparison.recommended_modality),
        Cell::new(format!("{} kW", green.contracted_demand)).set_alignment(CellAlignment::Right),
        Cell::new("same").add_attribute(Attribute::Dim).set_alignment(CellAlignment::Right),
        Cell::new(green.consumption_cost).set_alignment(CellAlignment::Right),
        Cell::new(green.demand_cost).set_alignment(CellAlignment::Right),
        Cell::new("included").add_attribute(Attribute::Dim).set_alignment(CellAlignment::Right),
        total_cell(green.total_cost, Modality::Green, comparison.recommended_modality),
    ]);

    let blue = &comparison.blue;
    table.add_row(vec![
        modality_cell(Modality::Blue, comparison.recommended_modality),
        Cell::new(format!("{} kW", blue.peak_demand)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} kW", blue.off_peak_demand)).set_alignment(CellAlignment::Right),
        Cell::new(blue.consumption_cost).set_alignment(CellAlignment::Right),
        Cell::new(blue.peak_demand_cost).set_alignment(CellAlignment::Right),
        Cell::new(blue.off_peak_demand_cost).set_alignment(CellAlignment::Right),
        total_cell(blue.total_cost, Modality::Blue, comparison.recommended_modality),
    ]);

    table
}

fn modality_cell(modality: Modality, recommended: Modality) -> Cell {
    let cell = Cell::new(modality).fg(match modality {
        Modality::Green => Color::Green,
        Modality::Blue => Color::Blue,
    });
    if modality == recommended { cell.add_attribute(Attribute::Bold) } else { cell }
}

fn total_cell(total_cost: Cost, modality: Modality, recommended: Modality) -> Cell {
    let cell = Cell::new(total_cost).set_alignment(CellAlignment::Right);
    if modality == recommended {
        cell.add_attribute(Attribute::Bold).fg(Color::Green)
    } else {
        cell.add_attribute(Attribute::Dim)
    }
}
