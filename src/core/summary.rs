use crate::core::{Cell, ColumnType, ProjectedTable, SummaryRow};
use std::collections::HashSet;

#[derive(Default)]
struct Kinds {
    boolean: bool,
    integer: bool,
    float: bool,
    text: bool,
}

impl Kinds {
    fn observe(&mut self, cell: &Cell) {
        match cell {
            Cell::Null => {}
            Cell::Bool(_) => self.boolean = true,
            Cell::Number(n) if n.is_f64() => self.float = true,
            Cell::Number(_) => self.integer = true,
            Cell::Text(_) => self.text = true,
        }
    }

    fn column_type(&self) -> ColumnType {
        match (self.boolean, self.integer, self.float, self.text) {
            (false, false, false, false) => ColumnType::Empty,
            (true, false, false, false) => ColumnType::Boolean,
            (false, true, false, false) => ColumnType::Integer,
            (false, _, true, false) => ColumnType::Float,
            (false, false, false, true) => ColumnType::String,
            _ => ColumnType::Mixed,
        }
    }
}

fn kind_tag(cell: &Cell) -> u8 {
    match cell {
        Cell::Null => 0,
        Cell::Bool(_) => 1,
        Cell::Number(_) => 2,
        Cell::Text(_) => 3,
    }
}

/// Per-column overview: non-null/null counts, inferred type and number of
/// distinct non-null values.
pub fn summarize(table: &ProjectedTable) -> Vec<SummaryRow> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let mut kinds = Kinds::default();
            let mut distinct: HashSet<(u8, String)> = HashSet::new();
            let mut non_null = 0;

            for cell in table.rows().iter().filter_map(|row| row.get(index)) {
                if cell.is_null() {
                    continue;
                }
                non_null += 1;
                kinds.observe(cell);
                distinct.insert((kind_tag(cell), cell.render()));
            }

            SummaryRow {
                column: column.clone(),
                non_null,
                null: table.len() - non_null,
                data_type: kinds.column_type(),
                unique_values: distinct.len(),
            }
        })
        .collect()
}
