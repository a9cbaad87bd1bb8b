use crate::cell::Cell;
use crate::gviz::GvizRow;

static NULL_CELL: Cell = Cell::Null;

/// One normalized sheet row, addressed by zero-based column position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: Vec<Cell>,
}

impl Record {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cell at `col`; columns past the end of the row read as `Null`.
    pub fn get(&self, col: usize) -> &Cell {
        self.cells.get(col).unwrap_or(&NULL_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Cell> for Record {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Normalize a gviz row: every cell keeps its position, empty cells become `Null`.
pub fn normalize_row(row: &GvizRow) -> Record {
    row.c
        .iter()
        .map(|cell| Cell::from_json(cell.as_ref().and_then(|c| c.v.as_ref())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gviz::GvizCell;
    use serde_json::json;

    #[test]
    fn normalize_keeps_positions_and_nulls_empty_cells() {
        let row = GvizRow {
            c: vec![
                Some(GvizCell { v: Some(json!("A")), f: None }),
                None,
                Some(GvizCell { v: None, f: Some("".into()) }),
                Some(GvizCell { v: Some(json!(4.5)), f: Some("4.5".into()) }),
            ],
        };
        let record = normalize_row(&row);
        assert_eq!(record.len(), 4);
        assert_eq!(record.get(0), &Cell::from("A"));
        assert_eq!(record.get(1), &Cell::Null);
        assert_eq!(record.get(2), &Cell::Null);
        assert_eq!(record.get(3), &Cell::Number(4.5));
    }

    #[test]
    fn columns_past_the_end_are_null() {
        let record = Record::new(vec![Cell::from("x")]);
        assert_eq!(record.get(10), &Cell::Null);
        assert!(Record::default().get(0).is_null());
    }
}
