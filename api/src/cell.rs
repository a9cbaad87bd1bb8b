//! Scalar cell values and the single numeric coercion used by every view.
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One spreadsheet cell after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Map a gviz `v` value onto a cell. Booleans keep their literal text.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Null,
            Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(Value::Bool(b)) => Cell::Text(b.to_string()),
            Some(other) => Cell::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Null, empty text, or numeric zero. Bracket scores in this state render as "-".
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Number(n) => *n == 0.0,
            Cell::Text(s) => s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Coerce a cell to a finite number. Absent, non-numeric and non-finite values are 0.
pub fn to_number(cell: &Cell) -> f64 {
    let n = match cell {
        Cell::Null => 0.0,
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_leading_number(s),
    };
    if n.is_finite() { n } else { 0.0 }
}

/// `to_number` rendered with exactly two fractional digits.
pub fn format_score(cell: &Cell) -> String {
    format!("{:.2}", to_number(cell))
}

/// Parse the longest decimal prefix of `s` ("12.5 pts" -> 12.5). No prefix -> 0.
fn parse_leading_number(s: &str) -> f64 {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// Opaque join key between franchises and every other table.
///
/// Text and numeric identifiers never compare equal to each other: `Text("1")`
/// and `Number(1.0)` are different teams.
#[derive(Debug, Clone)]
pub enum TeamId {
    Text(String),
    Number(f64),
}

impl TeamId {
    /// `None` for a null cell (blank trailing rows, unfilled slots).
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Null => None,
            Cell::Number(n) => Some(TeamId::Number(*n)),
            Cell::Text(s) => Some(TeamId::Text(s.clone())),
        }
    }
}

impl PartialEq for TeamId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TeamId::Text(a), TeamId::Text(b)) => a == b,
            (TeamId::Number(a), TeamId::Number(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for TeamId {}

impl Hash for TeamId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TeamId::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            TeamId::Number(n) => {
                1u8.hash(state);
                n.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::Text(s) => f.write_str(s),
            TeamId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        TeamId::Text(s.to_owned())
    }
}
