/// Wire types for the Google Visualization (gviz) query endpoint.
/// Endpoint: https://docs.google.com/spreadsheets/d/{id}/gviz/tq?tqx=out:json&sheet={name}
///
/// The body is wrapped in a JS callback, e.g.
/// `/*O_o*/\ngoogle.visualization.Query.setResponse({...});`
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Default, Debug)]
pub struct GvizResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<GvizError>,
    /// Absent when `status` is "error".
    pub table: Option<GvizTable>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizTable {
    #[serde(default)]
    pub cols: Vec<GvizColumn>,
    #[serde(default)]
    pub rows: Vec<GvizRow>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizColumn {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub col_type: String,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizRow {
    /// Cells in column order. `null` entries are empty cells.
    #[serde(default)]
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizCell {
    /// Raw value: string, number, boolean, or null.
    pub v: Option<Value>,
    /// Formatted value as shown in the sheet ("1", "$25.00").
    pub f: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "snake_case")]
pub struct GvizError {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detailed_message: String,
}
