use crate::gviz::GvizResponse;
use crate::record::{Record, normalize_row};
use crate::{Sheet, Snapshot};
use chrono::Utc;
use futures_util::future::try_join_all;
use log::{debug, warn};
use reqwest::{Client, Url};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const GOOGLE_DOCS: &str = "https://docs.google.com";
/// Commissioner's Cup 2024 spreadsheet.
pub const DEFAULT_SHEET_ID: &str = "1ucF98nx4O5Pq50JtOwM-HC4npoFtJS9YMR4Oclbb0dw";

#[derive(Debug, Clone)]
enum Source {
    Remote { base_url: String, sheet_id: String },
    /// Directory of `<sheet name>.json` gviz bodies.
    Local(PathBuf),
}

/// Tournament data client backed by the Google Sheets gviz endpoint.
#[derive(Debug, Clone)]
pub struct SheetsApi {
    client: Client,
    timeout: Duration,
    source: Source,
}

impl Default for SheetsApi {
    fn default() -> Self {
        Self::with_base_url(GOOGLE_DOCS, DEFAULT_SHEET_ID)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(serde_json::Error, String),
    /// Body was not wrapped the way gviz wraps its JSON.
    Envelope(String),
    /// gviz answered with `"status": "error"`.
    Query(String),
    Io(std::io::Error, String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, source) => write!(f, "Parse error for {source}: {e}"),
            ApiError::Envelope(source) => write!(f, "Unexpected response body from {source}"),
            ApiError::Query(msg) => write!(f, "Sheet query failed: {msg}"),
            ApiError::Io(e, path) => write!(f, "Could not read {path}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) => Some(e),
            ApiError::Parsing(e, _) => Some(e),
            ApiError::Io(e, _) => Some(e),
            _ => None,
        }
    }
}

impl SheetsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote client against `base_url` (no trailing slash), e.g. a mock server.
    pub fn with_base_url(base_url: &str, sheet_id: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent("ccup/0.1 (terminal tournament viewer)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            source: Source::Remote {
                base_url: base_url.trim_end_matches('/').to_owned(),
                sheet_id: sheet_id.to_owned(),
            },
        }
    }

    /// Client reading gviz bodies from `<dir>/<sheet name>.json` instead of the network.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self { source: Source::Local(dir.into()), ..Self::default() }
    }

    /// Pick the data source from the environment:
    /// 1) `CCUP_SNAPSHOT_DIR`: local directory of gviz bodies.
    /// 2) `CCUP_SHEET_ID`: alternate spreadsheet id.
    /// 3) The default spreadsheet.
    pub fn from_env() -> Self {
        if let Ok(dir) = std::env::var("CCUP_SNAPSHOT_DIR")
            && !dir.trim().is_empty()
        {
            return Self::from_dir(dir);
        }
        match std::env::var("CCUP_SHEET_ID") {
            Ok(id) if !id.trim().is_empty() => Self::with_base_url(GOOGLE_DOCS, id.trim()),
            _ => Self::default(),
        }
    }

    /// Fetch all six sheets concurrently and assemble a snapshot. Any failure
    /// fails the whole fetch so a partial snapshot never replaces a good one.
    pub async fn fetch_snapshot(&self) -> ApiResult<Snapshot> {
        let tables = try_join_all(Sheet::ALL.iter().map(|&sheet| self.fetch_table(sheet))).await?;

        let mut snapshot = Snapshot { fetched_at: Some(Utc::now()), ..Snapshot::default() };
        for (sheet, records) in Sheet::ALL.into_iter().zip(tables) {
            snapshot.set_table(sheet, records);
        }
        Ok(snapshot)
    }

    /// Fetch one sheet as normalized rows. Missing and empty sheets both yield no rows.
    pub async fn fetch_table(&self, sheet: Sheet) -> ApiResult<Vec<Record>> {
        let (body, origin) = match &self.source {
            Source::Remote { base_url, sheet_id } => {
                let url = Url::parse_with_params(
                    &format!("{base_url}/spreadsheets/d/{sheet_id}/gviz/tq"),
                    &[("tqx", "out:json"), ("sheet", sheet.name())],
                )
                .map_err(|e| ApiError::Other(format!("bad sheet url: {e}")))?;
                match self.get_text(url.as_str()).await? {
                    Some(body) => (body, url.to_string()),
                    None => return Ok(Vec::new()),
                }
            }
            Source::Local(dir) => {
                let path = dir.join(format!("{}.json", sheet.name()));
                match std::fs::read_to_string(&path) {
                    Ok(body) => (body, path.display().to_string()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!("no local table at {}", path.display());
                        return Ok(Vec::new());
                    }
                    Err(e) => return Err(ApiError::Io(e, path.display().to_string())),
                }
            }
        };

        let records = parse_gviz(&body, &origin)?;
        debug!("loaded {} rows from sheet '{}'", records.len(), sheet.name());
        Ok(records)
    }

    /// GET a body as text. `None` for 4xx responses (treated as an absent table).
    async fn get_text(&self, url: &str) -> ApiResult<Option<String>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .text()
                .await
                .map(Some)
                .map_err(|e| ApiError::Network(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    warn!("treating {url} as an empty table: {e}");
                    Ok(None)
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Strip the gviz JS wrapper and return the JSON payload. Bare JSON passes through.
pub fn unwrap_envelope(body: &str) -> Option<&str> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    let start = trimmed.find('(')?;
    let end = trimmed.rfind(')')?;
    (start < end).then(|| trimmed[start + 1..end].trim())
}

/// Parse a gviz body into normalized rows.
pub fn parse_gviz(body: &str, origin: &str) -> ApiResult<Vec<Record>> {
    let json = unwrap_envelope(body).ok_or_else(|| ApiError::Envelope(origin.to_owned()))?;
    let response: GvizResponse =
        serde_json::from_str(json).map_err(|e| ApiError::Parsing(e, origin.to_owned()))?;

    if response.status == "error" {
        let detail = response
            .errors
            .iter()
            .map(|e| if e.detailed_message.is_empty() { e.message.as_str() } else { e.detailed_message.as_str() })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::Query(format!("{origin}: {detail}")));
    }

    Ok(response
        .table
        .map(|t| t.rows.iter().map(normalize_row).collect())
        .unwrap_or_default())
}
