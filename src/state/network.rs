use crate::state::messages::{NetworkRequest, NetworkResponse};
use ccup_api::client::{ApiError, SheetsApi};
use log::{debug, error, info};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs one request at a time. Requests that pile up behind an in-flight
/// fetch are collapsed so a slow sheet never causes a burst of refetches.
pub struct NetworkWorker {
    client: SheetsApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    backlog: VecDeque<NetworkRequest>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self::with_client(SheetsApi::from_env(), requests, responses)
    }

    pub fn with_client(
        client: SheetsApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            backlog: VecDeque::new(),
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        loop {
            let request = match self.backlog.pop_front() {
                Some(request) => request,
                None => match self.requests.recv().await {
                    Some(request) => request,
                    None => break,
                },
            };

            let dropped = self.coalesce(&request);
            if dropped > 0 {
                debug!("coalesced {dropped} queued {request:?} request(s)");
            }

            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::RefreshSnapshot => self.handle_refresh_snapshot().await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    /// Drop queued copies of `request`, keeping any other requests in order.
    fn coalesce(&mut self, request: &NetworkRequest) -> usize {
        let mut dropped = 0;
        while let Ok(next) = self.requests.try_recv() {
            if &next == request {
                dropped += 1;
            } else {
                self.backlog.push_back(next);
            }
        }
        dropped
    }

    async fn handle_refresh_snapshot(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing tournament snapshot");
        let snapshot = self.client.fetch_snapshot().await?;
        info!(
            "snapshot loaded: {} franchises, {} group matchups, {} bracket matchups",
            snapshot.franchises.len(),
            snapshot.group_matchups.len(),
            snapshot.bracket_matchups.len()
        );
        Ok(NetworkResponse::SnapshotLoaded { snapshot: Box::new(snapshot) })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_source() -> SheetsApi {
        SheetsApi::from_dir(std::env::temp_dir().join("ccup-no-such-snapshot-dir"))
    }

    #[tokio::test]
    async fn queued_refreshes_are_coalesced() {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(256);
        for _ in 0..3 {
            req_tx.send(NetworkRequest::RefreshSnapshot).await.unwrap();
        }
        drop(req_tx);

        NetworkWorker::with_client(empty_source(), req_rx, resp_tx).run().await;

        let mut loaded = 0;
        let mut last_loading = None;
        while let Some(response) = resp_rx.recv().await {
            match response {
                NetworkResponse::SnapshotLoaded { snapshot } => {
                    loaded += 1;
                    assert!(snapshot.franchises.is_empty());
                    assert_eq!(snapshot.current_week(), 10);
                }
                NetworkResponse::LoadingStateChanged { loading_state } => {
                    if !loading_state.is_loading {
                        last_loading = Some(loading_state);
                    }
                }
                NetworkResponse::Error { message } => panic!("unexpected error: {message}"),
            }
        }
        assert_eq!(loaded, 1);
        assert_eq!(last_loading, Some(LoadingState::default()));
    }

    #[tokio::test]
    async fn failed_fetch_reports_error_and_error_spinner() {
        let dir = std::env::temp_dir().join(format!("ccup-bad-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("franchises.json"), "<html>not gviz</html>").unwrap();

        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(256);
        req_tx.send(NetworkRequest::RefreshSnapshot).await.unwrap();
        drop(req_tx);

        NetworkWorker::with_client(SheetsApi::from_dir(&dir), req_rx, resp_tx).run().await;

        let mut error = None;
        let mut spinner = None;
        while let Some(response) = resp_rx.recv().await {
            match response {
                NetworkResponse::Error { message } => error = Some(message),
                NetworkResponse::LoadingStateChanged { loading_state } if !loading_state.is_loading => {
                    spinner = Some(loading_state.spinner_char)
                }
                _ => {}
            }
        }
        let _ = std::fs::remove_dir_all(&dir);

        assert!(error.is_some_and(|m| m.contains("franchises.json")));
        assert_eq!(spinner, Some(ERROR_CHAR));
    }
}
