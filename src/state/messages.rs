use crate::state::network::LoadingState;
use ccup_api::Snapshot;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    /// Fetch all sheets and replace the current snapshot.
    RefreshSnapshot,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SnapshotLoaded { snapshot: Box<Snapshot> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
