/// In-memory ordered team table with dirty tracking.
pub mod editor;
/// Per-tab editing lifecycle state machine.
pub mod state_machine;

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    dao::{models::League, models::SessionEntity, remote::RemoteService, session::SessionStore},
    services::countdown::CountdownHandle,
};

pub use self::editor::PredictionEditor;
pub use self::state_machine::{InvalidTransition, TabEvent, TabPhase, TabStateMachine};

/// Cheaply clonable handle on the central application state.
pub type SharedState = Arc<AppState>;

/// Editing state for one league tab: its phase machine plus the displayed
/// team order.
#[derive(Debug, Default)]
pub struct LeagueTab {
    /// Lifecycle phase of the tab.
    pub machine: TabStateMachine,
    /// Ordered team table backing the tab.
    pub editor: PredictionEditor,
}

/// Central application state threaded through every route and service.
pub struct AppState {
    config: AppConfig,
    remote: Arc<dyn RemoteService>,
    session_store: SessionStore,
    session: RwLock<Option<SessionEntity>>,
    tabs: DashMap<League, LeagueTab>,
    countdown: CountdownHandle,
}

impl AppState {
    /// Construct the shared state, spawning the countdown ticker.
    ///
    /// The remote client is passed in rather than constructed here so tests
    /// can install a fake transport.
    pub fn new(config: AppConfig, remote: Arc<dyn RemoteService>) -> SharedState {
        let session_store = SessionStore::new(config.session_file.clone());
        let countdown = CountdownHandle::spawn(config.deadline);
        Arc::new(Self {
            config,
            remote,
            session_store,
            session: RwLock::new(None),
            tabs: DashMap::new(),
            countdown,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle on the remote data service.
    pub fn remote(&self) -> Arc<dyn RemoteService> {
        self.remote.clone()
    }

    /// File-backed store for the session token pair.
    pub fn session_store(&self) -> &SessionStore {
        &self.session_store
    }

    /// Clone of the in-memory session, if one is installed.
    pub async fn current_session(&self) -> Option<SessionEntity> {
        self.session.read().await.clone()
    }

    /// Install a session in memory. Persisting it is the caller's job.
    pub async fn install_session(&self, session: SessionEntity) {
        let mut slot = self.session.write().await;
        *slot = Some(session);
    }

    /// Drop the in-memory session.
    pub async fn clear_session(&self) {
        let mut slot = self.session.write().await;
        slot.take();
    }

    /// Exclusive access to a league tab, created on first use.
    ///
    /// The map entry serializes reorder and save mutation for that league.
    pub fn tab_mut(&self, league: League) -> RefMut<'_, League, LeagueTab> {
        self.tabs.entry(league).or_default()
    }

    /// Handle on the deadline countdown ticker.
    pub fn countdown(&self) -> &CountdownHandle {
        &self.countdown
    }
}
