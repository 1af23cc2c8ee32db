//! The extraction state machine.
//!
//! One engine owns one `Session` at a time. `start` spawns a single
//! background task that drives the host UI through a fixed protocol, one
//! target list after another, then reconciles and syncs. All shared state
//! sits behind coarse locks that are never held across an await.
//!
//! Cancellation is cooperative: `stop` raises a flag that every wait and
//! step boundary checks, and aborts the task at its next suspension point.
//! A gesture already dispatched to the host cannot be taken back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{DomainResult, ExtractionError};
use crate::domain::models::{
    Config, DirectoryIndex, MemberList, ProgressUpdate, RunState, Session, TargetHandle,
    UiSnapshot,
};
use crate::domain::ports::{DirectoryProvider, RunObserver, SyncClient, UiDriver};

use super::extractor;
use super::navigator::Navigator;
use super::reconciler;
use super::resolver::IdentityResolver;
use super::store::ListStore;
use super::sync_dispatcher::SyncDispatcher;

/// Autonomous extraction orchestrator.
pub struct ExtractionEngine {
    driver: Arc<dyn UiDriver>,
    directory: Arc<dyn DirectoryProvider>,
    dispatcher: SyncDispatcher,
    store: Arc<ListStore>,
    session: Mutex<Session>,
    observers: Mutex<Vec<Arc<dyn RunObserver>>>,
    cancel: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    config: Config,
}

impl ExtractionEngine {
    pub fn new(
        driver: Arc<dyn UiDriver>,
        directory: Arc<dyn DirectoryProvider>,
        sync_client: Arc<dyn SyncClient>,
        config: Config,
    ) -> Self {
        let dispatcher = SyncDispatcher::new(
            sync_client,
            config.device.identifier.clone(),
            config.sync.enabled,
        );
        Self {
            driver,
            directory,
            dispatcher,
            store: Arc::new(ListStore::new()),
            session: Mutex::new(Session::new()),
            observers: Mutex::new(Vec::new()),
            cancel: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            config,
        }
    }

    /// Registers an observer. Notifications fan out in registration order
    /// over a copy of this list taken at notification time.
    pub fn subscribe(&self, observer: Arc<dyn RunObserver>) {
        self.observers.lock().unwrap().push(observer);
    }

    /// Clone of the current session state.
    pub fn session(&self) -> Session {
        self.session.lock().unwrap().clone()
    }

    pub fn state(&self) -> RunState {
        self.session.lock().unwrap().state
    }

    pub fn lists(&self) -> Vec<MemberList> {
        self.store.snapshot()
    }

    pub fn store(&self) -> Arc<ListStore> {
        Arc::clone(&self.store)
    }

    // Control surface ------------------------------------------------------

    /// Begins a run. Rejected without side effects while a run is
    /// in flight (state not terminal, or the worker task still alive --
    /// the session stays `Idle` until the worker's first transition).
    pub fn start(self: &Arc<Self>) -> DomainResult<()> {
        let mut worker = self.worker.lock().unwrap();
        if worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(ExtractionError::RunInProgress);
        }
        {
            let mut session = self.session.lock().unwrap();
            if !session.state.is_terminal() {
                return Err(ExtractionError::RunInProgress);
            }
            *session = Session::new();
        }
        self.cancel.store(false, Ordering::SeqCst);

        let engine = Arc::clone(self);
        *worker = Some(tokio::spawn(async move { engine.run_to_completion().await }));
        info!("extraction run started");
        Ok(())
    }

    /// Cancels the in-flight run and forces `Idle`. Data already merged
    /// into the store stays; the scan of the currently open target is
    /// discarded.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().unwrap().take() {
            handle.abort();
        }

        let update = {
            let mut session = self.session.lock().unwrap();
            if session.state.is_terminal() {
                None
            } else {
                Some(session.advance(RunState::Idle, "Stopped"))
            }
        };
        if let Some(update) = update {
            info!("run stopped");
            self.notify_state(&update);
        }
    }

    /// Empties the list store and notifies observers with the empty
    /// snapshot.
    pub fn clear(&self) {
        let snapshot = self.store.clear();
        self.notify_lists(&snapshot);
    }

    /// Awaits the background worker, if one is running.
    pub async fn join(&self) {
        let handle = self.worker.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    // Worker ---------------------------------------------------------------

    async fn run_to_completion(self: Arc<Self>) {
        match self.run().await {
            Ok(()) => {}
            Err(ExtractionError::Cancelled) => debug!("run task unwound after stop"),
            Err(err) => {
                error!(error = %err, "run failed");
                self.fail(&err);
            }
        }
    }

    async fn run(&self) -> DomainResult<()> {
        let host = self.config.host.clone();

        // Host discovery precedes the first transition.
        let app = self
            .driver
            .resolve_host(&host.app_candidates)
            .await?
            .ok_or(ExtractionError::HostAppUnavailable)?;

        let resolver = self.load_resolver().await;
        let nav = Navigator::new(
            Arc::clone(&self.driver),
            self.config.timing.clone(),
            Arc::clone(&self.cancel),
        );

        self.transition(RunState::OpeningHost, format!("Launching {app}"))?;
        if !self.driver.launch_host(&app).await? {
            return Err(ExtractionError::HostAppUnavailable);
        }
        nav.wait_for_ui().await?;

        self.transition(RunState::NavigatingToMenu, "Opening the menu")?;
        self.open_menu(&nav).await?;

        self.transition(
            RunState::NavigatingToTargets,
            format!("Waiting for '{}'", host.screen_marker),
        )?;
        nav.wait_for_text(&host.screen_marker).await?;

        self.transition(RunState::ScanningTargets, "Enumerating lists")?;
        let snap = nav.current().await?;
        let targets = extractor::enumerate_targets(&snap, &host.recipient_marker, &self.config.scan);
        {
            let mut session = self.session.lock().unwrap();
            session.targets = targets.clone();
        }
        info!(count = targets.len(), "targets enumerated");

        let total = targets.len();
        for (index, target) in targets.iter().enumerate() {
            self.checkpoint()?;
            let list_name = target.list_name(index);
            {
                let mut session = self.session.lock().unwrap();
                session.current_target = index;
                session.current_list_name = Some(list_name.clone());
            }

            self.transition(
                RunState::OpeningTarget,
                format!("Opening '{}' ({}/{})", list_name, index + 1, total),
            )?;
            self.open_target(&nav, target, &list_name).await?;

            self.transition(
                RunState::ExtractingMembers,
                format!("Extracting members of '{list_name}'"),
            )?;
            let members = extractor::scan_members(&nav, &resolver, &self.config.scan).await?;

            // Nothing is merged yet; a stop landing here discards the scan.
            self.checkpoint()?;
            debug!(list = %list_name, members = members.len(), "merging scan result");
            let snapshot = self.store.upsert_merge(&list_name, members);
            self.notify_lists(&snapshot);

            self.transition(RunState::Returning, format!("Leaving '{list_name}'"))?;
            nav.back().await?;
            nav.wait_for_text(&host.screen_marker).await?;
        }

        self.transition(RunState::Reconciling, "Computing common members")?;
        let aggregate = reconciler::common_members(&self.store.snapshot());
        let snapshot = self.store.replace_aggregate(aggregate);
        self.notify_lists(&snapshot);

        self.dispatcher.dispatch(self.store.snapshot()).await;

        self.transition(
            RunState::Complete,
            format!("Run complete: {} lists in store", self.store.len()),
        )?;
        Ok(())
    }

    async fn load_resolver(&self) -> IdentityResolver {
        let entries = match self.directory.load_entries().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "directory load failed, resolving without it");
                Vec::new()
            }
        };
        IdentityResolver::new(DirectoryIndex::build(&entries))
    }

    /// Opens the overflow menu and taps the entry leading to the target
    /// screen. The configured coordinate fallback is used at most once,
    /// when the menu button is not in the tree.
    async fn open_menu(&self, nav: &Navigator) -> DomainResult<()> {
        let host = &self.config.host;
        let snap = nav.current().await?;
        if let Some(id) = snap.find_by_description(&host.menu_description) {
            nav.tap(id).await?;
        } else if let Some(point) = host.menu_fallback_tap {
            warn!(description = %host.menu_description, "menu button not found, using fallback tap");
            nav.tap_point(point.x, point.y).await?;
        } else {
            return Err(ExtractionError::TargetNotFound(
                host.menu_description.clone(),
            ));
        }
        nav.tap_text(&host.menu_entry_text).await
    }

    /// Opens one enumerated target and confirms the member screen by the
    /// target-screen marker leaving the tree. Falls back to a coordinate
    /// tap at the recorded bounds center once.
    async fn open_target(
        &self,
        nav: &Navigator,
        target: &TargetHandle,
        list_name: &str,
    ) -> DomainResult<()> {
        let marker = self.config.host.screen_marker.clone();
        let left_screen = |snap: &UiSnapshot| !snap.contains_text(&marker);

        let snap = nav.current().await?;
        let node = target
            .label
            .as_deref()
            .and_then(|label| snap.find_by_text(label))
            .and_then(|id| snap.clickable_ancestor(id))
            .or_else(|| snap.node(target.node).map(|_| target.node));

        if let Some(id) = node {
            nav.tap(id).await?;
            match nav.wait_until(list_name, left_screen).await {
                Ok(_) => return Ok(()),
                Err(ExtractionError::Cancelled) => return Err(ExtractionError::Cancelled),
                Err(err) => debug!(error = %err, "target tap did not progress, trying fallback"),
            }
        }

        let (x, y) = target.bounds.center();
        nav.tap_point(x, y).await?;
        match nav.wait_until(list_name, left_screen).await {
            Ok(_) => Ok(()),
            Err(ExtractionError::Cancelled) => Err(ExtractionError::Cancelled),
            Err(_) => Err(ExtractionError::TargetNotFound(format!(
                "member screen for '{list_name}'"
            ))),
        }
    }

    // State plumbing -------------------------------------------------------

    fn transition(&self, state: RunState, progress: impl Into<String>) -> DomainResult<()> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(ExtractionError::Cancelled);
        }
        let update = { self.session.lock().unwrap().advance(state, progress) };
        info!(state = %update.state, step = update.step, "{}", update.progress);
        self.notify_state(&update);
        Ok(())
    }

    fn checkpoint(&self) -> DomainResult<()> {
        if self.cancel.load(Ordering::SeqCst) {
            Err(ExtractionError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn fail(&self, err: &ExtractionError) {
        if self.cancel.load(Ordering::SeqCst) {
            return;
        }
        let update = {
            self.session
                .lock()
                .unwrap()
                .advance(RunState::Error, err.to_string())
        };
        self.notify_state(&update);
    }

    fn notify_state(&self, update: &ProgressUpdate) {
        let observers = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer.on_state_change(update);
        }
    }

    fn notify_lists(&self, lists: &[MemberList]) {
        let observers = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer.on_lists_changed(lists);
        }
    }
}
