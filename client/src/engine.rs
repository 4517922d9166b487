//! The background sync engine.
//!
//! One engine instance lives for the whole app session. It owns the entity
//! store behind a mutex, runs the two-phase sync cycle (upload, then
//! download), reports progress over a `watch` channel, and persists a store
//! snapshot after each completed cycle.

use crate::{
    config::SyncConfig,
    error::{Result, SyncError},
    gateway::RemoteGateway,
    http::HttpGateway,
    persist,
    session::{Identity, Session},
};
use chrono::{DateTime, Utc};
use propsync_core::{Clock, EntityStore, LruPolicy, SystemClock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;

/// Whether a cycle is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Observable sync status, published over [`SyncEngine::subscribe_status`].
#[derive(Debug, Clone)]
pub struct SyncStatus {
    pub state: SyncState,
    /// When the last cycle completed, if any
    pub last_sync: Option<DateTime<Utc>>,
    /// First error from the last cycle, if any
    pub last_error: Option<String>,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            state: SyncState::Idle,
            last_sync: None,
            last_error: None,
        }
    }
}

/// What one completed cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Properties uploaded successfully
    pub pushed: usize,
    /// Properties whose upload failed and stays pending
    pub push_failures: usize,
    /// Properties received from the server
    pub pulled: usize,
    /// Pulled properties written into the store
    pub applied: usize,
    /// Pulled properties discarded in favor of a newer local edit
    pub kept_local: usize,
    /// Messages for every failure the cycle absorbed
    pub errors: Vec<String>,
}

/// Result of a sync trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cycle ran to completion (possibly with absorbed failures).
    Completed(SyncReport),
    /// Another cycle was already in flight; this trigger was dropped.
    AlreadyRunning,
}

/// Periodic two-phase synchronizer between the local store and the backend.
pub struct SyncEngine {
    store: Arc<Mutex<EntityStore>>,
    gateway: Arc<dyn RemoteGateway>,
    session: Session,
    config: SyncConfig,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
    status_tx: watch::Sender<SyncStatus>,
}

impl SyncEngine {
    /// Build an engine from explicit collaborators. Tests use this with a
    /// mock gateway and a manual clock.
    pub fn new(
        store: EntityStore,
        gateway: Arc<dyn RemoteGateway>,
        session: Session,
        config: SyncConfig,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let (status_tx, _) = watch::channel(SyncStatus::default());
        Arc::new(Self {
            store: Arc::new(Mutex::new(store)),
            gateway,
            session,
            config,
            clock,
            in_flight: AtomicBool::new(false),
            status_tx,
        })
    }

    /// Production composition root: system clock, HTTP gateway.
    pub fn from_config(config: SyncConfig, session: Session) -> Arc<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = EntityStore::new(LruPolicy::new(config.cache_capacity), clock.clone());
        let mut gateway = HttpGateway::new(config.server_url.clone());
        if let Some(device_id) = &config.device_id {
            gateway = gateway.with_device_id(device_id.clone());
        }
        Self::new(store, Arc::new(gateway), session, config, clock)
    }

    /// The local entity store. The UI reads and writes through this handle;
    /// the engine picks up dirty entries on the next cycle.
    pub fn store(&self) -> Arc<Mutex<EntityStore>> {
        self.store.clone()
    }

    /// The session this engine follows.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current sync status.
    pub fn status(&self) -> SyncStatus {
        self.status_tx.borrow().clone()
    }

    /// Follow sync status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    /// Restore the store from the configured snapshot path, if a snapshot
    /// exists. Restored state goes through the capacity check.
    pub async fn load_persisted(&self) -> Result<bool> {
        let Some(path) = &self.config.snapshot_path else {
            return Ok(false);
        };
        let Some(snapshot) = persist::load_snapshot(path).await? else {
            return Ok(false);
        };
        let mut store = self.store.lock().await;
        store.import_state(snapshot)?;
        tracing::info!(properties = store.len(), "restored store from snapshot");
        Ok(true)
    }

    /// Run one sync cycle now.
    ///
    /// Returns [`SyncOutcome::AlreadyRunning`] without doing anything if a
    /// cycle is in flight, and [`SyncError::NotAuthenticated`] if no
    /// identity is active.
    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        let identity = self
            .session
            .current()
            .ok_or(SyncError::NotAuthenticated)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync trigger dropped: cycle already in flight");
            return Ok(SyncOutcome::AlreadyRunning);
        }

        self.status_tx.send_modify(|s| s.state = SyncState::Syncing);
        let report = self.run_cycle(&identity).await;
        let persist_result = self.persist_snapshot().await;

        let completed_at = self.clock.now();
        self.status_tx.send_modify(|s| {
            s.state = SyncState::Idle;
            s.last_sync = Some(completed_at);
            // A persist failure outranks absorbed cycle errors: the caller
            // sees it as Err, so the status surface must agree.
            s.last_error = match &persist_result {
                Err(e) => Some(e.to_string()),
                Ok(()) => report.errors.first().cloned(),
            };
        });
        self.in_flight.store(false, Ordering::Release);

        persist_result?;
        tracing::info!(
            pushed = report.pushed,
            pulled = report.pulled,
            failures = report.push_failures,
            "sync cycle complete"
        );
        Ok(SyncOutcome::Completed(report))
    }

    async fn run_cycle(&self, identity: &Identity) -> SyncReport {
        let mut report = SyncReport::default();
        self.upload_phase(identity, &mut report).await;
        // Download runs regardless of how the upload phase went.
        self.download_phase(identity, &mut report).await;
        report
    }

    /// Push every dirty property, each independently of the others.
    async fn upload_phase(&self, identity: &Identity, report: &mut SyncReport) {
        let pending = {
            let store = self.store.lock().await;
            store.list_needing_upload()
        };

        for property in pending {
            let id = property.id;
            match self.gateway.push(identity, &property).await {
                Ok(()) => {
                    let mut store = self.store.lock().await;
                    match store.mark_synced(id) {
                        Ok(()) => report.pushed += 1,
                        // Evicted between listing and upload; the server
                        // copy is current either way.
                        Err(e) => tracing::warn!(%id, error = %e, "uploaded property vanished"),
                    }
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "upload failed, will retry next cycle");
                    report.push_failures += 1;
                    report.errors.push(format!("push {id}: {e}"));
                }
            }
        }
    }

    /// Pull the full remote set and merge it through the store.
    async fn download_phase(&self, identity: &Identity, report: &mut SyncReport) {
        let remote = match self.gateway.pull_all(identity).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, "download failed, will retry next cycle");
                report.errors.push(format!("pull: {e}"));
                return;
            }
        };
        report.pulled = remote.len();

        let mut store = self.store.lock().await;
        for property in remote {
            // Last writer wins: an unsynced local edit that is strictly
            // newer than the server copy survives the pull.
            let keep_local = store
                .meta(property.id)
                .filter(|meta| meta.needs_upload)
                .zip(store.peek(property.id))
                .map(|(_, local)| local.updated_at > property.updated_at)
                .unwrap_or(false);

            if keep_local {
                report.kept_local += 1;
            } else {
                store.apply_remote(property);
                report.applied += 1;
            }
        }
    }

    async fn persist_snapshot(&self) -> Result<()> {
        let Some(path) = &self.config.snapshot_path else {
            return Ok(());
        };
        let snapshot = {
            let store = self.store.lock().await;
            store.export_state()
        };
        persist::save_snapshot(path, &snapshot).await?;
        Ok(())
    }

    /// Start the background scheduler.
    ///
    /// While signed in, a cycle runs immediately and then on every interval
    /// tick; sign-out disarms the timer without interrupting an in-flight
    /// cycle. The task ends when the session handle is dropped everywhere.
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move { engine.run_scheduler().await })
    }

    async fn run_scheduler(self: Arc<Self>) {
        let mut identity_rx = self.session.subscribe();

        loop {
            // Wait until signed in.
            if identity_rx.borrow_and_update().is_none() {
                if identity_rx.changed().await.is_err() {
                    return;
                }
                continue;
            }

            // Sign-in fires one immediate cycle, then the timer takes over.
            if let Err(e) = self.sync_now().await {
                tracing::warn!(error = %e, "sync cycle failed");
            }

            let mut ticker = tokio::time::interval(self.config.sync_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // first tick is immediate; already synced

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.sync_now().await {
                            tracing::warn!(error = %e, "sync cycle failed");
                        }
                    }
                    changed = identity_rx.changed() => {
                        match changed {
                            Ok(()) => {
                                if identity_rx.borrow_and_update().is_none() {
                                    tracing::info!("signed out, background sync disarmed");
                                    break;
                                }
                                // Identity refreshed (e.g. new token); keep
                                // the current timer.
                            }
                            Err(_) => return,
                        }
                    }
                }
            }
        }
    }
}
