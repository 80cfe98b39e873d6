//! In-memory swipe sessions.
//!
//! A session is one mounted swipe screen. It lives until it is closed or sits
//! idle past the session TTL. Either way its cancellation signal fires, so an
//! in-flight candidate load is abandoned and its result dropped.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{watch, Mutex, RwLock},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::SwipeSessionView,
    services::{
        images::ImageLocator,
        providers::ArtProvider,
        swipe::{self, Decision, Effect, Navigation, SwipeEvent, SwipeState},
    },
};

/// Fires once when the owning session is torn down
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled, or once the session has been dropped
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }
}

pub struct SwipeSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    state: Mutex<SwipeState>,
    cancel_tx: watch::Sender<bool>,
    cancel: CancelToken,
    opened_at: Instant,
    /// Milliseconds after `opened_at` of the last lookup
    last_active_ms: AtomicU64,
}

impl SwipeSession {
    fn new() -> Self {
        let (cancel_tx, cancel) = CancelToken::new();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: Mutex::new(SwipeState::Loading),
            cancel_tx,
            cancel,
            opened_at: Instant::now(),
            last_active_ms: AtomicU64::new(0),
        }
    }

    fn touch(&self) {
        let elapsed = self.opened_at.elapsed().as_millis() as u64;
        self.last_active_ms.fetch_max(elapsed, Ordering::Relaxed);
    }

    /// Time since the session was last looked up
    pub fn idle_for(&self) -> Duration {
        let last_active = Duration::from_millis(self.last_active_ms.load(Ordering::Relaxed));
        self.opened_at.elapsed().saturating_sub(last_active)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn snapshot(&self) -> SwipeState {
        self.state.lock().await.clone()
    }

    pub async fn view(&self, images: &ImageLocator) -> SwipeSessionView {
        let state = self.state.lock().await;
        self.render(&state, images)
    }

    fn render(&self, state: &SwipeState, images: &ImageLocator) -> SwipeSessionView {
        SwipeSessionView {
            session_id: self.id,
            created_at: self.created_at,
            view: state.view(images),
        }
    }

    fn close(&self) {
        self.cancel_tx.send_replace(true);
    }

    /// Runs `loadCandidates`: one backend fetch, then `Loaded` or `LoadFailed`.
    ///
    /// Returns without touching state if the session is closed mid-fetch.
    pub async fn load_candidates(&self, provider: &dyn ArtProvider) -> AppResult<()> {
        let mut cancel = self.cancel.clone();

        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(session_id = %self.id, "Session closed during candidate load, discarding result");
                return Err(AppError::NotFound(format!("Swipe session {} was closed", self.id)));
            }
            result = provider.random_artworks() => match result {
                Ok(payload) => SwipeEvent::Loaded(payload.into_artworks()),
                Err(e) => {
                    tracing::warn!(session_id = %self.id, error = %e, "Failed to load swipe candidates");
                    SwipeEvent::LoadFailed
                }
            },
        };

        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            return Err(AppError::NotFound(format!("Swipe session {} was closed", self.id)));
        }

        let transition = swipe::reduce(&state, event)?;
        *state = transition.state;

        let candidates = match &*state {
            SwipeState::Ready(deck) => deck.len(),
            _ => 0,
        };
        tracing::info!(
            session_id = %self.id,
            state = state.label(),
            candidates,
            "Swipe candidates loaded"
        );

        Ok(())
    }

    /// Applies one judgment after the settle delay.
    ///
    /// The judgment is checked before the delay and checked again against the
    /// state at commit time. The lock is not held while settling, so readers
    /// stay responsive and a second judgment for the same card that settles
    /// later is rejected as stale.
    pub async fn judge(
        &self,
        artwork_id: String,
        decision: Decision,
        settle_delay: Duration,
    ) -> AppResult<Option<Navigation>> {
        let event = SwipeEvent::Judged {
            artwork_id: artwork_id.clone(),
            decision,
        };
        swipe::reduce(&*self.state.lock().await, event.clone())?;

        let mut cancel = self.cancel.clone();
        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(AppError::NotFound(format!("Swipe session {} was closed", self.id)));
            }
            _ = tokio::time::sleep(settle_delay) => {}
        }

        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            return Err(AppError::NotFound(format!("Swipe session {} was closed", self.id)));
        }

        let transition = swipe::reduce(&state, event)?;
        *state = transition.state;

        tracing::debug!(
            session_id = %self.id,
            artwork_id = %artwork_id,
            decision = ?decision,
            state = state.label(),
            "Judgment recorded"
        );

        match transition.effect {
            Effect::Navigate(navigation) => {
                tracing::info!(
                    session_id = %self.id,
                    liked_count = navigation.liked_ids.len(),
                    "Swipe deck complete"
                );
                Ok(Some(navigation))
            }
            Effect::None => Ok(None),
        }
    }
}

/// Registry of open swipe sessions
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<SwipeSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh session in the `Loading` state
    pub async fn open(&self) -> Arc<SwipeSession> {
        let session = Arc::new(SwipeSession::new());
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    /// Looks a session up and marks it active
    pub async fn get(&self, id: Uuid) -> AppResult<Arc<SwipeSession>> {
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Swipe session {} not found", id)))?;
        session.touch();
        Ok(session)
    }

    /// Removes the session and cancels anything still running on its behalf
    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Swipe session {} not found", id)))?;
        session.close();
        Ok(())
    }

    /// Drops every session idle for at least `max_idle`, cancelling its work.
    /// Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, session| {
            if session.idle_for() < max_idle {
                return true;
            }
            tracing::debug!(session_id = %id, "Evicting idle swipe session");
            session.close();
            false
        });

        before - sessions.len()
    }

    /// Runs [`SessionStore::evict_idle`] every `period` for the life of the process
    pub fn spawn_sweeper(&self, ttl: Duration, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    let remaining = store.len().await;
                    tracing::info!(evicted, remaining, "Evicted idle swipe sessions");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
