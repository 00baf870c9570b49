//! Sync policy: debounced autosave with local-cache fallback
//!
//! Qualifying edits restart a single quiescence timer; expiry performs a
//! create (Unsaved) or update (Bound). At most one timer and one in-flight
//! write exist per session. Background save failures fall back to the local
//! cache and raise a degraded-mode event; they never propagate.

use spoke_common::api::types::{CreateAssessmentRequest, UpdateAssessmentRequest};
use spoke_common::events::SessionEvent;
use spoke_common::schema;
use spoke_common::time;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CachedDraft, LocalCache};
use crate::session::{Binding, Draft};
use crate::store::{RemoteStore, StoreError};

/// Quiescence delay before an autosave fires
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(5);

/// One user's editing session over a single in-progress record
pub struct EditSession {
    inner: Arc<Inner>,
}

struct Inner {
    draft: Mutex<Draft>,
    store: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
    /// Single-flight guard: a second write is never issued while one is
    /// outstanding
    save_flight: Mutex<()>,
    /// The one outstanding debounce timer, replaced (not stacked) on each
    /// qualifying edit
    debounce: StdMutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<SessionEvent>,
    delay: Duration,
}

impl EditSession {
    pub fn new(store: Arc<dyn RemoteStore>, cache: Arc<dyn LocalCache>) -> Self {
        Self::with_delay(store, cache, DEFAULT_AUTOSAVE_DELAY)
    }

    /// Session with a custom quiescence delay (tests use short delays)
    pub fn with_delay(
        store: Arc<dyn RemoteStore>,
        cache: Arc<dyn LocalCache>,
        delay: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Inner {
                draft: Mutex::new(Draft::new()),
                store,
                cache,
                save_flight: Mutex::new(()),
                debounce: StdMutex::new(None),
                events,
                delay,
            }),
        }
    }

    /// Subscribe to save/degraded/reset events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Current draft state (cloned)
    pub async fn snapshot(&self) -> Draft {
        self.inner.draft.lock().await.clone()
    }

    /// Record a rating edit; restarts the quiescence timer
    ///
    /// The value is clamped into [0, 5] (fractional values pass through).
    /// Unknown metrics are ignored; the mapping has a fixed shape.
    pub async fn set_rating(&self, metric: &str, value: f64) {
        if !schema::is_known_metric(metric) {
            debug!("Ignoring edit to unknown metric: {}", metric);
            return;
        }
        let epoch = {
            let mut draft = self.inner.draft.lock().await;
            if draft.read_only {
                return;
            }
            draft.set_rating(metric, value);
            draft.epoch
        };
        self.schedule_save(epoch);
    }

    /// Record a subject-name edit; restarts the quiescence timer
    pub async fn set_subject(&self, name: &str) {
        let epoch = {
            let mut draft = self.inner.draft.lock().await;
            if draft.read_only {
                return;
            }
            draft.set_subject(name);
            draft.epoch
        };
        self.schedule_save(epoch);
    }

    /// Save immediately, bypassing the quiescence timer
    ///
    /// Same create-or-update decision and same fallback semantics as a timed
    /// autosave.
    pub async fn save_now(&self) {
        self.cancel_timer();
        let epoch = {
            let draft = self.inner.draft.lock().await;
            if draft.read_only {
                return;
            }
            draft.epoch
        };
        Inner::perform_save(&self.inner, epoch).await;
    }

    /// Start over: identity cleared, all ratings reset
    pub async fn start_new(&self) {
        self.cancel_timer();
        self.inner.draft.lock().await.reset();
        let _ = self.inner.events.send(SessionEvent::DraftReset { timestamp: time::now() });
    }

    /// Seed the draft from a remote record, entering Bound state
    ///
    /// User-initiated: errors are surfaced, not degraded. With `read_only`
    /// set, all further edits and writes are suppressed.
    pub async fn load(&self, id: &str, read_only: bool) -> Result<(), StoreError> {
        self.cancel_timer();
        let assessment = self.inner.store.get(id).await?;

        let mut draft = self.inner.draft.lock().await;
        draft.reset();
        draft.subject_name = assessment.subject_name;
        draft.ratings = assessment
            .ratings
            .iter()
            .map(|(k, v)| (k.clone(), *v as f64))
            .collect();
        draft.binding = Binding::Bound(assessment.guid);
        draft.read_only = read_only;
        Ok(())
    }

    /// Seed the draft from the local cache, staying Unsaved
    ///
    /// Returns false when no usable cached draft exists.
    pub async fn load_cached(&self) -> bool {
        let Some(cached) = self.inner.cache.load() else {
            return false;
        };
        self.cancel_timer();

        let mut draft = self.inner.draft.lock().await;
        draft.reset();
        draft.subject_name = cached.subject_name;
        draft.ratings = cached.ratings;
        true
    }

    /// Delete the bound remote record, then reset to a fresh draft
    ///
    /// User-initiated: errors are surfaced. A no-op when Unsaved.
    pub async fn delete_bound(&self) -> Result<(), StoreError> {
        self.cancel_timer();
        let bound_id = {
            let draft = self.inner.draft.lock().await;
            match &draft.binding {
                Binding::Bound(id) => id.clone(),
                Binding::Unsaved => return Ok(()),
            }
        };

        self.inner.store.delete(&bound_id).await?;
        self.inner.cache.clear();
        self.inner.draft.lock().await.reset();
        let _ = self.inner.events.send(SessionEvent::DraftReset { timestamp: time::now() });
        Ok(())
    }

    /// Restart the quiescence timer (cancel-and-restart, never stacked)
    fn schedule_save(&self, epoch: u64) {
        let mut guard = self.inner.debounce.lock().unwrap();
        if let Some(handle) = guard.take() {
            handle.abort();
        }
        let inner = Arc::clone(&self.inner);
        let delay = self.inner.delay;
        *guard = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach the write: once the timer expires, cancellation only
            // applies to still-sleeping timers, never to an issued request.
            // An aborted in-flight create could leave an orphan remote record.
            tokio::spawn(async move {
                Inner::perform_save(&inner, epoch).await;
            });
        }));
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.inner.debounce.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Inner {
    /// Perform one create-or-update write for the draft at `for_epoch`
    ///
    /// If the session has moved to a different record since (new draft,
    /// loaded record), the save is dropped - including a response that
    /// arrives after the user navigated away.
    async fn perform_save(inner: &Arc<Inner>, for_epoch: u64) {
        let _flight = inner.save_flight.lock().await;

        let (subject, ratings, binding, revision) = {
            let draft = inner.draft.lock().await;
            if draft.epoch != for_epoch || draft.read_only {
                return;
            }
            (
                draft.effective_subject(),
                draft.full_ratings(),
                draft.binding.clone(),
                draft.revision,
            )
        };

        let result = match &binding {
            Binding::Unsaved => {
                let request = CreateAssessmentRequest {
                    subject_name: subject.clone(),
                    assessment_date: None,
                    ratings: ratings.clone(),
                };
                inner.store.create(&request).await
            }
            Binding::Bound(id) => {
                let request = UpdateAssessmentRequest {
                    subject_name: Some(subject.clone()),
                    assessment_date: None,
                    ratings: Some(ratings.clone()),
                };
                inner.store.update(id, &request).await
            }
        };

        let cached = CachedDraft {
            subject_name: subject,
            ratings,
            saved_at: time::now(),
        };

        match result {
            Ok(saved) => {
                {
                    let mut draft = inner.draft.lock().await;
                    if draft.epoch != for_epoch {
                        // Stale response: the user moved on mid-flight
                        return;
                    }
                    draft.binding = Binding::Bound(saved.guid.clone());
                    if draft.revision == revision {
                        draft.dirty = false;
                    }
                }

                // Redundant backup; a cache failure never fails the save
                if let Err(e) = inner.cache.store(&cached) {
                    warn!("Draft cache backup failed: {}", e);
                }

                let created = matches!(binding, Binding::Unsaved);
                let _ = inner.events.send(SessionEvent::Saved {
                    assessment_id: saved.guid,
                    created,
                    timestamp: time::now(),
                });
            }
            Err(e) => {
                {
                    let draft = inner.draft.lock().await;
                    if draft.epoch != for_epoch {
                        return;
                    }
                }

                warn!("Autosave failed, falling back to local cache: {}", e);
                if let Err(cache_err) = inner.cache.store(&cached) {
                    warn!("Local cache fallback also failed: {}", cache_err);
                }

                let _ = inner.events.send(SessionEvent::DegradedMode {
                    reason: e.to_string(),
                    timestamp: time::now(),
                });
            }
        }
    }
}
