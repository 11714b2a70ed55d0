use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use backend::{LingoBackend, Prefs, PrefsStore};
use lingo_core::Clock;
use lingo_core::model::Hearts;

/// Allowed disagreement between a persisted regeneration deadline and a fresh
/// server-derived one before the persisted value is discarded.
const DEADLINE_TOLERANCE_SECS: i64 = 5;

//
// ─── SNAPSHOT & TICK ───────────────────────────────────────────────────────────
//

/// Point-in-time view of the heart pool for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartsSnapshot {
    pub hearts: Hearts,
    /// Whole seconds until the next heart, `None` when no countdown runs.
    pub seconds_left: Option<i64>,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartsTick {
    /// No countdown is active.
    Idle,
    /// Countdown still running.
    Counting { seconds_left: i64 },
    /// The deadline passed; the authoritative count was re-fetched.
    Reconciled,
}

#[derive(Debug, Clone, Copy)]
struct HeartsState {
    hearts: Hearts,
    regen_deadline: Option<DateTime<Utc>>,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// The process-wide heart pool: optimistic local counter plus the single
/// regeneration countdown.
///
/// Local state is authoritative until a fetch overrides it; `initialize` and
/// `reconcile` are the only override entry points. No method here returns an
/// error to its caller: network and persistence failures are logged and the
/// optimistic state stands until the next reconciliation.
pub struct HeartsService {
    backend: Arc<dyn LingoBackend>,
    prefs: Arc<dyn PrefsStore>,
    clock: Clock,
    state: Mutex<HeartsState>,
}

impl HeartsService {
    #[must_use]
    pub fn new(backend: Arc<dyn LingoBackend>, prefs: Arc<dyn PrefsStore>, clock: Clock) -> Self {
        Self {
            backend,
            prefs,
            clock,
            state: Mutex::new(HeartsState {
                hearts: Hearts::full(),
                regen_deadline: None,
            }),
        }
    }

    /// Swap the clock. Tests use this to move time between calls.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Apply a server-reported heart state.
    ///
    /// Below-cap counts with a positive countdown (re)start the regeneration
    /// countdown from an absolute deadline. A previously persisted deadline
    /// within `DEADLINE_TOLERANCE_SECS` of the fresh one is kept so the
    /// display does not jump across a reload; a larger disagreement means
    /// clock skew or stale storage, and the fresh value wins and is
    /// persisted. Storing the deadline as a single `Option` is what keeps at
    /// most one countdown alive: setting it supersedes any prior one.
    pub fn initialize(&self, count: u32, seconds_until_regen: i64) {
        let hearts = Hearts::new(count);
        let regen_deadline = if !hearts.is_full() && seconds_until_regen > 0 {
            let fresh = self.clock.now() + Duration::seconds(seconds_until_regen);
            Some(self.adopt_deadline(fresh))
        } else {
            self.clear_persisted_deadline();
            None
        };

        let mut state = self.state();
        state.hearts = hearts;
        state.regen_deadline = regen_deadline;
    }

    /// Current pool and countdown, computed from the absolute deadline so the
    /// value stays correct across tab suspension or timer throttling.
    #[must_use]
    pub fn snapshot(&self) -> HeartsSnapshot {
        let state = *self.state();
        HeartsSnapshot {
            hearts: state.hearts,
            seconds_left: state
                .regen_deadline
                .map(|deadline| seconds_until(deadline, self.clock.now())),
        }
    }

    /// Optimistically spend one heart.
    ///
    /// Returns the new count, or `None` when the pool was already empty; in
    /// that case nothing changed and no request should be issued. The caller
    /// updates its display from the returned value and runs
    /// [`persist_deduction`](Self::persist_deduction) in the background.
    #[must_use]
    pub fn deduct_local(&self) -> Option<Hearts> {
        let mut state = self.state();
        if state.hearts.is_empty() {
            return None;
        }
        state.hearts = state.hearts.spent();
        Some(state.hearts)
    }

    /// Persist a deduction server-side. Fire-and-forget: a failure leaves the
    /// optimistic local count divergent until the next reconciliation.
    pub async fn persist_deduction(&self) {
        match self.backend.lose_heart().await {
            Ok(payload) => {
                log::debug!("server confirmed heart loss, {} left", payload.hearts);
            }
            Err(err) => {
                log::warn!("failed to persist heart deduction: {err}");
            }
        }
    }

    /// Spend one heart and persist it, awaiting the round trip. UI callers
    /// prefer the split `deduct_local` + background `persist_deduction`.
    pub async fn deduct(&self) {
        if self.deduct_local().is_some() {
            self.persist_deduction().await;
        }
    }

    /// Advance the countdown by one observation.
    ///
    /// Remaining time is recomputed from the absolute deadline. At or past
    /// the deadline the countdown and its persisted copy are cleared before
    /// the reconciliation fetch runs, so expiry reconciles exactly once even
    /// if further ticks race in.
    pub async fn tick(&self) -> HeartsTick {
        let deadline = {
            let state = self.state();
            state.regen_deadline
        };
        let Some(deadline) = deadline else {
            return HeartsTick::Idle;
        };

        let seconds_left = seconds_until(deadline, self.clock.now());
        if seconds_left > 0 {
            return HeartsTick::Counting { seconds_left };
        }

        self.state().regen_deadline = None;
        self.clear_persisted_deadline();
        self.reconcile().await;
        HeartsTick::Reconciled
    }

    /// Fetch the authoritative heart state and re-apply `initialize`
    /// semantics. Failures are logged and the local state stands.
    pub async fn reconcile(&self) {
        match self.backend.hearts().await {
            Ok(payload) => self.initialize(payload.hearts, payload.time_left),
            Err(err) => {
                log::warn!("hearts reconciliation failed: {err}");
            }
        }
    }

    fn adopt_deadline(&self, fresh: DateTime<Utc>) -> DateTime<Utc> {
        let persisted = match self.prefs.load() {
            Ok(prefs) => prefs.regen_deadline,
            Err(err) => {
                log::warn!("failed to load persisted regen deadline: {err}");
                None
            }
        };

        if let Some(persisted) = persisted {
            let drift = (persisted - fresh).num_seconds().abs();
            if drift <= DEADLINE_TOLERANCE_SECS {
                return persisted;
            }
        }

        self.update_prefs(|prefs| prefs.regen_deadline = Some(fresh));
        fresh
    }

    fn clear_persisted_deadline(&self) {
        self.update_prefs(|prefs| prefs.regen_deadline = None);
    }

    fn update_prefs(&self, apply: impl FnOnce(&mut Prefs)) {
        let mut prefs = match self.prefs.load() {
            Ok(prefs) => prefs,
            Err(err) => {
                log::warn!("failed to load prefs: {err}");
                Prefs::default()
            }
        };
        apply(&mut prefs);
        if let Err(err) = self.prefs.save(&prefs) {
            log::warn!("failed to save prefs: {err}");
        }
    }

    fn state(&self) -> MutexGuard<'_, HeartsState> {
        // A poisoned lock only means a panicking reader; the copyable state
        // inside is still coherent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whole seconds from `now` to `deadline`, rounded up, floored at zero.
fn seconds_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        millis / 1000 + i64::from(millis % 1000 != 0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backend::{
        BackendError, CompletionPayload, DashboardPayload, HeartsPayload, InMemoryBackend,
        InMemoryPrefs, LoseHeartPayload,
    };
    use chrono::Duration;
    use lingo_core::model::{Language, Lesson, LessonId};
    use lingo_core::time::{fixed_clock, fixed_now};

    fn service_with(backend: Arc<dyn LingoBackend>, prefs: InMemoryPrefs) -> HeartsService {
        HeartsService::new(backend, Arc::new(prefs), fixed_clock())
    }

    fn service() -> (HeartsService, InMemoryBackend, InMemoryPrefs) {
        let backend = InMemoryBackend::new([]);
        let prefs = InMemoryPrefs::new();
        let service = service_with(Arc::new(backend.clone()), prefs.clone());
        (service, backend, prefs)
    }

    #[test]
    fn initialize_below_cap_starts_countdown() {
        let (service, _backend, prefs) = service();
        service.initialize(3, 120);

        let snapshot = service.snapshot();
        assert_eq!(snapshot.hearts.count(), 3);
        assert_eq!(snapshot.seconds_left, Some(120));
        assert_eq!(
            prefs.load().unwrap().regen_deadline,
            Some(fixed_now() + Duration::seconds(120))
        );
    }

    #[test]
    fn initialize_full_pool_clears_countdown_and_persisted_deadline() {
        let (service, _backend, prefs) = service();
        service.initialize(3, 120);
        service.initialize(5, 0);

        let snapshot = service.snapshot();
        assert_eq!(snapshot.hearts.count(), 5);
        assert_eq!(snapshot.seconds_left, None);
        assert_eq!(prefs.load().unwrap().regen_deadline, None);
    }

    #[test]
    fn persisted_deadline_within_tolerance_is_kept() {
        let backend = InMemoryBackend::new([]);
        let persisted = fixed_now() + Duration::seconds(118);
        let prefs = InMemoryPrefs::with_prefs(backend::Prefs {
            language: None,
            regen_deadline: Some(persisted),
        });
        let service = service_with(Arc::new(backend), prefs.clone());

        service.initialize(3, 120);
        assert_eq!(service.snapshot().seconds_left, Some(118));
        assert_eq!(prefs.load().unwrap().regen_deadline, Some(persisted));
    }

    #[test]
    fn stale_persisted_deadline_loses_to_fresh_value() {
        let backend = InMemoryBackend::new([]);
        let stale = fixed_now() + Duration::seconds(500);
        let prefs = InMemoryPrefs::with_prefs(backend::Prefs {
            language: None,
            regen_deadline: Some(stale),
        });
        let service = service_with(Arc::new(backend), prefs.clone());

        service.initialize(3, 120);
        assert_eq!(service.snapshot().seconds_left, Some(120));
        assert_eq!(
            prefs.load().unwrap().regen_deadline,
            Some(fixed_now() + Duration::seconds(120))
        );
    }

    #[tokio::test]
    async fn deduct_at_zero_is_a_request_free_no_op() {
        let (service, backend, _prefs) = service();
        service.initialize(0, 0);

        assert_eq!(service.deduct_local(), None);
        service.deduct().await;

        assert_eq!(service.snapshot().hearts.count(), 0);
        assert_eq!(backend.lose_heart_calls().unwrap(), 0);
    }

    #[tokio::test]
    async fn deduct_decrements_locally_and_persists() {
        let (service, backend, _prefs) = service();
        service.initialize(5, 0);

        let local = service.deduct_local().unwrap();
        assert_eq!(local.count(), 4);

        service.persist_deduction().await;
        assert_eq!(backend.lose_heart_calls().unwrap(), 1);
        assert_eq!(backend.hearts().await.unwrap().hearts, 4);
    }

    struct FailingBackend;

    #[async_trait]
    impl LingoBackend for FailingBackend {
        async fn dashboard(&self, _lang: Language) -> Result<DashboardPayload, BackendError> {
            Err(BackendError::State("down".into()))
        }

        async fn hearts(&self) -> Result<HeartsPayload, BackendError> {
            Err(BackendError::State("down".into()))
        }

        async fn lose_heart(&self) -> Result<LoseHeartPayload, BackendError> {
            Err(BackendError::State("down".into()))
        }

        async fn lesson(
            &self,
            id: LessonId,
            _lang: Language,
        ) -> Result<Lesson, BackendError> {
            Err(BackendError::LessonNotFound(id))
        }

        async fn complete_lesson(
            &self,
            _id: LessonId,
            _lang: Language,
        ) -> Result<CompletionPayload, BackendError> {
            Err(BackendError::State("down".into()))
        }
    }

    #[tokio::test]
    async fn failed_persistence_keeps_optimistic_local_state() {
        let service = service_with(Arc::new(FailingBackend), InMemoryPrefs::new());
        service.initialize(5, 0);

        service.deduct().await;

        // Local count diverges from the unreachable server until reconciled.
        assert_eq!(service.snapshot().hearts.count(), 4);
    }

    #[tokio::test]
    async fn failed_reconcile_keeps_local_state() {
        let service = service_with(Arc::new(FailingBackend), InMemoryPrefs::new());
        service.initialize(2, 60);

        service.reconcile().await;
        let snapshot = service.snapshot();
        assert_eq!(snapshot.hearts.count(), 2);
        assert_eq!(snapshot.seconds_left, Some(60));
    }

    #[tokio::test]
    async fn tick_counts_down_from_the_absolute_deadline() {
        let (mut service, _backend, _prefs) = service();
        service.initialize(4, 90);

        assert_eq!(
            service.tick().await,
            HeartsTick::Counting { seconds_left: 90 }
        );

        // A suspended tab misses ticks; the next tick still shows deadline
        // truth rather than a decremented counter.
        service.set_clock(Clock::fixed(fixed_now() + Duration::seconds(47)));
        assert_eq!(
            service.tick().await,
            HeartsTick::Counting { seconds_left: 43 }
        );
    }

    #[tokio::test]
    async fn sub_second_remainders_round_up() {
        let (mut service, _backend, _prefs) = service();
        service.initialize(4, 10);

        service.set_clock(Clock::fixed(fixed_now() + Duration::milliseconds(9_500)));
        assert_eq!(
            service.tick().await,
            HeartsTick::Counting { seconds_left: 1 }
        );
    }

    #[tokio::test]
    async fn expiry_reconciles_exactly_once() {
        let (mut service, backend, prefs) = service();
        backend.set_hearts(4, 0).unwrap();
        service.initialize(3, 30);

        service.set_clock(Clock::fixed(fixed_now() + Duration::seconds(31)));
        assert_eq!(service.tick().await, HeartsTick::Reconciled);

        // Reconciliation adopted the server's refreshed count and the
        // persisted deadline is gone; further ticks are idle.
        assert_eq!(service.snapshot().hearts.count(), 4);
        assert_eq!(prefs.load().unwrap().regen_deadline, None);
        assert_eq!(service.tick().await, HeartsTick::Idle);
    }
}
