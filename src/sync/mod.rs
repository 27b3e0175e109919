//! Two-way synchronization between facet state and the host URL
//!
//! Naive two-way binding loops: a state change rewrites the URL, the URL
//! change re-hydrates state, which rewrites the URL again. `UrlSync` breaks
//! the loop with an explicit Idle/Pushing machine and an echo check against
//! the last string it pushed. The host drives it the same way the rest of
//! the engine is driven: harvest the pending navigation, perform it, report
//! back when it settles.

mod query;

pub use query::{parse_query, serialize_query};

use std::time::{Duration, Instant};

use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncPhase {
    Idle,
    Pushing,
}

/// A search write waiting out its quiet period before touching the URL.
#[derive(Debug, Clone, Copy)]
struct PendingSearchWrite {
    due: Instant,
}

#[derive(Debug)]
pub struct UrlSync {
    phase: SyncPhase,
    /// Exactly what we last handed to the host; external changes matching
    /// it are echoes of our own navigation.
    last_pushed: Option<String>,
    pending_push: Option<String>,
    pending_search: Option<PendingSearchWrite>,
    quiet_period: Duration,
}

impl UrlSync {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            phase: SyncPhase::Idle,
            last_pushed: None,
            pending_push: None,
            pending_search: None,
            quiet_period,
        }
    }

    /// Queue a push of the given canonical query. A newer request replaces
    /// a queued one outright, so the string the host eventually takes
    /// always reflects the latest state. Pushing the string that is
    /// already on the wire is skipped.
    pub fn request_push(&mut self, query: String) {
        if self.pending_push.is_none() && self.last_pushed.as_deref() == Some(query.as_str()) {
            trace!(%query, "push skipped, url already current");
            return;
        }
        self.pending_push = Some(query);
    }

    /// Schedule the debounced search write. Each keystroke replaces the
    /// deadline, cancelling the superseded write rather than letting it
    /// fire with stale text.
    pub fn schedule_search_write(&mut self, now: Instant) {
        self.pending_search = Some(PendingSearchWrite {
            due: now + self.quiet_period,
        });
    }

    pub fn cancel_search_write(&mut self) {
        self.pending_search = None;
    }

    /// True once the quiet period has elapsed.
    pub fn search_write_due(&self, now: Instant) -> bool {
        self.pending_search
            .map(|pending| pending.due <= now)
            .unwrap_or(false)
    }

    /// Hand the host the next navigation to perform, if any.
    pub fn take_pending_push(&mut self) -> Option<String> {
        let query = self.pending_push.take()?;
        self.phase = SyncPhase::Pushing;
        self.last_pushed = Some(query.clone());
        debug!(%query, "issuing url push");
        Some(query)
    }

    /// The host's navigation resolved. Stays in `Pushing` when a newer
    /// state queued another push while this one was in flight.
    pub fn push_settled(&mut self) {
        if self.pending_push.is_none() {
            self.phase = SyncPhase::Idle;
        }
    }

    /// Decide whether an externally observed URL change should rehydrate
    /// state. Echoes of our own push are absorbed; genuine changes (initial
    /// load, back/forward) are accepted and become the new baseline.
    pub fn observe_external(&mut self, query: &str) -> bool {
        if self.last_pushed.as_deref() == Some(query) {
            debug!(%query, "ignoring echo of own push");
            self.phase = SyncPhase::Idle;
            return false;
        }
        self.phase = SyncPhase::Idle;
        self.last_pushed = Some(query.to_string());
        true
    }

    pub fn is_pushing(&self) -> bool {
        self.phase == SyncPhase::Pushing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync() -> UrlSync {
        UrlSync::new(Duration::from_millis(300))
    }

    #[test]
    fn push_lifecycle_settles_back_to_idle() {
        let mut sync = sync();
        sync.request_push("stage=genesis".into());
        assert!(!sync.is_pushing());
        assert_eq!(sync.take_pending_push().as_deref(), Some("stage=genesis"));
        assert!(sync.is_pushing());
        sync.push_settled();
        assert!(!sync.is_pushing());
    }

    #[test]
    fn newer_request_supersedes_a_queued_one() {
        let mut sync = sync();
        sync.request_push("stage=genesis".into());
        sync.request_push("stage=genesis&page=2".into());
        assert_eq!(
            sync.take_pending_push().as_deref(),
            Some("stage=genesis&page=2")
        );
        assert!(sync.take_pending_push().is_none());
    }

    #[test]
    fn request_during_flight_keeps_machine_pushing_until_drained() {
        let mut sync = sync();
        sync.request_push("page=2".into());
        let _ = sync.take_pending_push();
        sync.request_push("page=3".into());
        sync.push_settled();
        assert!(sync.is_pushing());
        assert_eq!(sync.take_pending_push().as_deref(), Some("page=3"));
        sync.push_settled();
        assert!(!sync.is_pushing());
    }

    #[test]
    fn echo_of_own_push_is_not_accepted() {
        let mut sync = sync();
        sync.request_push("page=2".into());
        let pushed = sync.take_pending_push().unwrap();
        assert!(!sync.observe_external(&pushed));
        assert!(sync.observe_external("page=5"));
    }

    #[test]
    fn identical_push_is_skipped_unless_superseded() {
        let mut sync = sync();
        sync.request_push("page=2".into());
        let _ = sync.take_pending_push();
        sync.push_settled();
        sync.request_push("page=2".into());
        assert!(sync.take_pending_push().is_none());
    }

    #[test]
    fn debounce_deadline_is_replaced_not_accumulated() {
        let mut sync = sync();
        let start = Instant::now();
        sync.schedule_search_write(start);
        sync.schedule_search_write(start + Duration::from_millis(200));
        assert!(!sync.search_write_due(start + Duration::from_millis(400)));
        assert!(sync.search_write_due(start + Duration::from_millis(500)));
    }
}
