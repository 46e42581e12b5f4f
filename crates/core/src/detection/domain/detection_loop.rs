use log::{debug, warn};

use crate::shared::detection::DetectionResult;

/// Whether the live analysis loop is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Polling,
}

/// Tag handed out with each analysis slot; completions must present it back.
pub type RequestTag = u64;

/// Why the loop refused to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendOffline;

/// The live detection loop, kept free of timers and I/O.
///
/// The GUI drives it: a subscription fires every cycle while `is_polling()`,
/// each tick may hand out a tagged slot, and the eventual response is fed
/// back through [`DetectionLoop::complete`]. Requests are serialized: a
/// tick that lands while one is outstanding is skipped rather than
/// overlapped. Tags make anything stale (arriving after a stop or a
/// restart) harmless to apply.
#[derive(Debug)]
pub struct DetectionLoop {
    state: LoopState,
    next_tag: RequestTag,
    in_flight: Option<RequestTag>,
    results: Vec<DetectionResult>,
}

impl DetectionLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            next_tag: 0,
            in_flight: None,
            results: Vec::new(),
        }
    }

    pub fn is_polling(&self) -> bool {
        self.state == LoopState::Polling
    }

    /// Faces from the most recent applied analysis, in backend order.
    pub fn results(&self) -> &[DetectionResult] {
        &self.results
    }

    /// Begin polling. Refused while the backend is offline; the loop must
    /// never start against a backend that cannot answer.
    pub fn start(&mut self, backend_online: bool) -> Result<(), BackendOffline> {
        if !backend_online {
            return Err(BackendOffline);
        }
        self.state = LoopState::Polling;
        debug!("detection loop started");
        Ok(())
    }

    /// Stop polling and clear the overlay state immediately. Any response
    /// still in the air keeps its now-orphaned tag and will be discarded.
    pub fn stop(&mut self) {
        self.state = LoopState::Idle;
        self.in_flight = None;
        self.results.clear();
        debug!("detection loop stopped");
    }

    /// One cadence tick. Hands out a tagged analysis slot only when the
    /// loop is polling, a frame exists, and no request is outstanding;
    /// every other combination skips the cycle silently.
    pub fn tick(&mut self, frame_ready: bool) -> Option<RequestTag> {
        if self.state != LoopState::Polling || !frame_ready || self.in_flight.is_some() {
            return None;
        }
        self.next_tag += 1;
        self.in_flight = Some(self.next_tag);
        Some(self.next_tag)
    }

    /// Apply an analysis outcome. Returns whether it was applied: a tag
    /// that is not the outstanding one belongs to a cycle the loop no
    /// longer cares about. Failures free the slot but keep the previous
    /// results on screen; the loop itself keeps going.
    pub fn complete(
        &mut self,
        tag: RequestTag,
        outcome: Result<Vec<DetectionResult>, String>,
    ) -> bool {
        if self.in_flight != Some(tag) {
            debug!("discarding stale analysis response (tag {tag})");
            return false;
        }
        self.in_flight = None;
        match outcome {
            Ok(results) => {
                self.results = results;
                true
            }
            Err(e) => {
                warn!("analysis cycle failed, keeping previous results: {e}");
                false
            }
        }
    }
}

impl Default for DetectionLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(name: &str) -> DetectionResult {
        DetectionResult {
            bbox: [0.0, 0.0, 50.0, 50.0],
            name: name.to_string(),
            score: 0.9,
            similarity: 0.7,
        }
    }

    #[test]
    fn test_start_refused_while_backend_offline() {
        let mut dl = DetectionLoop::new();
        assert_eq!(dl.start(false), Err(BackendOffline));
        assert!(!dl.is_polling());
        assert_eq!(dl.tick(true), None);
    }

    #[test]
    fn test_start_online_then_tick_hands_out_slot() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        assert!(dl.is_polling());
        assert!(dl.tick(true).is_some());
    }

    #[test]
    fn test_tick_without_frame_skips_cycle() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        assert_eq!(dl.tick(false), None);
    }

    #[test]
    fn test_requests_are_serialized() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        let tag = dl.tick(true).unwrap();
        // Outstanding request: further ticks must not overlap it.
        assert_eq!(dl.tick(true), None);
        assert_eq!(dl.tick(true), None);
        assert!(dl.complete(tag, Ok(vec![face("Alice")])));
        assert!(dl.tick(true).is_some());
    }

    #[test]
    fn test_success_replaces_results() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        let tag = dl.tick(true).unwrap();
        dl.complete(tag, Ok(vec![face("Alice"), face("Unknown")]));
        assert_eq!(dl.results().len(), 2);

        let tag = dl.tick(true).unwrap();
        dl.complete(tag, Ok(vec![]));
        assert!(dl.results().is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_results_and_frees_slot() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        let tag = dl.tick(true).unwrap();
        dl.complete(tag, Ok(vec![face("Alice")]));

        let tag = dl.tick(true).unwrap();
        assert!(!dl.complete(tag, Err("connection reset".into())));
        assert_eq!(dl.results().len(), 1);
        // Slot freed: the loop keeps going.
        assert!(dl.tick(true).is_some());
    }

    #[test]
    fn test_stop_clears_results_immediately() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        let tag = dl.tick(true).unwrap();
        dl.complete(tag, Ok(vec![face("Alice")]));
        dl.stop();
        assert!(!dl.is_polling());
        assert!(dl.results().is_empty());
    }

    #[test]
    fn test_response_after_stop_is_discarded() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        let tag = dl.tick(true).unwrap();
        dl.stop();
        assert!(!dl.complete(tag, Ok(vec![face("Alice")])));
        assert!(dl.results().is_empty());
    }

    #[test]
    fn test_response_from_previous_session_is_discarded() {
        let mut dl = DetectionLoop::new();
        dl.start(true).unwrap();
        let stale = dl.tick(true).unwrap();
        dl.stop();
        dl.start(true).unwrap();
        let fresh = dl.tick(true).unwrap();
        assert_ne!(stale, fresh);
        // The old session's response lands after the restart.
        assert!(!dl.complete(stale, Ok(vec![face("Mallory")])));
        assert!(dl.results().is_empty());
        assert!(dl.complete(fresh, Ok(vec![face("Alice")])));
        assert_eq!(dl.results()[0].name, "Alice");
    }

    #[test]
    fn test_tick_while_idle_yields_nothing() {
        let mut dl = DetectionLoop::new();
        assert_eq!(dl.tick(true), None);
    }
}
