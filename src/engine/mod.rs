//! The flip engine: container state and orchestration entry points.
//!
//! [`FlipEngine`] owns everything the host delegates: the candidate
//! snapshot, the current position, the observer list, the rendering
//! capability, and at most one in-flight flip session. The host drives
//! it cooperatively - [`FlipEngine::flip`] starts a session,
//! [`FlipEngine::update`] advances it each frame.

mod sequencer;
mod step;

pub use sequencer::{FlipRequest, FlipStatus};

use rand::rngs::StdRng;
use rand::SeedableRng;
use web_time::Instant;

use crate::animation::{Easing, FlipFrame};
use crate::candidate::{Candidate, CandidateInfo, CandidateSet, Reference};
use crate::error::FlipError;
use crate::events::{Decision, FlipDetail, FlipObserver, TransitionRecord};
use crate::options::FlipOptions;
use crate::render::{FlipRenderer, FlipStage, NodeHandle};
use crate::select;
use sequencer::FlipSession;

/// Orchestrates candidate navigation and flip animation for one
/// container.
///
/// The transient proxy node and the logical position are exclusively
/// owned here; no other component mutates them.
pub struct FlipEngine {
    /// Ordered candidate snapshot, rebuilt on structural change.
    candidates: CandidateSet,
    /// Currently displayed candidate; `None` when nothing is selected.
    position: Option<usize>,
    /// Configuration snapshot, turned into a policy at each flip call.
    options: FlipOptions,
    /// Easing applied to every step's rotation progress.
    easing: Easing,
    observers: Vec<Box<dyn FlipObserver>>,
    renderer: Box<dyn FlipRenderer>,
    rng: StdRng,
    /// At most one session is in flight (see `flip` for the caller
    /// obligation on re-entrant requests).
    session: Option<FlipSession>,
    /// The one transient proxy slot shared by all steps.
    active_proxy: Option<NodeHandle>,
}

impl FlipEngine {
    /// Engine over the given rendering capability.
    ///
    /// # Errors
    ///
    /// [`FlipError::PolicyRange`] when the options violate the step
    /// range invariant - configuration errors surface here, not at flip
    /// time.
    pub fn new(
        renderer: Box<dyn FlipRenderer>,
        options: FlipOptions,
    ) -> Result<Self, FlipError> {
        options.validate()?;
        Ok(Self {
            candidates: CandidateSet::default(),
            position: None,
            options,
            easing: Easing::default(),
            observers: Vec::new(),
            renderer,
            rng: StdRng::from_os_rng(),
            session: None,
            active_proxy: None,
        })
    }

    /// Register a lifecycle observer. Observers are notified in
    /// registration order.
    pub fn add_observer(&mut self, observer: Box<dyn FlipObserver>) {
        self.observers.push(observer);
    }

    /// Reseed the internal RNG for deterministic replay or testing.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Set the easing curve applied to step animations.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Rebuild the candidate snapshot after a structural change in the
    /// host's child list.
    ///
    /// The current candidate is re-resolved by node identity; if it is
    /// no longer present the position becomes `None`.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        let current_id =
            self.current_candidate().map(|candidate| candidate.id);
        self.candidates = CandidateSet::new(candidates);
        self.position =
            current_id.and_then(|id| self.candidates.position_of(id));
        log::debug!(
            "candidate snapshot rebuilt: {} candidate(s), position {:?}",
            self.candidates.len(),
            self.position,
        );
    }

    /// Mark a candidate as currently displayed without flipping.
    ///
    /// Host initialization only - navigation always moves the position
    /// through steps. An unresolved reference clears the selection.
    pub fn set_current(&mut self, reference: Option<&Reference>) {
        self.position = self.candidates.resolve(reference).position;
    }

    /// Replace the configuration snapshot.
    ///
    /// # Errors
    ///
    /// [`FlipError::PolicyRange`] on an invalid step range; the previous
    /// options stay in effect.
    pub fn set_options(
        &mut self,
        options: FlipOptions,
    ) -> Result<(), FlipError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// The active configuration snapshot.
    #[must_use]
    pub const fn options(&self) -> &FlipOptions {
        &self.options
    }

    /// The current candidate snapshot.
    #[must_use]
    pub const fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Currently displayed position; `None` when nothing is selected.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    /// Currently displayed candidate.
    #[must_use]
    pub fn current_candidate(&self) -> Option<&Candidate> {
        self.position.and_then(|p| self.candidates.get(p))
    }

    /// Value of the currently displayed candidate.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.current_candidate().and_then(|c| c.value.as_deref())
    }

    /// Resolve an arbitrary reference against the current snapshot.
    #[must_use]
    pub fn resolve(&self, reference: Option<&Reference>) -> CandidateInfo {
        self.candidates.resolve(reference)
    }

    /// Preview the candidate the active policy would pick next, without
    /// flipping. Consumes randomness in random mode.
    pub fn peek_next(&mut self) -> CandidateInfo {
        let policy = self.options.policy_for(self.candidates.len());
        let next = select::next_position(
            self.position,
            self.candidates.len(),
            policy.mode,
            policy.distinct,
            &mut self.rng,
        );
        self.candidates.info_at(next)
    }

    /// Whether a flip session is in flight.
    #[must_use]
    pub const fn is_flipping(&self) -> bool {
        self.session.is_some()
    }

    /// Sample the active step's visual state, for hosts that draw
    /// per-frame. `None` when idle or while the step's visual was
    /// vetoed.
    #[must_use]
    pub fn current_frame(&self, now: Instant) -> Option<FlipFrame> {
        let session = self.session.as_ref()?;
        let visual = session.active.visual.as_ref()?;
        Some(visual.animation.frame(now))
    }

    /// The staged node set of the active step. `None` when idle or
    /// while the step's visual was vetoed.
    #[must_use]
    pub fn current_stage(&self) -> Option<&FlipStage> {
        let session = self.session.as_ref()?;
        session.active.visual.as_ref().map(|visual| &visual.stage)
    }

    // ── Observer dispatch ───────────────────────────────────────────────
    //
    // Cancelable checkpoints notify every observer even after a veto;
    // one veto cancels.

    pub(crate) fn notify_flip_start(
        &mut self,
        detail: &FlipDetail,
    ) -> Decision {
        let mut decision = Decision::Proceed;
        for observer in &mut self.observers {
            if observer.flip_start(detail).is_veto() {
                decision = Decision::Veto;
            }
        }
        decision
    }

    pub(crate) fn notify_flip_end(&mut self, detail: &FlipDetail) {
        for observer in &mut self.observers {
            observer.flip_end(detail);
        }
    }

    pub(crate) fn notify_step_start(
        &mut self,
        record: &TransitionRecord,
        proxy: NodeHandle,
    ) -> Decision {
        let mut decision = Decision::Proceed;
        for observer in &mut self.observers {
            if observer.step_start(record, proxy).is_veto() {
                decision = Decision::Veto;
            }
        }
        decision
    }

    pub(crate) fn notify_step_end(&mut self, record: &TransitionRecord) {
        for observer in &mut self.observers {
            observer.step_end(record);
        }
    }
}

impl std::fmt::Debug for FlipEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipEngine")
            .field("candidates", &self.candidates.len())
            .field("position", &self.position)
            .field("is_flipping", &self.is_flipping())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared test doubles: a renderer that records every call and an
    //! observer that records every notification.

    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::FlipEngine;
    use crate::candidate::{Candidate, CandidateId};
    use crate::events::{
        Decision, FlipDetail, FlipObserver, TransitionRecord,
    };
    use crate::geometry::FlipGeometry;
    use crate::options::FlipOptions;
    use crate::render::{FlipRenderer, FlipStage, NodeHandle};

    pub type Log = Rc<RefCell<Vec<String>>>;

    fn fmt_position(position: Option<usize>) -> String {
        position.map_or_else(|| "-".to_owned(), |p| p.to_string())
    }

    /// Renderer double handing out sequential handles.
    pub struct RecordingRenderer {
        calls: Log,
        next_handle: u64,
    }

    impl RecordingRenderer {
        pub fn new(calls: Log) -> Self {
            Self {
                calls,
                next_handle: 0,
            }
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn next(&mut self) -> NodeHandle {
            self.next_handle += 1;
            NodeHandle(self.next_handle)
        }
    }

    impl FlipRenderer for RecordingRenderer {
        fn clone_candidate(&mut self, candidate: &Candidate) -> NodeHandle {
            let handle = self.next();
            self.record(format!("clone {}", candidate.id.0));
            handle
        }

        fn create_node(&mut self) -> NodeHandle {
            let handle = self.next();
            self.record(format!("create {}", handle.0));
            handle
        }

        fn attach(&mut self, parent: NodeHandle, child: NodeHandle) {
            self.record(format!("attach {}<-{}", parent.0, child.0));
        }

        fn attach_to_container(&mut self, node: NodeHandle) {
            self.record(format!("attach-container {}", node.0));
        }

        fn remove(&mut self, node: NodeHandle) {
            self.record(format!("remove {}", node.0));
        }

        fn container_size(&self) -> Vec2 {
            Vec2::new(120.0, 60.0)
        }

        fn present(&mut self, stage: &FlipStage, geometry: &FlipGeometry) {
            self.record(format!(
                "present {} proxy={}",
                geometry.direction, stage.proxy.0,
            ));
        }
    }

    /// Observer double with switchable vetoes.
    pub struct EventLog {
        events: Log,
        pub veto_flip_start: bool,
        pub veto_step_start: bool,
    }

    impl EventLog {
        pub fn new(events: Log) -> Self {
            Self {
                events,
                veto_flip_start: false,
                veto_step_start: false,
            }
        }
    }

    impl FlipObserver for EventLog {
        fn flip_start(&mut self, detail: &FlipDetail) -> Decision {
            self.events.borrow_mut().push(format!(
                "flip-start {}->{}",
                fmt_position(detail.from.position),
                fmt_position(detail.to.position),
            ));
            if self.veto_flip_start {
                Decision::Veto
            } else {
                Decision::Proceed
            }
        }

        fn flip_end(&mut self, detail: &FlipDetail) {
            self.events.borrow_mut().push(format!(
                "flip-end {}->{}",
                fmt_position(detail.from.position),
                fmt_position(detail.to.position),
            ));
        }

        fn step_start(
            &mut self,
            record: &TransitionRecord,
            _proxy: NodeHandle,
        ) -> Decision {
            self.events.borrow_mut().push(format!(
                "step-start {}->{}",
                fmt_position(record.from.position),
                fmt_position(record.to.position),
            ));
            if self.veto_step_start {
                Decision::Veto
            } else {
                Decision::Proceed
            }
        }

        fn step_end(&mut self, record: &TransitionRecord) {
            self.events.borrow_mut().push(format!(
                "step-end {}->{}",
                fmt_position(record.from.position),
                fmt_position(record.to.position),
            ));
        }
    }

    /// Valued candidates with stable ids starting at 10.
    pub fn candidates(values: &[&str]) -> Vec<Candidate> {
        values
            .iter()
            .zip(10_u64..)
            .map(|(value, id)| Candidate::with_value(CandidateId(id), *value))
            .collect()
    }

    /// Engine over recording doubles, loaded with valued candidates.
    pub fn engine_with(values: &[&str]) -> (FlipEngine, Log, Log) {
        engine_with_options(values, FlipOptions::default())
    }

    pub fn engine_with_options(
        values: &[&str],
        options: FlipOptions,
    ) -> (FlipEngine, Log, Log) {
        let calls: Log = Rc::default();
        let events: Log = Rc::default();
        let renderer = RecordingRenderer::new(Rc::clone(&calls));
        let mut engine =
            FlipEngine::new(Box::new(renderer), options).unwrap();
        engine.add_observer(Box::new(EventLog::new(Rc::clone(&events))));
        engine.set_candidates(candidates(values));
        (engine, calls, events)
    }
}
