//! Flip session sequencing: one navigation, one or many hops.
//!
//! A session is opened by [`FlipEngine::flip`] and advanced by
//! [`FlipEngine::update`]. Hops are strictly serial: the next one never
//! begins before the previous one's transition-end has been observed.

use web_time::{Duration, Instant};

use super::step::ActiveStep;
use super::FlipEngine;
use crate::candidate::Reference;
use crate::error::FlipError;
use crate::events::FlipDetail;
use crate::policy::{Direction, NavigationPolicy, SelectionMode};
use crate::select;

/// A navigation request: where to go and which policy fields to
/// override for this flip only.
///
/// Unset fields fall back to the engine's configured options at the
/// moment [`FlipEngine::flip`] is called.
#[derive(Debug, Clone, Default)]
pub struct FlipRequest {
    target: Option<Reference>,
    direct: bool,
    mode: Option<SelectionMode>,
    distinct: Option<bool>,
    direction: Option<Direction>,
    duration: Option<Duration>,
    min_steps: Option<u32>,
    max_steps: Option<Option<u32>>,
}

impl FlipRequest {
    /// Flip to whatever candidate the selection policy picks.
    #[must_use]
    pub fn next() -> Self {
        Self::default()
    }

    /// Flip to an explicitly referenced candidate.
    #[must_use]
    pub fn to(reference: Reference) -> Self {
        Self {
            target: Some(reference),
            ..Self::default()
        }
    }

    /// Flip to the first candidate with the given value.
    #[must_use]
    pub fn to_value(value: impl Into<String>) -> Self {
        Self::to(Reference::Value(value.into()))
    }

    /// Flip to the candidate at the given position.
    #[must_use]
    pub fn to_index(index: usize) -> Self {
        Self::to(Reference::Index(index))
    }

    /// Go to the target in a single hop, ignoring step-count policy.
    #[must_use]
    pub fn direct(mut self) -> Self {
        self.direct = true;
        self
    }

    /// Override the selection mode for this flip.
    #[must_use]
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Override the distinctness requirement for this flip.
    #[must_use]
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = Some(distinct);
        self
    }

    /// Override the flip direction for this flip.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Override the per-step animation duration for this flip.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Override the step-count range for this flip. `None` for `max`
    /// means unbounded.
    #[must_use]
    pub fn with_steps(mut self, min: u32, max: Option<u32>) -> Self {
        self.min_steps = Some(min);
        self.max_steps = Some(max);
        self
    }
}

/// Outcome of a [`FlipEngine::flip`] call that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum FlipStatus {
    /// A session is in flight; drive it with [`FlipEngine::update`].
    Started,
    /// A `flip_start` observer vetoed the navigation. Nothing changed.
    Vetoed,
}

/// The state of one in-flight navigation.
pub(crate) struct FlipSession {
    /// Flip-level detail, captured once before the first hop. `from`
    /// is the position at flip time, not at the current hop.
    pub detail: FlipDetail,
    pub target_position: usize,
    pub steps_taken: u32,
    pub active: ActiveStep,
}

impl FlipEngine {
    /// Start a navigation session and its first hop.
    ///
    /// The logical position moves at each hop's start, so queries made
    /// mid-animation already reflect the hop's destination. If a session
    /// is already in flight it is abandoned without its `flip_end`; the
    /// host is expected to serialize flips, this is a safety net rather
    /// than a queue.
    ///
    /// # Errors
    ///
    /// [`FlipError::TargetNotFound`] when an explicit target does not
    /// resolve against the current snapshot, or when no target can be
    /// derived (empty candidate set, or a lone candidate under a
    /// distinctness requirement). [`FlipError::PolicyRange`] when the
    /// request's step overrides leave `min_steps` above a finite
    /// `max_steps`. No observer is notified on any error.
    pub fn flip(
        &mut self,
        request: FlipRequest,
    ) -> Result<FlipStatus, FlipError> {
        let policy = self.merge_policy(&request)?;
        let FlipRequest { target, direct, .. } = request;

        let target_position = match target.as_ref() {
            Some(reference) => self
                .candidates
                .resolve(Some(reference))
                .position
                .ok_or_else(|| {
                    FlipError::TargetNotFound(reference.describe())
                })?,
            None => select::next_position(
                self.position,
                self.candidates.len(),
                policy.mode,
                policy.distinct,
                &mut self.rng,
            )
            .ok_or_else(|| {
                FlipError::TargetNotFound(
                    "derived next candidate".to_owned(),
                )
            })?,
        };

        let detail = FlipDetail {
            from: self.candidates.info_at(self.position),
            to: self.candidates.info_at(Some(target_position)),
            direct,
            policy,
        };

        if self.notify_flip_start(&detail).is_veto() {
            log::debug!("flip to position {target_position} vetoed");
            return Ok(FlipStatus::Vetoed);
        }

        // Safety net against overlapping sessions. The abandoned flip
        // never gets its flip_end.
        if let Some(stale) = self.session.take() {
            log::warn!(
                "abandoning in-flight flip session after {} step(s)",
                stale.steps_taken,
            );
            self.renderer.remove(stale.active.proxy);
            if self.active_proxy == Some(stale.active.proxy) {
                self.active_proxy = None;
            }
        }

        log::debug!(
            "flip {:?} -> {target_position} (direct: {direct})",
            detail.from.position,
        );

        let hop = self.next_hop(&detail, target_position, 0);
        let to = self.candidates.info_at(Some(hop));
        let active = self.begin_step(to, &detail.policy);
        self.session = Some(FlipSession {
            detail,
            target_position,
            steps_taken: 0,
            active,
        });
        Ok(FlipStatus::Started)
    }

    /// Advance the in-flight session at time `now`.
    ///
    /// Returns `true` while a session remains in flight. A hop whose
    /// transition-end has been reached is finalized, and either the
    /// session completes (firing `flip_end`) or the next hop begins
    /// within the same tick.
    pub fn update(&mut self, now: Instant) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };

        if !session.active.is_complete(now) {
            self.session = Some(session);
            return true;
        }

        self.finish_step(&session.active);
        session.steps_taken += 1;

        let arrived = session.active.record.to.position
            == Some(session.target_position);
        let done = session.detail.direct
            || (arrived
                && session.steps_taken >= session.detail.policy.min_steps);
        if done {
            log::debug!(
                "flip complete after {} step(s)",
                session.steps_taken,
            );
            self.notify_flip_end(&session.detail);
            return false;
        }

        let hop = self.next_hop(
            &session.detail,
            session.target_position,
            session.steps_taken,
        );
        let to = self.candidates.info_at(Some(hop));
        session.active = self.begin_step(to, &session.detail.policy);
        self.session = Some(session);
        true
    }

    /// Pick the next hop's position for the session's current state.
    ///
    /// The target is forced once the step-count policy no longer allows
    /// detours; otherwise the selection policy picks an intermediate
    /// candidate, falling back to the target when it yields nothing.
    fn next_hop(
        &mut self,
        detail: &FlipDetail,
        target_position: usize,
        steps_taken: u32,
    ) -> usize {
        let policy = &detail.policy;
        let forced = detail.direct
            || steps_taken >= policy.min_steps
            || policy.max_steps.is_some_and(|max| steps_taken >= max);
        if forced {
            return target_position;
        }
        select::next_position(
            self.position,
            self.candidates.len(),
            policy.mode,
            policy.distinct,
            &mut self.rng,
        )
        .unwrap_or(target_position)
    }

    /// Snapshot the effective policy for one flip: configured options
    /// specialized to the current candidate count, then the request's
    /// overrides on top.
    fn merge_policy(
        &self,
        request: &FlipRequest,
    ) -> Result<NavigationPolicy, FlipError> {
        let mut policy = self.options.policy_for(self.candidates.len());
        if let Some(mode) = request.mode {
            policy.mode = mode;
        }
        if let Some(distinct) = request.distinct {
            policy.distinct = distinct;
        }
        if let Some(direction) = request.direction {
            policy.direction = direction;
        }
        if let Some(duration) = request.duration {
            policy.step_duration = duration;
        }
        if let Some(min) = request.min_steps {
            policy.min_steps = min;
        }
        if let Some(max) = request.max_steps {
            policy.max_steps = max;
        }
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use web_time::{Duration, Instant};

    use super::super::test_support::{
        candidates, engine_with, engine_with_options, EventLog,
        RecordingRenderer,
    };
    use super::{FlipRequest, FlipStatus};
    use crate::candidate::Reference;
    use crate::engine::FlipEngine;
    use crate::error::FlipError;
    use crate::options::FlipOptions;
    use crate::policy::SelectionMode;

    fn settled() -> Instant {
        Instant::now() + Duration::from_secs(600)
    }

    fn drive(engine: &mut FlipEngine) {
        for _ in 0..32 {
            if !engine.update(settled()) {
                return;
            }
        }
        panic!("session did not complete within the update limit");
    }

    #[test]
    fn satisfied_minimum_goes_straight_to_the_target() {
        let (mut engine, _calls, events) = engine_with(&["a", "b", "c"]);
        engine.set_current(Some(&Reference::Index(0)));

        let status = engine.flip(FlipRequest::to_value("c")).unwrap();
        assert_eq!(status, FlipStatus::Started);
        drive(&mut engine);

        assert_eq!(engine.position(), Some(2));
        assert_eq!(
            *events.borrow(),
            vec![
                "flip-start 0->2",
                "step-start 0->2",
                "step-end 0->2",
                "flip-end 0->2",
            ],
        );
    }

    #[test]
    fn minimum_step_count_forces_intermediate_hops() {
        let options = FlipOptions {
            min_steps: 2,
            max_steps: Some(2),
            ..FlipOptions::default()
        };
        let (mut engine, _calls, events) =
            engine_with_options(&["a", "b"], options);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine.flip(FlipRequest::to_value("a")).unwrap();
        drive(&mut engine);

        // Two hops: away to B, then back to the target.
        assert_eq!(engine.position(), Some(0));
        assert_eq!(
            *events.borrow(),
            vec![
                "flip-start 0->0",
                "step-start 0->1",
                "step-end 0->1",
                "step-start 1->0",
                "step-end 1->0",
                "flip-end 0->0",
            ],
        );
    }

    #[test]
    fn direct_flip_takes_exactly_one_hop() {
        let options = FlipOptions {
            min_steps: 3,
            ..FlipOptions::default()
        };
        let (mut engine, _calls, events) =
            engine_with_options(&["a", "b", "c"], options);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine.flip(FlipRequest::to_index(0).direct()).unwrap();
        drive(&mut engine);

        // Flipping to the already-current candidate still animates.
        assert_eq!(engine.position(), Some(0));
        let steps = events
            .borrow()
            .iter()
            .filter(|e| e.starts_with("step-start"))
            .count();
        assert_eq!(steps, 1);
    }

    #[test]
    fn empty_set_fails_before_any_side_effect() {
        let (mut engine, calls, events) = engine_with(&[]);
        let result = engine.flip(FlipRequest::next());
        assert!(matches!(result, Err(FlipError::TargetNotFound(_))));
        assert!(calls.borrow().is_empty());
        assert!(events.borrow().is_empty());
        assert!(!engine.is_flipping());
    }

    #[test]
    fn unresolved_explicit_target_fails_cleanly() {
        let (mut engine, calls, events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));
        let result = engine.flip(FlipRequest::to_value("zz"));
        assert!(matches!(result, Err(FlipError::TargetNotFound(_))));
        assert!(calls.borrow().is_empty());
        assert!(events.borrow().is_empty());
        assert_eq!(engine.position(), Some(0));
    }

    #[test]
    fn invalid_step_override_is_rejected() {
        let (mut engine, _calls, events) = engine_with(&["a", "b"]);
        let result =
            engine.flip(FlipRequest::to_index(1).with_steps(5, Some(2)));
        assert!(matches!(
            result,
            Err(FlipError::PolicyRange { min: 5, max: 2 }),
        ));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn vetoed_flip_start_is_a_clean_no_op() {
        let calls = Rc::default();
        let events = Rc::default();
        let renderer = RecordingRenderer::new(Rc::clone(&calls));
        let mut engine = FlipEngine::new(
            Box::new(renderer),
            FlipOptions::default(),
        )
        .unwrap();
        let mut observer = EventLog::new(Rc::clone(&events));
        observer.veto_flip_start = true;
        engine.add_observer(Box::new(observer));
        engine.set_candidates(candidates(&["a", "b", "c"]));
        engine.set_current(Some(&Reference::Index(0)));

        let status = engine.flip(FlipRequest::to_index(2)).unwrap();
        assert_eq!(status, FlipStatus::Vetoed);
        assert_eq!(engine.position(), Some(0));
        assert!(!engine.is_flipping());
        assert!(calls.borrow().is_empty());
        assert_eq!(*events.borrow(), vec!["flip-start 0->2"]);
    }

    #[test]
    fn vetoed_step_keeps_the_logical_move() {
        let calls = Rc::default();
        let events = Rc::default();
        let renderer = RecordingRenderer::new(Rc::clone(&calls));
        let mut engine = FlipEngine::new(
            Box::new(renderer),
            FlipOptions::default(),
        )
        .unwrap();
        let mut observer = EventLog::new(Rc::clone(&events));
        observer.veto_step_start = true;
        engine.add_observer(Box::new(observer));
        engine.set_candidates(candidates(&["a", "b"]));
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine.flip(FlipRequest::to_index(1)).unwrap();
        // A vetoed step has no animation and completes immediately.
        drive(&mut engine);

        assert_eq!(engine.position(), Some(1));
        assert!(!calls.borrow().iter().any(|c| c.starts_with("present")));
        assert!(events
            .borrow()
            .iter()
            .any(|e| e.starts_with("step-end")));
        assert!(events.borrow().iter().any(|e| e.starts_with("flip-end")));
    }

    #[test]
    fn flip_end_repeats_the_flip_start_detail() {
        let options = FlipOptions {
            min_steps: 2,
            max_steps: Some(2),
            ..FlipOptions::default()
        };
        let (mut engine, _calls, events) =
            engine_with_options(&["a", "b", "c"], options);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine.flip(FlipRequest::to_value("c")).unwrap();
        drive(&mut engine);

        // from/to are captured once, before the first hop.
        let events = events.borrow();
        assert_eq!(events.first().map(String::as_str), Some("flip-start 0->2"));
        assert_eq!(events.last().map(String::as_str), Some("flip-end 0->2"));
    }

    #[test]
    fn reentrant_flip_abandons_the_session_in_flight() {
        let (mut engine, calls, events) = engine_with(&["a", "b", "c"]);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine.flip(FlipRequest::to_index(1)).unwrap();
        assert!(engine.is_flipping());
        let _ = engine.flip(FlipRequest::to_index(2)).unwrap();
        drive(&mut engine);

        // The first session's proxy was disposed and its flip never
        // completed.
        assert!(calls.borrow().iter().any(|c| c == "remove 1"));
        let flip_ends: Vec<_> = events
            .borrow()
            .iter()
            .filter(|e| e.starts_with("flip-end"))
            .cloned()
            .collect();
        assert_eq!(flip_ends, vec!["flip-end 1->2"]);
        assert_eq!(engine.position(), Some(2));
    }

    #[test]
    fn per_flip_duration_override_stretches_the_step() {
        let (mut engine, _calls, events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine
            .flip(
                FlipRequest::to_index(1)
                    .with_duration(Duration::from_secs(3600)),
            )
            .unwrap();

        // Well past the configured 500ms default, still in flight.
        let later = Instant::now() + Duration::from_secs(5);
        assert!(engine.update(later));
        assert!(!events.borrow().iter().any(|e| e.starts_with("step-end")));
    }

    #[test]
    fn random_mode_reaches_a_distinct_candidate() {
        let options = FlipOptions {
            mode: SelectionMode::Random,
            ..FlipOptions::default()
        };
        let (mut engine, _calls, _events) =
            engine_with_options(&["a", "b", "c", "d"], options);
        engine.reseed(42);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine.flip(FlipRequest::next()).unwrap();
        drive(&mut engine);

        assert!(!engine.is_flipping());
        assert_ne!(engine.position(), Some(0));
        assert!(engine.position().is_some());
    }

    #[test]
    fn request_overrides_do_not_touch_the_options() {
        let (mut engine, _calls, _events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));

        let _ = engine
            .flip(
                FlipRequest::next()
                    .with_mode(SelectionMode::Random)
                    .with_distinct(false)
                    .with_steps(0, Some(1)),
            )
            .unwrap();
        drive(&mut engine);

        assert_eq!(engine.options().mode, SelectionMode::Loop);
        assert_eq!(engine.options().max_steps, None);
    }
}
