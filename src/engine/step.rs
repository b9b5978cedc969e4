//! One candidate-to-candidate transition.
//!
//! A step's side effects are strictly ordered: the logical position
//! moves first, then the transient proxy is staged, then the cancelable
//! `step_start` checkpoint fires, and only then does the visual begin.
//! The visual is skippable; the logical move is not.

use web_time::Instant;

use super::FlipEngine;
use crate::animation::FlipAnimation;
use crate::candidate::CandidateInfo;
use crate::events::TransitionRecord;
use crate::geometry::FlipGeometry;
use crate::policy::NavigationPolicy;
use crate::render::{FlipStage, NodeHandle};

/// The staged nodes and clock of a non-vetoed step.
pub(crate) struct StepVisual {
    pub stage: FlipStage,
    pub animation: FlipAnimation,
}

/// The in-flight state of one hop.
pub(crate) struct ActiveStep {
    pub record: TransitionRecord,
    /// The transient proxy attached under the host container.
    pub proxy: NodeHandle,
    /// `None` when `step_start` was vetoed - the step then completes on
    /// its first observation, like a zero-duration animation.
    pub visual: Option<StepVisual>,
}

impl ActiveStep {
    /// Whether this hop's transition-end has been observed.
    pub fn is_complete(&self, now: Instant) -> bool {
        self.visual
            .as_ref()
            .is_none_or(|visual| visual.animation.is_complete(now))
    }
}

impl FlipEngine {
    /// Execute the non-waiting half of one hop: move the position,
    /// stage the proxy, fire `step_start`, and start the animation
    /// clock unless vetoed.
    pub(crate) fn begin_step(
        &mut self,
        to: CandidateInfo,
        policy: &NavigationPolicy,
    ) -> ActiveStep {
        // Defensive cleanup: at most one transient proxy may exist.
        if let Some(stale) = self.active_proxy.take() {
            log::warn!("removing leftover transient proxy {}", stale.0);
            self.renderer.remove(stale);
        }

        // Logical state change always precedes the visual one, so
        // querying mid-animation already reflects the new position.
        let from = self.candidates.info_at(self.position);
        self.position = to.position;

        let proxy = self.renderer.create_node();
        self.renderer.attach_to_container(proxy);
        self.active_proxy = Some(proxy);

        let record = TransitionRecord {
            from,
            to,
            policy: policy.clone(),
        };

        let vetoed = self.notify_step_start(&record, proxy).is_veto();
        let visual = if vetoed {
            log::debug!(
                "step {:?} -> {:?} vetoed; logical move stands",
                record.from.position,
                record.to.position,
            );
            None
        } else {
            Some(self.stage_visual(&record, policy, proxy))
        };

        ActiveStep {
            record,
            proxy,
            visual,
        }
    }

    /// Build the disposable face clones under the proxy, hand them to
    /// the renderer with the step's geometry, and start the clock.
    fn stage_visual(
        &mut self,
        record: &TransitionRecord,
        policy: &NavigationPolicy,
        proxy: NodeHandle,
    ) -> StepVisual {
        // The sequencer only hands over resolved targets; fall back to
        // an empty face rather than panic if the snapshot raced.
        let incoming_src = record
            .to
            .position
            .and_then(|p| self.candidates.get(p))
            .cloned();
        let incoming = match incoming_src.as_ref() {
            Some(candidate) => self.renderer.clone_candidate(candidate),
            None => self.renderer.create_node(),
        };

        // Outgoing face plus a static background clone that masks its
        // stale half past the rotation midpoint. Absent on the initial
        // flip, when nothing was displayed before.
        let outgoing_src = record
            .from
            .position
            .and_then(|p| self.candidates.get(p))
            .cloned();
        let (outgoing, background) = match outgoing_src.as_ref() {
            Some(candidate) => (
                Some(self.renderer.clone_candidate(candidate)),
                Some(self.renderer.clone_candidate(candidate)),
            ),
            None => (None, None),
        };

        let stage = FlipStage {
            proxy,
            incoming,
            outgoing,
            background,
        };
        self.renderer.attach(proxy, incoming);
        if let Some(node) = outgoing {
            self.renderer.attach(proxy, node);
        }
        if let Some(node) = background {
            self.renderer.attach(proxy, node);
        }

        let geometry = FlipGeometry::for_direction(
            policy.direction,
            self.renderer.container_size(),
            policy.perspective,
            policy.step_duration,
            outgoing.is_some(),
        );
        self.renderer.present(&stage, &geometry);

        StepVisual {
            stage,
            animation: FlipAnimation::new(&geometry, self.easing),
        }
    }

    /// Fire `step_end` and dispose the transient proxy (the staged
    /// clones live under it and go with it).
    pub(crate) fn finish_step(&mut self, step: &ActiveStep) {
        self.notify_step_end(&step.record);
        self.renderer.remove(step.proxy);
        if self.active_proxy == Some(step.proxy) {
            self.active_proxy = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use web_time::{Duration, Instant};

    use super::super::test_support::engine_with;
    use crate::candidate::Reference;
    use crate::engine::FlipRequest;

    fn settled() -> Instant {
        Instant::now() + Duration::from_secs(600)
    }

    #[test]
    fn proxy_lifecycle_brackets_the_step() {
        let (mut engine, calls, _events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));
        let _ = engine
            .flip(FlipRequest::to(Reference::Value("b".into())))
            .unwrap();
        while engine.update(settled()) {}

        let calls = calls.borrow();
        // Proxy node 1: created, attached, presented on, removed last.
        assert_eq!(calls[0], "create 1");
        assert_eq!(calls[1], "attach-container 1");
        assert!(calls.iter().any(|c| c.starts_with("present")));
        assert_eq!(calls.last().map(String::as_str), Some("remove 1"));
    }

    #[test]
    fn initial_flip_stages_no_outgoing_face() {
        let (mut engine, calls, _events) = engine_with(&["a", "b"]);
        // Nothing displayed yet: only the incoming clone is staged.
        let _ = engine
            .flip(FlipRequest::to(Reference::Index(0)))
            .unwrap();
        while engine.update(settled()) {}

        let clones = calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("clone"))
            .count();
        assert_eq!(clones, 1);
    }

    #[test]
    fn regular_step_stages_outgoing_and_background_clones() {
        let (mut engine, calls, _events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));
        let _ = engine
            .flip(FlipRequest::to(Reference::Index(1)))
            .unwrap();
        while engine.update(settled()) {}

        // One incoming clone of B, outgoing + background clones of A.
        let calls = calls.borrow();
        let clones: Vec<&str> = calls
            .iter()
            .filter(|c| c.starts_with("clone"))
            .map(String::as_str)
            .collect();
        assert_eq!(clones, vec!["clone 11", "clone 10", "clone 10"]);
    }

    #[test]
    fn position_moves_before_the_animation_completes() {
        let (mut engine, _calls, _events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));
        let _ = engine
            .flip(FlipRequest::to(Reference::Index(1)))
            .unwrap();

        // No update tick yet: the visual is mid-flight, the logical
        // position has already moved.
        assert!(engine.is_flipping());
        assert_eq!(engine.position(), Some(1));
        assert!(engine.current_stage().is_some());
        assert!(engine.current_frame(Instant::now()).is_some());
    }

    #[test]
    fn step_is_not_complete_before_its_duration() {
        let (mut engine, _calls, events) = engine_with(&["a", "b"]);
        engine.set_current(Some(&Reference::Index(0)));
        let _ = engine
            .flip(FlipRequest::to(Reference::Index(1)))
            .unwrap();

        // Default duration is 500ms; an immediate tick keeps waiting.
        assert!(engine.update(Instant::now()));
        assert!(engine.is_flipping());
        assert!(!events.borrow().iter().any(|e| e.starts_with("step-end")));

        while engine.update(settled()) {}
        assert!(events.borrow().iter().any(|e| e.starts_with("step-end")));
    }
}
