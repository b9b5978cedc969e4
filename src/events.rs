//! Lifecycle notifications and the observer seam.
//!
//! A flip session fires `flip_start` / `flip_end` around the whole
//! navigation and `step_start` / `step_end` around every hop. The two
//! start checkpoints are cancelable: any observer may veto. A veto is a
//! normal, silent outcome - never an error.

use crate::candidate::CandidateInfo;
use crate::policy::NavigationPolicy;
use crate::render::NodeHandle;

/// Outcome of a cancelable notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    /// Let the flip or step proceed.
    #[default]
    Proceed,
    /// Cancel: abort the flip before any step, or skip one step's
    /// visual. The logical move of an already-started step stands.
    Veto,
}

impl Decision {
    /// Whether this decision cancels the checkpoint.
    #[must_use]
    pub const fn is_veto(self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Payload of `flip_start` and `flip_end`.
///
/// The source is captured once, before step 1, and the same detail is
/// carried by both notifications - even when intermediate hops pass
/// through the source again.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipDetail {
    /// Source of the whole navigation.
    pub from: CandidateInfo,
    /// Resolved final target.
    pub to: CandidateInfo,
    /// Whether this was a direct (single-hop) request.
    pub direct: bool,
    /// Policy in effect for the session.
    pub policy: NavigationPolicy,
}

/// One hop's immutable transition record.
///
/// Created fresh for every step and discarded after the step's
/// notifications fire.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    /// Candidate displayed before the hop; unresolved when nothing was.
    pub from: CandidateInfo,
    /// Candidate the hop moves to.
    pub to: CandidateInfo,
    /// Policy snapshot in effect.
    pub policy: NavigationPolicy,
}

/// Observer of flip lifecycle notifications.
///
/// All registered observers see every notification; for cancelable
/// checkpoints the vetoes are combined - one veto cancels, but later
/// observers are still notified.
pub trait FlipObserver {
    /// Cancelable session-start checkpoint. A veto aborts the whole
    /// flip with no state change and no further notifications.
    fn flip_start(&mut self, detail: &FlipDetail) -> Decision {
        let _ = detail;
        Decision::Proceed
    }

    /// Non-cancelable session-end notification, carrying the same
    /// detail as `flip_start`.
    fn flip_end(&mut self, detail: &FlipDetail) {
        let _ = detail;
    }

    /// Cancelable per-step checkpoint, carrying the transition record
    /// and the transient proxy. A veto skips this step's visual only;
    /// the logical position has already moved.
    fn step_start(
        &mut self,
        record: &TransitionRecord,
        proxy: NodeHandle,
    ) -> Decision {
        let _ = (record, proxy);
        Decision::Proceed
    }

    /// Non-cancelable per-step completion notification, fired before
    /// the transient proxy is removed.
    fn step_end(&mut self, record: &TransitionRecord) {
        let _ = record;
    }
}
