//! Rendering boundary between the engine and the host scene graph.
//!
//! The engine never draws pixels. It asks the host for disposable nodes
//! through [`FlipRenderer`], stages them into a [`FlipStage`], and hands
//! both to the host together with a [`FlipGeometry`] payload. The host
//! is free to render with CSS keyframes, a canvas, or anything else.

use glam::Vec2;

use crate::candidate::Candidate;
use crate::geometry::FlipGeometry;

/// Opaque handle to a host-owned disposable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// The disposable node set staged for one step's visual.
///
/// All handles live under the transient proxy and are owned by the
/// engine for the duration of the step; removing the proxy removes the
/// whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipStage {
    /// The transient proxy attached to the host container. At most one
    /// proxy exists per container at any time.
    pub proxy: NodeHandle,
    /// Clone of the incoming candidate's rendered subtree.
    pub incoming: NodeHandle,
    /// Clone of the outgoing candidate; `None` on the initial flip.
    pub outgoing: Option<NodeHandle>,
    /// Static clone of the outgoing candidate used as the background
    /// mask once the rotation passes the midpoint.
    pub background: Option<NodeHandle>,
}

/// Host rendering capability consumed by the engine.
///
/// Implementations wrap the real scene graph: DOM nodes, retained-mode
/// widgets, terminal cells. Handles returned here are only ever passed
/// back into the same renderer.
pub trait FlipRenderer {
    /// Disposable snapshot clone of a candidate's rendered subtree.
    ///
    /// Content, not identity: mutations to the clone must not affect the
    /// original. Pixel-copying canvas-like content is the host's
    /// implementation detail.
    fn clone_candidate(&mut self, candidate: &Candidate) -> NodeHandle;

    /// Create a disposable off-tree container node.
    fn create_node(&mut self) -> NodeHandle;

    /// Attach `child` under `parent`.
    fn attach(&mut self, parent: NodeHandle, child: NodeHandle);

    /// Attach a node directly under the host container.
    fn attach_to_container(&mut self, node: NodeHandle);

    /// Remove a node and its subtree from the host.
    fn remove(&mut self, node: NodeHandle);

    /// Current container extent in host units, used to derive
    /// perspective when the policy has no explicit override.
    fn container_size(&self) -> Vec2;

    /// Hand the staged nodes and geometry to the visual layer.
    ///
    /// Called once per non-vetoed step, after the stage is fully
    /// assembled. The engine observes completion by clock - see
    /// [`FlipAnimation`](crate::animation::FlipAnimation).
    fn present(&mut self, stage: &FlipStage, geometry: &FlipGeometry);
}
