use crate::foundation::core::{NodeId, ViewpointId};

/// Scene graph operations the capture orchestrator relies on.
///
/// A host (an editor, a game runtime, or [`crate::MemoryScene`] in tests and the CLI) exposes its
/// scene through this trait. Operations on ids that do not resolve are no-ops; callers check
/// [`SceneContext::contains_node`] / [`SceneContext::has_viewpoint`] first.
pub trait SceneContext {
    /// Whether `node` resolves to a node in this scene.
    fn contains_node(&self, node: &NodeId) -> bool;

    /// Whether `viewpoint` resolves to a renderable camera in this scene.
    fn has_viewpoint(&self, viewpoint: &ViewpointId) -> bool;

    /// The node's own active flag, ignoring its ancestors.
    fn is_active_self(&self, node: &NodeId) -> bool;

    /// Whether the node and all of its ancestors are active.
    fn is_active(&self, node: &NodeId) -> bool;

    /// Set the node's own active flag.
    fn set_active(&mut self, node: &NodeId, active: bool);

    /// Every particle emitter in the subtree rooted at `root` (root included), active or not,
    /// in depth-first order.
    fn find_particle_emitters(&self, root: &NodeId) -> Vec<NodeId>;

    /// Start (or keep) emitting.
    fn play_emitter(&mut self, emitter: &NodeId);

    /// Advance a playing emitter by `dt_secs` of simulated time.
    fn simulate_emitter(&mut self, emitter: &NodeId, dt_secs: f32);

    /// Stop emitting and clear every live particle.
    fn stop_emitter(&mut self, emitter: &NodeId);

    /// Recompute environment lighting and re-bake reflection probes from the current scene state.
    fn refresh_lighting(&mut self);
}
