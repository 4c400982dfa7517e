use crate::{
    config::model::CaptureConfig,
    foundation::core::NodeId,
    scene::context::SceneContext,
};

/// Scene state saved at the start of a capture run and put back at the end.
///
/// Created by [`CaptureSession::begin`], consumed by [`CaptureSession::restore`]; exclusively owned
/// by one run.
#[derive(Debug)]
pub struct CaptureSession {
    previously_active_map: Option<NodeId>,
    hidden: Vec<(NodeId, bool)>,
}

impl CaptureSession {
    /// Remember the first map (in descriptor order) that is active in the scene, then hide the
    /// configured objects.
    ///
    /// The map is looked up first so a hidden ancestor does not make it read as inactive.
    pub fn begin<S: SceneContext + ?Sized>(config: &CaptureConfig, scene: &mut S) -> Self {
        let previously_active_map = config
            .maps
            .iter()
            .filter_map(|element| element.map.as_ref())
            .find(|map| scene.contains_node(map) && scene.is_active(map))
            .cloned();

        let mut hidden = Vec::new();
        for node in config.objects_to_hide.iter().flatten() {
            if !scene.contains_node(node) {
                continue;
            }
            hidden.push((node.clone(), scene.is_active_self(node)));
            scene.set_active(node, false);
        }

        tracing::debug!(
            hidden = hidden.len(),
            previously_active = ?previously_active_map,
            "capture session started"
        );

        Self {
            previously_active_map,
            hidden,
        }
    }

    /// The map that was active before the run, if any.
    pub fn previously_active_map(&self) -> Option<&NodeId> {
        self.previously_active_map.as_ref()
    }

    /// Reactivate the previously active map, then give every hidden object back its own active
    /// flag. Hidden objects are restored in reverse order so duplicates end up in their original
    /// state.
    pub fn restore<S: SceneContext + ?Sized>(self, scene: &mut S) {
        if let Some(map) = &self.previously_active_map {
            scene.set_active(map, true);
        }
        for (node, was_active) in self.hidden.iter().rev() {
            scene.set_active(node, *was_active);
        }
        tracing::debug!("capture session restored");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
