use std::collections::HashMap;

use kurbo::{Point, Rect, Vec2};

use crate::{
    foundation::core::{NodeId, Rgb, ViewpointId},
    foundation::error::{CaptureError, CaptureResult},
    scene::context::SceneContext,
};

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Serializable description of a [`MemoryScene`].
pub struct SceneDef {
    /// Clear color behind every node.
    #[serde(default)]
    pub background: Rgb,
    /// Nodes in draw order. Parents may appear before or after their children.
    pub nodes: Vec<NodeDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One node of a [`SceneDef`] with its optional components.
pub struct NodeDef {
    /// Unique id.
    pub id: NodeId,
    /// Parent node, or `None` for a root.
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// The node's own active flag.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Flat footprint drawn by the renderer.
    #[serde(default)]
    pub shape: Option<ShapeDef>,
    /// Particle emitter component.
    #[serde(default)]
    pub emitter: Option<EmitterDef>,
    /// Camera component; makes the node usable as a viewpoint.
    #[serde(default)]
    pub camera: Option<CameraDef>,
    /// Light component contributing to ambient lighting while active.
    #[serde(default)]
    pub light: Option<LightDef>,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Axis-aligned filled rectangle in world units.
pub struct ShapeDef {
    /// World-space bounds.
    pub rect: Rect,
    /// Fill color.
    pub color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Particle emitter settings.
pub struct EmitterDef {
    /// Emitter origin in world units.
    pub position: Point,
    /// Particles emitted per simulated second.
    pub rate: f32,
    /// Upper bound on live particles.
    #[serde(default = "default_max_particles")]
    pub max_particles: u32,
    /// Radius of the disc particles are spread over.
    #[serde(default = "default_spread")]
    pub spread: f64,
    /// Edge length of one particle square.
    #[serde(default = "default_particle_size")]
    pub size: f64,
    /// Particle color.
    pub color: Rgb,
}

fn default_max_particles() -> u32 {
    64
}

fn default_spread() -> f64 {
    8.0
}

fn default_particle_size() -> f64 {
    2.0
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Orthographic top-down camera.
pub struct CameraDef {
    /// World point mapped to the image center.
    pub center: Point,
    /// World units covered by the image height.
    pub view_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Light component.
pub struct LightDef {
    /// Contribution to ambient intensity.
    pub intensity: f32,
}

impl NodeDef {
    /// A bare, active root node.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            parent: None,
            active: true,
            shape: None,
            emitter: None,
            camera: None,
            light: None,
        }
    }

    /// Attach to a parent node.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(NodeId::new(parent));
        self
    }

    /// Start with the node's own active flag cleared.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Add a rectangle footprint.
    pub fn shape(mut self, rect: Rect, color: Rgb) -> Self {
        self.shape = Some(ShapeDef { rect, color });
        self
    }

    /// Add a particle emitter.
    pub fn emitter(mut self, emitter: EmitterDef) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Add a camera.
    pub fn camera(mut self, center: Point, view_height: f64) -> Self {
        self.camera = Some(CameraDef {
            center,
            view_height,
        });
        self
    }

    /// Add a light.
    pub fn light(mut self, intensity: f32) -> Self {
        self.light = Some(LightDef { intensity });
        self
    }
}

impl EmitterDef {
    /// Emitter at `position` with default spread, size and cap.
    pub fn new(position: Point, rate: f32, color: Rgb) -> Self {
        Self {
            position,
            rate,
            max_particles: default_max_particles(),
            spread: default_spread(),
            size: default_particle_size(),
            color,
        }
    }
}

/// Builder for [`MemoryScene`].
#[derive(Debug, Default)]
pub struct SceneBuilder {
    background: Rgb,
    nodes: Vec<NodeDef>,
}

impl SceneBuilder {
    /// Empty scene with a black background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clear color.
    pub fn background(mut self, color: Rgb) -> Self {
        self.background = color;
        self
    }

    /// Append a node.
    pub fn node(mut self, node: NodeDef) -> Self {
        self.nodes.push(node);
        self
    }

    /// Validate and build.
    pub fn build(self) -> CaptureResult<MemoryScene> {
        MemoryScene::from_def(SceneDef {
            background: self.background,
            nodes: self.nodes,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct EmitterState {
    playing: bool,
    elapsed: f32,
    particles: u32,
}

#[derive(Clone, Debug)]
struct SceneNode {
    def: NodeDef,
    parent: Option<usize>,
    children: Vec<usize>,
    emitter: EmitterState,
}

/// In-memory scene graph implementing [`SceneContext`].
///
/// Nodes carry optional flat shapes, particle emitters, cameras and lights; enough for
/// [`crate::FlatRenderer`] to produce meaningful captures without a real engine.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(try_from = "SceneDef")]
pub struct MemoryScene {
    background: Rgb,
    nodes: Vec<SceneNode>,
    index: HashMap<NodeId, usize>,
    ambient: f32,
    lighting_refreshes: u64,
}

impl TryFrom<SceneDef> for MemoryScene {
    type Error = CaptureError;

    fn try_from(def: SceneDef) -> CaptureResult<Self> {
        Self::from_def(def)
    }
}

impl MemoryScene {
    /// Validate a scene description and build the graph.
    pub fn from_def(def: SceneDef) -> CaptureResult<Self> {
        let mut index = HashMap::with_capacity(def.nodes.len());
        for (i, node) in def.nodes.iter().enumerate() {
            validate_node(node)?;
            if index.insert(node.id.clone(), i).is_some() {
                return Err(CaptureError::validation(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }

        let mut nodes: Vec<SceneNode> = def
            .nodes
            .into_iter()
            .map(|def| SceneNode {
                def,
                parent: None,
                children: Vec::new(),
                emitter: EmitterState::default(),
            })
            .collect();

        for i in 0..nodes.len() {
            let Some(parent_id) = nodes[i].def.parent.clone() else {
                continue;
            };
            let p = *index.get(&parent_id).ok_or_else(|| {
                CaptureError::validation(format!(
                    "node '{}' references missing parent '{}'",
                    nodes[i].def.id, parent_id
                ))
            })?;
            nodes[i].parent = Some(p);
            nodes[p].children.push(i);
        }

        for start in 0..nodes.len() {
            let mut cur = nodes[start].parent;
            let mut steps = 0usize;
            while let Some(p) = cur {
                steps += 1;
                if p == start || steps > nodes.len() {
                    return Err(CaptureError::validation(format!(
                        "node '{}' is part of a parent cycle",
                        nodes[start].def.id
                    )));
                }
                cur = nodes[p].parent;
            }
        }

        Ok(Self {
            background: def.background,
            nodes,
            index,
            ambient: 1.0,
            lighting_refreshes: 0,
        })
    }

    /// Clear color.
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Ambient intensity computed by the last [`SceneContext::refresh_lighting`] call.
    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    /// How many times lighting has been refreshed.
    pub fn lighting_refreshes(&self) -> u64 {
        self.lighting_refreshes
    }

    /// Node descriptions in draw order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDef> {
        self.nodes.iter().map(|n| &n.def)
    }

    /// Look up a node description.
    pub fn node(&self, id: &NodeId) -> Option<&NodeDef> {
        self.index.get(id).map(|&i| &self.nodes[i].def)
    }

    /// Camera settings of a viewpoint.
    pub fn camera(&self, viewpoint: &ViewpointId) -> Option<&CameraDef> {
        let i = *self.index.get(&NodeId::new(viewpoint.as_str()))?;
        self.nodes[i].def.camera.as_ref()
    }

    /// Live particle count of an emitter node (0 for anything else).
    pub fn particle_count(&self, emitter: &NodeId) -> u32 {
        self.index
            .get(emitter)
            .map(|&i| self.nodes[i].emitter.particles)
            .unwrap_or(0)
    }

    /// Whether an emitter node is currently playing.
    pub fn is_emitting(&self, emitter: &NodeId) -> bool {
        self.index
            .get(emitter)
            .is_some_and(|&i| self.nodes[i].emitter.playing)
    }

    /// World positions of the live particles of an emitter node.
    ///
    /// Particles fill a golden-angle spiral over the emitter's spread disc, so the layout only
    /// depends on the live count.
    pub fn particle_positions(&self, emitter: &NodeId) -> Vec<Point> {
        let Some(&i) = self.index.get(emitter) else {
            return Vec::new();
        };
        let node = &self.nodes[i];
        let Some(em) = node.def.emitter.as_ref() else {
            return Vec::new();
        };
        let max = f64::from(em.max_particles.max(1));
        (0..node.emitter.particles)
            .map(|k| {
                let k = f64::from(k);
                let r = em.spread * ((k + 0.5) / max).sqrt();
                let theta = k * GOLDEN_ANGLE;
                em.position + Vec2::new(r * theta.cos(), r * theta.sin())
            })
            .collect()
    }

    fn active_in_hierarchy(&self, i: usize) -> bool {
        let mut cur = Some(i);
        while let Some(n) = cur {
            if !self.nodes[n].def.active {
                return false;
            }
            cur = self.nodes[n].parent;
        }
        true
    }

    /// Nodes active in the hierarchy, in draw order.
    pub(crate) fn visible_nodes(&self) -> impl Iterator<Item = &NodeDef> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.active_in_hierarchy(*i))
            .map(|(_, n)| &n.def)
    }

    fn emitter_mut(&mut self, emitter: &NodeId) -> Option<(EmitterDef, &mut EmitterState)> {
        let i = *self.index.get(emitter)?;
        let node = &mut self.nodes[i];
        let def = node.def.emitter?;
        Some((def, &mut node.emitter))
    }
}

fn validate_node(node: &NodeDef) -> CaptureResult<()> {
    if node.id.as_str().trim().is_empty() {
        return Err(CaptureError::validation("node id must be non-empty"));
    }
    if let Some(shape) = &node.shape {
        let r = shape.rect;
        if ![r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) {
            return Err(CaptureError::validation(format!(
                "node '{}' shape rect must be finite",
                node.id
            )));
        }
    }
    if let Some(em) = &node.emitter {
        if !em.rate.is_finite() || em.rate < 0.0 {
            return Err(CaptureError::validation(format!(
                "node '{}' emitter rate must be finite and >= 0",
                node.id
            )));
        }
        if !em.spread.is_finite() || em.spread < 0.0 || !em.size.is_finite() || em.size <= 0.0 {
            return Err(CaptureError::validation(format!(
                "node '{}' emitter spread must be >= 0 and size > 0",
                node.id
            )));
        }
    }
    if let Some(cam) = &node.camera
        && (!cam.view_height.is_finite() || cam.view_height <= 0.0)
    {
        return Err(CaptureError::validation(format!(
            "node '{}' camera view_height must be finite and > 0",
            node.id
        )));
    }
    if let Some(light) = &node.light
        && (!light.intensity.is_finite() || light.intensity < 0.0)
    {
        return Err(CaptureError::validation(format!(
            "node '{}' light intensity must be finite and >= 0",
            node.id
        )));
    }
    Ok(())
}

impl SceneContext for MemoryScene {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.index.contains_key(node)
    }

    fn has_viewpoint(&self, viewpoint: &ViewpointId) -> bool {
        self.camera(viewpoint).is_some()
    }

    fn is_active_self(&self, node: &NodeId) -> bool {
        self.index
            .get(node)
            .is_some_and(|&i| self.nodes[i].def.active)
    }

    fn is_active(&self, node: &NodeId) -> bool {
        self.index
            .get(node)
            .is_some_and(|&i| self.active_in_hierarchy(i))
    }

    fn set_active(&mut self, node: &NodeId, active: bool) {
        if let Some(&i) = self.index.get(node) {
            self.nodes[i].def.active = active;
        }
    }

    fn find_particle_emitters(&self, root: &NodeId) -> Vec<NodeId> {
        let Some(&root) = self.index.get(root) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            if node.def.emitter.is_some() {
                out.push(node.def.id.clone());
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn play_emitter(&mut self, emitter: &NodeId) {
        if let Some((_, state)) = self.emitter_mut(emitter) {
            state.playing = true;
        }
    }

    fn simulate_emitter(&mut self, emitter: &NodeId, dt_secs: f32) {
        let Some((def, state)) = self.emitter_mut(emitter) else {
            return;
        };
        if !state.playing || !dt_secs.is_finite() || dt_secs <= 0.0 {
            return;
        }
        state.elapsed += dt_secs;
        let emitted = (def.rate * state.elapsed).ceil().max(0.0);
        state.particles = (emitted as u32).min(def.max_particles);
    }

    fn stop_emitter(&mut self, emitter: &NodeId) {
        if let Some((_, state)) = self.emitter_mut(emitter) {
            *state = EmitterState::default();
        }
    }

    fn refresh_lighting(&mut self) {
        let mut lit = false;
        let mut total = 0.0f32;
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(light) = node.def.light
                && self.active_in_hierarchy(i)
            {
                lit = true;
                total += light.intensity;
            }
        }
        self.ambient = if lit { total } else { 1.0 };
        self.lighting_refreshes += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/memory.rs"]
mod tests;
