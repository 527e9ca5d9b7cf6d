use spatialplane_common::{Color, NodeId};
use std::collections::BTreeMap;

use crate::scene::{Scene, SceneError};

/// Seconds for each half of the highlight (fade to red, fade back).
pub const HIGHLIGHT_FADE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    FadeIn { from: Color, elapsed: f32 },
    FadeOut { elapsed: f32 },
}

/// Timed emission highlight for tapped nodes.
///
/// A highlight animates the node's emission to `color` over `fade` seconds,
/// then back to `rest` over the same duration. Time only moves when
/// [`Highlighter::advance`] is called.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pub color: Color,
    pub rest: Color,
    pub fade: f32,
    active: BTreeMap<NodeId, Phase>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            color: Color::RED,
            rest: Color::BLACK,
            fade: HIGHLIGHT_FADE,
            active: BTreeMap::new(),
        }
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin highlighting `id`. Restarts the fade-in from the current color if
    /// the node is already highlighted.
    pub fn start(&mut self, scene: &Scene, id: NodeId) -> Result<(), SceneError> {
        let node = scene.node(id).ok_or(SceneError::NodeNotFound(id))?;
        let geometry = node.geometry.as_ref().ok_or(SceneError::NoGeometry(id))?;
        tracing::debug!(id = %id.short(), "highlight started");
        self.active.insert(
            id,
            Phase::FadeIn {
                from: geometry.material.emission,
                elapsed: 0.0,
            },
        );
        Ok(())
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Advance every running highlight by `dt` seconds and write the
    /// resulting emission colors into the scene.
    pub fn advance(&mut self, scene: &mut Scene, dt: f32) -> Result<(), SceneError> {
        let mut finished = Vec::new();
        for (&id, phase) in self.active.iter_mut() {
            let mut remaining = dt;
            let color = loop {
                match *phase {
                    Phase::FadeIn { from, elapsed } => {
                        let elapsed = elapsed + remaining;
                        if elapsed < self.fade {
                            *phase = Phase::FadeIn { from, elapsed };
                            break from.lerp(self.color, elapsed / self.fade);
                        }
                        // Completion: carry leftover time into the fade-out.
                        remaining = elapsed - self.fade;
                        *phase = Phase::FadeOut { elapsed: 0.0 };
                    }
                    Phase::FadeOut { elapsed } => {
                        let elapsed = elapsed + remaining;
                        if elapsed < self.fade {
                            *phase = Phase::FadeOut { elapsed };
                            break self.color.lerp(self.rest, elapsed / self.fade);
                        }
                        finished.push(id);
                        break self.rest;
                    }
                }
            };
            scene.set_emission(id, color)?;
        }
        for id in finished {
            tracing::trace!(id = %id.short(), "highlight finished");
            self.active.remove(&id);
        }
        Ok(())
    }
}
