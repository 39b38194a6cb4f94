//! Scene state shared between the protocol and the renderer.
//!
//! A scene holds the sources, addressed by 1-based [`SourceId`], and a single
//! [`Reference`] pose for the listener. Renderers own a `SceneState` and hand it
//! out through [`Renderer::scene_mut`](crate::renderer::Renderer::scene_mut).

mod source;

pub use source::{Source, SourceId, SourceModel};

use crate::error::{BridgeError, Result};
use crate::math::{Orientation, Position};

/// Listener pose (position + orientation).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reference {
    pub position: Position,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Default)]
pub struct SceneState {
    sources: Vec<Source>,
    pub reference: Reference,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; ids are handed out in order starting at 1.
    pub fn add_source(&mut self) -> SourceId {
        let id = SourceId::from_index(self.sources.len());
        self.sources.push(Source::new(id));
        log::debug!("Added source {}", id);
        id
    }

    pub fn get_source(&self, id: SourceId) -> Result<&Source> {
        self.sources
            .get(id.index())
            .ok_or(BridgeError::SourceNotFound(id))
    }

    pub fn get_source_mut(&mut self, id: SourceId) -> Result<&mut Source> {
        self.sources
            .get_mut(id.index())
            .ok_or(BridgeError::SourceNotFound(id))
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup_sources() {
        let mut scene = SceneState::new();
        let first = scene.add_source();
        let second = scene.add_source();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(scene.source_count(), 2);

        scene.get_source_mut(second).unwrap().mute = true;
        assert!(scene.get_source(second).unwrap().mute);
        assert!(!scene.get_source(first).unwrap().mute);
    }

    #[test]
    fn test_lookup_missing_source() {
        let mut scene = SceneState::new();
        scene.add_source();
        let missing = SourceId::new(2).unwrap();
        assert_eq!(
            scene.get_source_mut(missing).unwrap_err(),
            BridgeError::SourceNotFound(missing)
        );
    }

    #[test]
    fn test_reference_defaults_to_origin() {
        let scene = SceneState::new();
        assert_eq!(scene.reference, Reference::default());
        assert_eq!(scene.reference.position, Position::new(0.0, 0.0, 0.0));
    }
}
