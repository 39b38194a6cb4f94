//! Session lifecycle: one renderer plus the block geometry negotiated at `init`.
//!
//! ```text
//! Uninitialized --init--> Active --(commands)--> Active
//!       |                   |
//!       +------clear--------+-----> Destroyed --init--> Active
//! ```

use crate::Sample;
use crate::audio_bridge::AudioBridge;
use crate::config::ParameterMap;
use crate::error::{BridgeError, Result};
use crate::renderer::Renderer;

pub struct Session<R: Renderer> {
    renderer: R,
    bridge: AudioBridge,
}

impl<R: Renderer> Session<R> {
    /// Create the renderer, load its reproduction setup, add `source_count`
    /// sources and activate it.
    pub fn start(source_count: usize, params: ParameterMap) -> Result<Self> {
        let mut info = String::from("Starting the renderer with following settings:\n");
        info.push_str(&format!(" * number of sources: {}\n", source_count));
        for (key, value) in params.iter() {
            info.push_str(&format!(" * {}: {}\n", key, value));
        }
        log::info!("{}", info.trim_end());

        let mut renderer = R::from_params(params)?;

        let block_size = renderer.block_size();
        if block_size == 0 {
            return Err(BridgeError::Engine(format!(
                "{} reported a block size of 0",
                renderer.name()
            )));
        }

        renderer.load_reproduction_setup()?;
        let out_channels = renderer.output_list().len();

        for _ in 0..source_count {
            renderer.add_source();
        }

        renderer.activate();

        log::info!(
            "Initialization of {} completed, {} outputs available.",
            renderer.name(),
            out_channels
        );

        Ok(Self {
            renderer,
            bridge: AudioBridge::new(block_size, source_count, out_channels),
        })
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn block_size(&self) -> usize {
        self.bridge.block_size()
    }

    /// Number of sources, which is also the number of input channels.
    pub fn in_channels(&self) -> usize {
        self.bridge.in_channels()
    }

    pub fn out_channels(&self) -> usize {
        self.bridge.out_channels()
    }

    pub fn process(&mut self, input: &[Sample]) -> Result<Vec<Sample>> {
        self.bridge.process(&mut self.renderer, input)
    }
}

pub enum SessionState<R: Renderer> {
    Uninitialized,
    Active(Session<R>),
    Destroyed,
}

impl<R: Renderer> Default for SessionState<R> {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl<R: Renderer> SessionState<R> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn session(&self) -> Option<&Session<R>> {
        match self {
            Self::Active(session) => Some(session),
            _ => None,
        }
    }

    /// The single gate for every command that needs a running renderer.
    pub fn require_active(&mut self) -> Result<&mut Session<R>> {
        match self {
            Self::Active(session) => Ok(session),
            _ => Err(BridgeError::Uninitialized),
        }
    }

    /// Start a new session, releasing any previous one first. On failure the
    /// state is left `Destroyed`.
    pub fn init(&mut self, source_count: usize, params: ParameterMap) -> Result<()> {
        if self.is_active() {
            log::info!("Releasing previous session before re-initialization");
        }
        *self = Self::Destroyed;
        *self = Self::Active(Session::start(source_count, params)?);
        Ok(())
    }

    /// Drop the session if there is one. Returns whether a session was active.
    pub fn clear(&mut self) -> bool {
        let was_active = self.is_active();
        *self = Self::Destroyed;
        if was_active {
            log::info!("Session cleared");
        }
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DirectMixRenderer;

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_require_active_before_init() {
        let mut state = SessionState::<DirectMixRenderer>::default();
        assert!(matches!(
            state.require_active(),
            Err(BridgeError::Uninitialized)
        ));
    }

    #[test]
    fn test_init_snapshots_block_geometry() {
        let mut state = SessionState::<DirectMixRenderer>::default();
        state
            .init(3, params(&[("block_size", "64"), ("loudspeakers", "5")]))
            .unwrap();

        let session = state.require_active().unwrap();
        assert_eq!(session.block_size(), 64);
        assert_eq!(session.in_channels(), 3);
        assert_eq!(session.out_channels(), 5);
        assert_eq!(session.renderer().scene().source_count(), 3);
        assert!(session.renderer().is_active());
    }

    #[test]
    fn test_reinit_replaces_scene() {
        let mut state = SessionState::<DirectMixRenderer>::default();
        state.init(4, ParameterMap::new()).unwrap();
        state.init(2, ParameterMap::new()).unwrap();

        let session = state.require_active().unwrap();
        let ids: Vec<u32> = session
            .renderer()
            .scene()
            .sources()
            .iter()
            .map(|s| s.id().get())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_failed_init_leaves_destroyed() {
        let mut state = SessionState::<DirectMixRenderer>::default();
        state.init(1, ParameterMap::new()).unwrap();
        assert!(state.init(1, params(&[("block_size", "-1")])).is_err());
        assert!(matches!(state, SessionState::Destroyed));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut state = SessionState::<DirectMixRenderer>::default();
        assert!(!state.clear());
        state.init(1, ParameterMap::new()).unwrap();
        assert!(state.clear());
        assert!(!state.clear());
        assert!(!state.is_active());
    }
}
