//! The rendering engine as seen from the protocol.
//!
//! The bridge only needs a handful of operations from an engine: building it
//! from the host options, loading the reproduction setup, adding and looking
//! up sources, starting it, and running one audio block. [`Renderer`] captures
//! exactly that; [`DirectMixRenderer`] is a small engine shipped with the crate.

mod direct_mix;

pub use direct_mix::DirectMixRenderer;

use crate::Sample;
use crate::config::ParameterMap;
use crate::error::Result;
use crate::math::{Orientation, Position};
use crate::scene::{SceneState, Source, SourceId};

/// One output channel of the reproduction setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loudspeaker {
    pub position: Position,
    pub orientation: Orientation,
}

pub trait Renderer: Sized {
    /// Build an engine from the options passed to `init`.
    fn from_params(params: ParameterMap) -> Result<Self>;

    fn name(&self) -> &str;

    /// Fixed number of frames per channel in every block.
    fn block_size(&self) -> usize;

    fn load_reproduction_setup(&mut self) -> Result<()>;

    /// Outputs of the loaded reproduction setup, one per output channel.
    fn output_list(&self) -> &[Loudspeaker];

    fn scene(&self) -> &SceneState;

    fn scene_mut(&mut self) -> &mut SceneState;

    fn add_source(&mut self) -> SourceId {
        self.scene_mut().add_source()
    }

    fn get_source(&mut self, id: SourceId) -> Result<&mut Source> {
        self.scene_mut().get_source_mut(id)
    }

    /// Start processing. Blocks handed over before this produce silence.
    fn activate(&mut self);

    /// Render one block. `inputs` has one slice per source, `outputs` one per
    /// output channel; every slice holds `block_size` frames.
    fn audio_callback(
        &mut self,
        block_size: usize,
        inputs: &[&[Sample]],
        outputs: &mut [&mut [Sample]],
    ) -> Result<()>;
}
