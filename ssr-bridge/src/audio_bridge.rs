//! Hand-off of one audio block between the host and the renderer.
//!
//! Blocks travel as flat column-major buffers: channel `i` occupies
//! `[i * block_size, (i + 1) * block_size)`.

use crate::Sample;
use crate::error::{BridgeError, Result};
use crate::renderer::Renderer;

/// Block geometry negotiated when the session was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioBridge {
    block_size: usize,
    in_channels: usize,
    out_channels: usize,
}

impl AudioBridge {
    pub fn new(block_size: usize, in_channels: usize, out_channels: usize) -> Self {
        Self {
            block_size,
            in_channels,
            out_channels,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Run one block through `renderer` and return the freshly allocated
    /// `block_size × out_channels` output.
    pub fn process<R: Renderer>(&self, renderer: &mut R, input: &[Sample]) -> Result<Vec<Sample>> {
        if self.block_size == 0 {
            return Err(BridgeError::Engine("Block size must not be 0".to_string()));
        }
        let expected = self.block_size * self.in_channels;
        if input.len() != expected {
            return Err(BridgeError::Engine(format!(
                "Input block holds {} samples, expected {}",
                input.len(),
                expected
            )));
        }

        let inputs: Vec<&[Sample]> = input.chunks_exact(self.block_size).collect();

        let mut output = vec![0.0 as Sample; self.block_size * self.out_channels];
        {
            let mut outputs: Vec<&mut [Sample]> = output.chunks_exact_mut(self.block_size).collect();
            renderer.audio_callback(self.block_size, &inputs, &mut outputs)?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterMap, RendererConfig};
    use crate::math::{Orientation, Position};
    use crate::renderer::Loudspeaker;
    use crate::scene::SceneState;

    /// Copies input channel `i % in` to output channel `i` and counts calls.
    struct Passthrough {
        scene: SceneState,
        outputs: Vec<Loudspeaker>,
        calls: usize,
    }

    impl Renderer for Passthrough {
        fn from_params(_params: ParameterMap) -> Result<Self> {
            let speaker = Loudspeaker {
                position: Position::default(),
                orientation: Orientation::default(),
            };
            Ok(Self {
                scene: SceneState::new(),
                outputs: vec![speaker; 3],
                calls: 0,
            })
        }

        fn name(&self) -> &str {
            "Passthrough"
        }

        fn block_size(&self) -> usize {
            RendererConfig::default().block_size
        }

        fn load_reproduction_setup(&mut self) -> Result<()> {
            Ok(())
        }

        fn output_list(&self) -> &[Loudspeaker] {
            &self.outputs
        }

        fn scene(&self) -> &SceneState {
            &self.scene
        }

        fn scene_mut(&mut self) -> &mut SceneState {
            &mut self.scene
        }

        fn activate(&mut self) {}

        fn audio_callback(
            &mut self,
            _block_size: usize,
            inputs: &[&[Sample]],
            outputs: &mut [&mut [Sample]],
        ) -> Result<()> {
            self.calls += 1;
            for (i, output) in outputs.iter_mut().enumerate() {
                output.copy_from_slice(inputs[i % inputs.len()]);
            }
            Ok(())
        }
    }

    #[test]
    fn test_channels_are_split_by_column() {
        let mut renderer = Passthrough::from_params(ParameterMap::new()).unwrap();
        let bridge = AudioBridge::new(2, 2, 3);

        let input: Vec<Sample> = vec![1.0, 2.0, 3.0, 4.0];
        let output = bridge.process(&mut renderer, &input).unwrap();

        assert_eq!(renderer.calls, 1);
        assert_eq!(output, vec![1.0, 2.0, 3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_wrong_input_length_skips_callback() {
        let mut renderer = Passthrough::from_params(ParameterMap::new()).unwrap();
        let bridge = AudioBridge::new(4, 2, 3);

        assert!(bridge.process(&mut renderer, &[0.0; 6]).is_err());
        assert_eq!(renderer.calls, 0);
    }
}
