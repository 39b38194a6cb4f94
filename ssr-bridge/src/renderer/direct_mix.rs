use super::{Loudspeaker, Renderer};
use crate::Sample;
use crate::config::{ParameterMap, RendererConfig};
use crate::error::{BridgeError, Result};
use crate::math::{Orientation, Position};
use crate::scene::{SceneState, Source, SourceModel};

/// Minimal renderer that mixes every audible source into a circular
/// loudspeaker array.
///
/// Each loudspeaker receives a source with gain `max(0, cos α)`, where α is the
/// angle between the loudspeaker and the direction the source is heard from in
/// the listener's frame. Plane waves are heard from the opposite of their
/// orientation; every other model from its position.
pub struct DirectMixRenderer {
    config: RendererConfig,
    scene: SceneState,
    loudspeakers: Vec<Loudspeaker>,
    active: bool,
    gains: Vec<f32>,
}

impl DirectMixRenderer {
    pub fn new(config: RendererConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Creating {} renderer (sample_rate: {} Hz, block_size: {})",
            config.name,
            config.sample_rate,
            config.block_size
        );
        Ok(Self {
            config,
            scene: SceneState::new(),
            loudspeakers: Vec::new(),
            active: false,
            gains: Vec::new(),
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn incidence_direction(&self, source: &Source) -> Position {
        let reference = &self.scene.reference;
        let mut direction = match source.model {
            SourceModel::Plane => source.orientation.look_vector().negated(),
            _ => source.position.subtract(reference.position),
        };
        direction.rotate(-reference.orientation.azimuth, 0.0);
        direction
    }

    fn update_gains(&mut self, source: &Source) {
        let direction = self.incidence_direction(source);
        let count = self.loudspeakers.len();

        self.gains.clear();
        if direction.length() == 0.0 {
            self.gains.resize(count, 1.0 / count as f32);
            return;
        }
        // cos α without the acos round trip
        let length = direction.length();
        self.gains.extend(self.loudspeakers.iter().map(|speaker| {
            let cosine = direction.dot(&speaker.position) / (length * speaker.position.length());
            cosine.clamp(-1.0, 1.0).max(0.0)
        }));
    }
}

impl Renderer for DirectMixRenderer {
    fn from_params(params: ParameterMap) -> Result<Self> {
        Self::new(RendererConfig::from_params(&params)?)
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn block_size(&self) -> usize {
        self.config.block_size
    }

    fn load_reproduction_setup(&mut self) -> Result<()> {
        let count = self.config.loudspeakers;
        self.loudspeakers = (0..count)
            .map(|i| {
                let azimuth = 360.0 * i as f32 / count as f32;
                let mut position = Position::from_xy(self.config.array_radius, 0.0);
                position.rotate(azimuth, 0.0);
                Loudspeaker {
                    position,
                    orientation: Orientation::from_azimuth(azimuth + 180.0),
                }
            })
            .collect();
        self.gains = Vec::with_capacity(count);

        log::info!(
            "Loaded reproduction setup: {} loudspeakers on a circle of radius {} m",
            count,
            self.config.array_radius
        );
        Ok(())
    }

    fn output_list(&self) -> &[Loudspeaker] {
        &self.loudspeakers
    }

    fn scene(&self) -> &SceneState {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    fn activate(&mut self) {
        self.active = true;
        log::debug!("{} renderer activated", self.config.name);
    }

    fn audio_callback(
        &mut self,
        block_size: usize,
        inputs: &[&[Sample]],
        outputs: &mut [&mut [Sample]],
    ) -> Result<()> {
        if block_size != self.config.block_size {
            return Err(BridgeError::Engine(format!(
                "Block size {} does not match configured block size {}",
                block_size, self.config.block_size
            )));
        }
        if inputs.len() != self.scene.source_count() || outputs.len() != self.loudspeakers.len() {
            return Err(BridgeError::Engine(format!(
                "Expected {} inputs and {} outputs, got {} and {}",
                self.scene.source_count(),
                self.loudspeakers.len(),
                inputs.len(),
                outputs.len()
            )));
        }

        for output in outputs.iter_mut() {
            output.fill(0.0);
        }

        if !self.active {
            log::warn!("Audio callback before activation, writing silence");
            return Ok(());
        }

        for index in 0..self.scene.source_count() {
            let source = self.scene.sources()[index].clone();
            if source.mute {
                continue;
            }
            self.update_gains(&source);

            for (output, &gain) in outputs.iter_mut().zip(self.gains.iter()) {
                if gain == 0.0 {
                    continue;
                }
                let gain = Sample::from(gain);
                for (out, &sample) in output.iter_mut().zip(inputs[index].iter()) {
                    *out += gain * sample;
                }
            }
        }

        Ok(())
    }
}
