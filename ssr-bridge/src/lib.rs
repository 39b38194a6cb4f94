//! # SSR Bridge
//!
//! A control-plane bridge that lets an external host drive a block-based
//! spatial audio renderer through textual, chainable commands.
//!
//! The host owns the audio: it hands over one block of source signals per call
//! and gets the rendered loudspeaker signals back. In between, the same call
//! can move sources, mute them, switch their source model, or move the
//! listener.
//!
//! ## Quick Start
//!
//! ```
//! use ssr_bridge::protocol::{Arg, Array, Dispatcher};
//! use ssr_bridge::renderer::DirectMixRenderer;
//! use ssr_bridge::{BridgeEvent, Sample};
//! use std::collections::BTreeMap;
//!
//! let mut bridge = Dispatcher::<DirectMixRenderer>::new("ssr_dm");
//!
//! // Two sources, 64-frame blocks, four loudspeakers
//! let options: BTreeMap<String, String> = [("block_size", "64"), ("loudspeakers", "4")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! bridge.execute(&["init".into(), Array::scalar(2.0).into(), options.into()], 0)?;
//!
//! // Place both sources, then render one block in the same call
//! let positions = Array::from_rows(&[[1.0, -1.0], [2.0, 2.0]])?;
//! let input = vec![0.1 as Sample; 64 * 2];
//! # #[cfg(not(feature = "double-precision"))]
//! let block = Array::single(64, 2, input)?;
//! # #[cfg(feature = "double-precision")]
//! # let block = Array::double(64, 2, input)?;
//! let out = bridge.execute(
//!     &[
//!         Arg::from("source_position"),
//!         positions.into(),
//!         "process".into(),
//!         block.into(),
//!     ],
//!     1,
//! )?;
//! assert_eq!((out[0].rows(), out[0].cols()), (64, 4));
//!
//! for event in bridge.poll_events() {
//!     if let BridgeEvent::SourcePositionChanged { source_id, new_position, .. } = event {
//!         println!("source {} moved to {}", source_id, new_position);
//!     }
//! }
//! # Ok::<(), ssr_bridge::BridgeError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`Dispatcher`](protocol::Dispatcher)**: entry point for host calls, owns the session
//! - **[`Renderer`](renderer::Renderer)**: the engine seen from the bridge
//! - **[`DirectMixRenderer`](renderer::DirectMixRenderer)**: small amplitude-panning engine
//! - **[`AudioBridge`]**: block hand-off between host buffers and the engine callback
//! - **[`Position`] / [`Orientation`]**: geometry used for sources and the listener
//! - **[`BridgeEvent`]**: scene changes reported after each call
//!
//! ## Features
//!
//! - `double-precision`: use `f64` samples instead of `f32`. `process` only
//!   accepts input of the compiled precision.

pub mod audio_bridge;
pub mod config;
pub mod error;
pub mod events;
pub mod math;
pub mod protocol;
pub mod renderer;
pub mod scene;
pub mod session;

pub use audio_bridge::AudioBridge;
pub use config::{ParameterMap, RendererConfig};
pub use error::{BridgeError, Result};
pub use events::BridgeEvent;
pub use math::{Orientation, Position};
pub use renderer::Renderer;
pub use scene::{Reference, SceneState, Source, SourceId, SourceModel};
pub use session::{Session, SessionState};

#[cfg(not(feature = "double-precision"))]
pub type Sample = f32;

#[cfg(feature = "double-precision")]
pub type Sample = f64;

/// Name of the compiled sample precision, as used in error messages.
#[cfg(not(feature = "double-precision"))]
pub const SAMPLE_PRECISION: &str = "single";

#[cfg(feature = "double-precision")]
pub const SAMPLE_PRECISION: &str = "double";
