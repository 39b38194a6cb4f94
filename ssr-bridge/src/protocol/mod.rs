//! The chained command protocol.
//!
//! A call is a keyword followed by positional arguments. Scene and audio
//! commands can be chained, so one call may update source positions, mute a
//! source and process a block:
//!
//! ```text
//! out = bridge('source_position', xy, 'source_mute', mute, 'process', input)
//! ```
//!
//! Arguments are consumed left to right through an [`ArgCursor`]; results are
//! collected into [`OutputSlots`] and must fill exactly the slots the host
//! requested.

mod command;
mod cursor;
mod dispatcher;
mod handlers;
mod outputs;
mod value;

pub use command::{Command, help_text};
pub use cursor::ArgCursor;
pub use dispatcher::Dispatcher;
pub use outputs::OutputSlots;
pub use value::{Arg, Array, ArrayData};
