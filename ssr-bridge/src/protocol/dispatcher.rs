use super::command::{Command, help_text};
use super::cursor::ArgCursor;
use super::handlers;
use super::outputs::OutputSlots;
use super::value::{Arg, Array};
use crate::config::ParameterMap;
use crate::error::{BridgeError, Result};
use crate::events::BridgeEvent;
use crate::renderer::Renderer;
use crate::session::{Session, SessionState};
use crossbeam_channel::{Receiver, Sender};

/// Entry point for host calls.
///
/// A dispatcher owns at most one session and turns each call (a keyword plus
/// positional arguments) into scene changes, queries or a block exchange.
/// Calls are synchronous; `&mut self` keeps them exclusive.
///
/// # Example
///
/// ```
/// use ssr_bridge::protocol::{Arg, Array, Dispatcher};
/// use ssr_bridge::renderer::DirectMixRenderer;
/// use std::collections::BTreeMap;
///
/// let mut bridge = Dispatcher::<DirectMixRenderer>::new("ssr_dm");
/// let mut options = BTreeMap::new();
/// options.insert("block_size".to_string(), "64".to_string());
///
/// bridge
///     .execute(&["init".into(), Array::scalar(2.0).into(), options.into()], 0)
///     .unwrap();
/// let block_size = bridge.execute(&[Arg::from("block_size")], 1).unwrap();
/// assert_eq!(block_size[0].as_scalar(), Some(64.0));
/// ```
pub struct Dispatcher<R: Renderer> {
    name: String,
    state: SessionState<R>,
    event_sender: Sender<BridgeEvent>,
    event_receiver: Receiver<BridgeEvent>,
}

impl<R: Renderer> Dispatcher<R> {
    /// `name` is the host-side function name used in the help text.
    pub fn new(name: impl Into<String>) -> Self {
        let (event_sender, event_receiver) = crossbeam_channel::unbounded();
        Self {
            name: name.into(),
            state: SessionState::default(),
            event_sender,
            event_receiver,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &SessionState<R> {
        &self.state
    }

    pub fn session(&self) -> Option<&Session<R>> {
        self.state.session()
    }

    /// Drain the events produced since the last poll.
    pub fn poll_events(&self) -> Vec<BridgeEvent> {
        self.event_receiver.try_iter().collect()
    }

    /// Run one host call. `requested_outputs` is the number of result slots
    /// the host asked for; on success exactly that many results are
    /// returned, except that `block_size` and `out_channels` always produce
    /// their value.
    ///
    /// Commands before a failing one in a chain keep their effect.
    pub fn execute(&mut self, args: &[Arg], requested_outputs: usize) -> Result<Vec<Array>> {
        let mut outputs = OutputSlots::new(requested_outputs);
        if args.is_empty() {
            self.help(&ArgCursor::new(args), &outputs)?;
            return Ok(Vec::new());
        }

        let mut cursor = ArgCursor::new(args);
        let keyword = cursor.take_text("First argument must be a string (e.g. 'help')!")?;
        let command: Command = keyword.parse()?;
        log::debug!("Dispatching '{}' ({} arguments)", keyword, cursor.remaining());

        match command {
            Command::Help => self.help(&cursor, &outputs)?,
            Command::Init => self.init(&mut cursor, &outputs)?,
            Command::BlockSize => {
                let block_size = self.state.require_active()?.block_size();
                cursor.expect_end("block_size")?;
                outputs.expect_at_most_one("block_size")?;
                outputs.push(Array::scalar(block_size as f64));
            }
            Command::OutChannels => {
                let out_channels = self.state.require_active()?.out_channels();
                cursor.expect_end("out_channels")?;
                outputs.expect_at_most_one("out_channels")?;
                outputs.push(Array::scalar(out_channels as f64));
            }
            Command::Clear => {
                cursor.expect_end("clear")?;
                outputs.expect_none("clear")?;
                if self.state.clear() {
                    self.emit(BridgeEvent::SessionCleared)?;
                }
            }
            chained => {
                self.run_chain(chained, &mut cursor, &mut outputs)?;
                outputs.finish_chain()?;
            }
        }

        Ok(outputs.into_values())
    }

    fn run_chain(
        &mut self,
        first: Command,
        cursor: &mut ArgCursor<'_>,
        outputs: &mut OutputSlots,
    ) -> Result<()> {
        let mut command = first;
        loop {
            let session = self.state.require_active()?;
            match command {
                Command::SourcePosition => {
                    handlers::source_position(session, cursor, &self.event_sender)?
                }
                Command::SourceOrientation => {
                    handlers::source_orientation(session, cursor, &self.event_sender)?
                }
                Command::SourceMute => handlers::source_mute(session, cursor, &self.event_sender)?,
                Command::SourceModel => handlers::source_model(session, cursor)?,
                Command::ReferencePosition => {
                    handlers::reference_position(session, cursor, &self.event_sender)?
                }
                Command::ReferenceOrientation => {
                    handlers::reference_orientation(session, cursor, &self.event_sender)?
                }
                Command::Process => handlers::process(session, cursor, outputs, &self.event_sender)?,
                Command::Help
                | Command::Init
                | Command::BlockSize
                | Command::OutChannels
                | Command::Clear => {
                    return Err(BridgeError::usage(format!(
                        "'{}' can't be used in a chained command!",
                        command
                    )));
                }
            }

            if cursor.is_empty() {
                return Ok(());
            }
            let keyword = cursor.take_text("Too many arguments (or missing command string)!")?;
            command = keyword.parse()?;
            log::debug!("Chaining '{}'", keyword);
        }
    }

    fn help(&self, cursor: &ArgCursor<'_>, outputs: &OutputSlots) -> Result<()> {
        outputs.expect_none("help")?;
        cursor.expect_end("help")?;
        println!("{}", help_text(&self.name));
        Ok(())
    }

    fn init(&mut self, cursor: &mut ArgCursor<'_>, outputs: &OutputSlots) -> Result<()> {
        outputs.expect_none("init")?;
        let source_count = cursor
            .take()
            .and_then(Arg::as_array)
            .and_then(|a| a.as_count())
            .ok_or_else(|| {
                BridgeError::usage("First argument to 'init' must be the number of sources!")
            })?;
        let options = cursor.take().and_then(Arg::as_struct).ok_or_else(|| {
            BridgeError::usage("Second argument to 'init' must be a scalar structure!")
        })?;
        cursor.expect_end("init")?;

        self.state
            .init(source_count, ParameterMap::from(options.clone()))?;

        if let Some(session) = self.state.session() {
            let event = BridgeEvent::SessionStarted {
                sources: session.in_channels(),
                block_size: session.block_size(),
                out_channels: session.out_channels(),
            };
            self.emit(event)?;
        }
        Ok(())
    }

    fn emit(&self, event: BridgeEvent) -> Result<()> {
        self.event_sender
            .send(event)
            .map_err(|e| BridgeError::Engine(format!("Failed to send bridge event: {}", e)))
    }
}
