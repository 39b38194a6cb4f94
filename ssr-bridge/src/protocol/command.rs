use crate::error::BridgeError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Init,
    BlockSize,
    OutChannels,
    /// Also reachable as `free` and `delete`.
    Clear,
    SourcePosition,
    SourceOrientation,
    SourceMute,
    SourceModel,
    ReferencePosition,
    ReferenceOrientation,
    Process,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Help,
        Command::Init,
        Command::BlockSize,
        Command::OutChannels,
        Command::Clear,
        Command::SourcePosition,
        Command::SourceOrientation,
        Command::SourceMute,
        Command::SourceModel,
        Command::ReferencePosition,
        Command::ReferenceOrientation,
        Command::Process,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Init => "init",
            Command::BlockSize => "block_size",
            Command::OutChannels => "out_channels",
            Command::Clear => "clear",
            Command::SourcePosition => "source_position",
            Command::SourceOrientation => "source_orientation",
            Command::SourceMute => "source_mute",
            Command::SourceModel => "source_model",
            Command::ReferencePosition => "reference_position",
            Command::ReferenceOrientation => "reference_orientation",
            Command::Process => "process",
        }
    }
}

impl FromStr for Command {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Command::Help),
            "init" => Ok(Command::Init),
            "block_size" => Ok(Command::BlockSize),
            "out_channels" => Ok(Command::OutChannels),
            "clear" | "free" | "delete" => Ok(Command::Clear),
            "source_position" => Ok(Command::SourcePosition),
            "source_orientation" => Ok(Command::SourceOrientation),
            "source_mute" => Ok(Command::SourceMute),
            "source_model" => Ok(Command::SourceModel),
            "reference_position" => Ok(Command::ReferencePosition),
            "reference_orientation" => Ok(Command::ReferenceOrientation),
            "process" => Ok(Command::Process),
            other => Err(BridgeError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Usage text printed by `help`, with `name` standing for the host-side
/// function name.
pub fn help_text(name: &str) -> String {
    format!(
        "\n{name}: chained command bridge for a spatial audio renderer\n\
         \n\
         sub-commands: 'init', 'block_size', 'out_channels', 'clear',\n\
         \x20             'source_position', 'source_orientation', 'source_mute',\n\
         \x20             'source_model', 'reference_position',\n\
         \x20             'reference_orientation', 'process'\n\
         \n\
         'init'\n\
         \x20   sources = 4;\n\
         \x20   params.sample_rate = 44100;\n\
         \x20   params.block_size = 128;\n\
         \x20   {name}('init', sources, params)\n\
         \n\
         'block_size', 'out_channels'\n\
         \x20   bs = {name}('block_size')\n\
         \n\
         Chained commands (any number, in one call):\n\
         \x20   {name}('source_position', [x1 x2; y1 y2], ...)\n\
         \x20   {name}('source_orientation', [a1 a2], ...)\n\
         \x20   {name}('source_mute', logical([0 1]), ...)\n\
         \x20   {name}('source_model', 'point', 'plane', ...)\n\
         \x20   {name}('reference_position', [x; y], ...)\n\
         \x20   {name}('reference_orientation', a, ...)\n\
         \x20   out = {name}(..., 'process', input)\n\
         \n\
         'process' takes a block_size x sources matrix and returns a\n\
         block_size x out_channels matrix. It can be used once per call.\n\
         \n\
         'clear'\n\
         \x20   {name}('clear')\n"
    )
}
