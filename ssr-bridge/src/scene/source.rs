use crate::error::BridgeError;
use crate::math::{Orientation, Position};
use std::fmt;
use std::str::FromStr;

/// 1-based source handle, stable for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    /// Returns `None` for 0, which is never a valid id.
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Radiation model of a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceModel {
    /// Placeholder value; cannot be parsed from a model string
    Unknown,
    #[default]
    Point,
    Plane,
    Line,
    Directional,
    Extended,
}

impl SourceModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Point => "point",
            Self::Plane => "plane",
            Self::Line => "line",
            Self::Directional => "directional",
            Self::Extended => "extended",
        }
    }
}

impl FromStr for SourceModel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(Self::Point),
            "plane" => Ok(Self::Plane),
            "line" => Ok(Self::Line),
            "directional" => Ok(Self::Directional),
            "extended" => Ok(Self::Extended),
            other => Err(BridgeError::Conversion(other.to_string())),
        }
    }
}

impl fmt::Display for SourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sound-emitting entity owned by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    id: SourceId,
    pub position: Position,
    pub orientation: Orientation,
    pub mute: bool,
    pub model: SourceModel,
}

impl Source {
    pub(crate) fn new(id: SourceId) -> Self {
        Self {
            id,
            position: Position::default(),
            orientation: Orientation::default(),
            mute: false,
            model: SourceModel::default(),
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }
}
