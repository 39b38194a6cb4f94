//! Event types reported to the host after scene changes

use crate::math::{Orientation, Position};
use crate::scene::SourceId;

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    SessionStarted {
        sources: usize,
        block_size: usize,
        out_channels: usize,
    },
    SessionCleared,
    SourcePositionChanged {
        source_id: SourceId,
        old_position: Position,
        new_position: Position,
    },
    SourceOrientationChanged {
        source_id: SourceId,
        orientation: Orientation,
    },
    SourceMuteChanged {
        source_id: SourceId,
        mute: bool,
    },
    ReferencePoseChanged {
        position: Position,
        orientation: Orientation,
    },
    BlockProcessed {
        block_size: usize,
    },
}

impl BridgeEvent {
    pub fn source_id(&self) -> Option<SourceId> {
        match self {
            Self::SourcePositionChanged { source_id, .. }
            | Self::SourceOrientationChanged { source_id, .. }
            | Self::SourceMuteChanged { source_id, .. } => Some(*source_id),
            _ => None,
        }
    }

    pub fn is_session_event(&self) -> bool {
        matches!(self, Self::SessionStarted { .. } | Self::SessionCleared)
    }
}
