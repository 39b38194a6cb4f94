use super::value::Array;
use crate::error::{BridgeError, Result};

/// Output slots the host asked for, filled as commands produce results.
#[derive(Debug, Clone, Default)]
pub struct OutputSlots {
    requested: usize,
    values: Vec<Array>,
}

impl OutputSlots {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            values: Vec::with_capacity(requested.min(1)),
        }
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn remaining(&self) -> usize {
        self.requested.saturating_sub(self.values.len())
    }

    /// Store a result. A result nobody asked for is still kept, so optional
    /// outputs can always be produced.
    pub fn push(&mut self, value: Array) {
        self.values.push(value);
    }

    pub fn expect_none(&self, command: &str) -> Result<()> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(BridgeError::usage(format!(
                "No output supported for '{}'!",
                command
            )))
        }
    }

    pub fn expect_at_most_one(&self, command: &str) -> Result<()> {
        if self.remaining() <= 1 {
            Ok(())
        } else {
            Err(BridgeError::usage(format!(
                "Only one output is supported for '{}'!",
                command
            )))
        }
    }

    pub fn expect_exactly_one(&self, command: &str) -> Result<()> {
        if self.remaining() == 1 {
            Ok(())
        } else {
            Err(BridgeError::usage(format!(
                "Exactly one output is needed for '{}'! \
                 And '{}' can only be used once in a chained command",
                command, command
            )))
        }
    }

    /// Every requested slot must have been consumed by the chain.
    pub fn finish_chain(&self) -> Result<()> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(BridgeError::usage(
                "Output argument(s) available but not needed!",
            ))
        }
    }

    pub fn into_values(self) -> Vec<Array> {
        self.values
    }
}
