use super::value::{Arg, Array};
use crate::error::{BridgeError, Result};

/// Read position over the arguments of one call.
///
/// Handlers consume exactly the arguments they own; whatever is left is
/// either the next chained command or an error.
#[derive(Debug, Clone)]
pub struct ArgCursor<'a> {
    args: &'a [Arg],
    position: usize,
}

impl<'a> ArgCursor<'a> {
    pub fn new(args: &'a [Arg]) -> Self {
        Self { args, position: 0 }
    }

    pub fn peek(&self) -> Option<&'a Arg> {
        self.args.get(self.position)
    }

    pub fn take(&mut self) -> Option<&'a Arg> {
        let arg = self.args.get(self.position)?;
        self.position += 1;
        Some(arg)
    }

    pub fn remaining(&self) -> usize {
        self.args.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless another argument follows `command`.
    pub fn require(&self, command: &str) -> Result<&'a Arg> {
        self.peek().ok_or_else(|| {
            BridgeError::usage(format!("'{}': further input argument needed!", command))
        })
    }

    pub fn take_text(&mut self, message: &str) -> Result<&'a str> {
        match self.peek().and_then(Arg::as_text) {
            Some(text) => {
                self.position += 1;
                Ok(text)
            }
            None => Err(BridgeError::usage(message)),
        }
    }

    /// The next argument as an array, without consuming it. Handlers only
    /// advance once every check on it has passed.
    pub fn peek_array(&self, command: &str) -> Result<&'a Array> {
        let arg = self.require(command)?;
        arg.as_array().ok_or_else(|| {
            BridgeError::usage(format!(
                "'{}': expected a numeric or logical array, got {}!",
                command,
                arg.kind()
            ))
        })
    }

    pub fn advance(&mut self) {
        self.position = (self.position + 1).min(self.args.len());
    }

    pub fn expect_end(&self, command: &str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::usage(format!(
                "'{}': no further input arguments allowed!",
                command
            )))
        }
    }
}
