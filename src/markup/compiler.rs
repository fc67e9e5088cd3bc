use std::process::Command;

use crate::foundation::error::{MathreelError, MathreelResult};

/// Turns an expression into vector markup text.
///
/// The only side effect lives behind this trait, so the rest of the pipeline stays pure.
pub trait MarkupCompiler {
    /// Compile `source` into markup text.
    fn compile(&self, source: &str) -> MathreelResult<String>;
}

/// Treats the source as markup already.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughCompiler;

impl MarkupCompiler for PassthroughCompiler {
    fn compile(&self, source: &str) -> MathreelResult<String> {
        Ok(source.to_string())
    }
}

/// Runs an external program with the expression as its final argument and reads markup from
/// stdout.
#[derive(Clone, Debug)]
pub struct CommandCompiler {
    /// Program to spawn.
    pub program: String,
    /// Arguments placed before the expression.
    pub args: Vec<String>,
}

impl CommandCompiler {
    /// Compiler spawning `program` with no leading arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a leading argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl MarkupCompiler for CommandCompiler {
    #[tracing::instrument(skip(self, source), fields(program = %self.program))]
    fn compile(&self, source: &str) -> MathreelResult<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .output()
            .map_err(|e| {
                MathreelError::markup(format!("failed to run '{}': {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MathreelError::markup(format!(
                "'{}' failed ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let markup = String::from_utf8(output.stdout)
            .map_err(|_| MathreelError::markup(format!("'{}' wrote non-UTF-8 output", self.program)))?;
        if markup.trim().is_empty() {
            return Err(MathreelError::markup(format!(
                "'{}' produced no markup",
                self.program
            )));
        }
        tracing::debug!(bytes = markup.len(), "compiled expression to markup");
        Ok(markup)
    }
}
