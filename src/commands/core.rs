//! Core traits shared by all commands.
//!
//! - [`Command`] is a unit of work the binary can execute.
//! - [`CommandWithOutput`] is a command that produces a result.
//! - [`CommandWithOutputExt::with_print_to_stdout`] turns the latter into the former by
//!   printing the result in the requested [`Format`].

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::formatting::{Format, Formattable};

#[async_trait]
pub trait Command {
    async fn execute(&mut self) -> Result<()>;
}

#[async_trait]
pub trait CommandWithOutput {
    type Output;

    async fn execute(&mut self) -> Result<Self::Output>;
}

pub trait CommandWithOutputExt {
    /// Wrap the command so its output is printed to stdout once it succeeds.
    fn with_print_to_stdout(self, format: Format) -> Result<Box<dyn Command>>;
}

/// Runs a [`CommandWithOutput`] and writes its formatted output.
///
/// Nothing is written when the command fails.
pub struct PrintOutputCommand<C>
where
    C: CommandWithOutput,
    C::Output: Formattable,
{
    command: C,
    format: Format,
    writer: Box<dyn Write + Send>,
}

impl<C> PrintOutputCommand<C>
where
    C: CommandWithOutput + Send,
    C::Output: Formattable,
{
    pub fn new(command: C, format: Format, writer: Box<dyn Write + Send>) -> Self {
        Self {
            command,
            format,
            writer,
        }
    }
}

#[async_trait]
impl<C> Command for PrintOutputCommand<C>
where
    C: CommandWithOutput + Send,
    C::Output: Formattable,
{
    async fn execute(&mut self) -> Result<()> {
        let output = self.command.execute().await?;
        let formatted_output = output.format(self.format)?;

        writeln!(self.writer, "{formatted_output}").context("writing command output")?;
        self.writer.flush().context("writing command output")?;

        Ok(())
    }
}

impl<C> CommandWithOutputExt for C
where
    C: CommandWithOutput + Send + 'static,
    C::Output: Formattable + 'static,
{
    fn with_print_to_stdout(self, format: Format) -> Result<Box<dyn Command>> {
        Ok(Box::new(PrintOutputCommand::new(
            self,
            format,
            Box::new(std::io::stdout()),
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;

    use super::*;

    /// Writer that keeps everything written to it.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct Fixed(Option<String>);

    #[async_trait]
    impl CommandWithOutput for Fixed {
        type Output = String;

        async fn execute(&mut self) -> Result<Self::Output> {
            self.0.clone().ok_or_else(|| anyhow!("command failed"))
        }
    }

    #[tokio::test]
    async fn test_prints_output_with_newline() {
        let buffer = SharedBuffer::default();
        let mut command = PrintOutputCommand::new(
            Fixed(Some("Updated [vm-1].".to_string())),
            Format::Text,
            Box::new(buffer.clone()),
        );

        command.execute().await.expect("execute should succeed");

        assert_eq!(buffer.contents(), "Updated [vm-1].\n");
    }

    #[tokio::test]
    async fn test_prints_json() {
        let buffer = SharedBuffer::default();
        let mut command = PrintOutputCommand::new(
            Fixed(Some("vm-1".to_string())),
            Format::Json,
            Box::new(buffer.clone()),
        );

        command.execute().await.expect("execute should succeed");

        assert_eq!(buffer.contents(), "\"vm-1\"\n");
    }

    #[tokio::test]
    async fn test_prints_nothing_on_failure() {
        let buffer = SharedBuffer::default();
        let mut command =
            PrintOutputCommand::new(Fixed(None), Format::Text, Box::new(buffer.clone()));

        let result = command.execute().await;

        assert!(result.is_err());
        assert_eq!(buffer.contents(), "");
    }
}
