//! Output sinks receiving the render command stream.
//!
//! The package writer that turns commands into a binary document lives
//! outside this crate. It plugs in by implementing [`RenderSink`].
//!
//! # Example
//!
//! ```
//! use stepdoc::render::{JsonLinesSink, RenderSink, RenderCommand, ProtectionMode};
//!
//! let mut sink = JsonLinesSink::new(Vec::new());
//! sink.emit(RenderCommand::SetProtection {
//!     hash: "C665".into(),
//!     mode: ProtectionMode::FormsOnly,
//! })?;
//! let bytes = sink.into_inner()?;
//! assert!(String::from_utf8(bytes).unwrap().ends_with("}\n"));
//! # Ok::<(), stepdoc::Error>(())
//! ```

use std::io::{BufWriter, Write};

use super::RenderCommand;
use crate::error::{Error, Result};

/// Destination of render commands.
///
/// Errors returned by a sink abort the render and propagate unchanged.
pub trait RenderSink {
    /// Accept one command.
    fn emit(&mut self, command: RenderCommand) -> Result<()>;

    /// Flush buffered output. Called once at the end of a render.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RenderSink for Vec<RenderCommand> {
    fn emit(&mut self, command: RenderCommand) -> Result<()> {
        self.push(command);
        Ok(())
    }
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn emit(&mut self, command: RenderCommand) -> Result<()> {
        (**self).emit(command)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Sink writing one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink over a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Number of commands written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn emit(&mut self, command: RenderCommand) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &command)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Alignment, ParagraphCommand, Run};

    fn paragraph(text: &str) -> RenderCommand {
        RenderCommand::AddParagraph(ParagraphCommand {
            runs: vec![Run::new(text)],
            alignment: Alignment::Left,
            indent: 0.0,
            font_size: 12.0,
        })
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<RenderCommand> = Vec::new();
        sink.emit(paragraph("a")).unwrap();
        sink.emit(paragraph("b")).unwrap();
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(paragraph("one")).unwrap();
        sink.emit(paragraph("two")).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: RenderCommand = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, paragraph("two"));
    }

    #[test]
    fn test_json_lines_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        {
            let mut sink = JsonLinesSink::new(file.reopen().unwrap());
            sink.emit(paragraph("persisted")).unwrap();
            sink.finish().unwrap();
        }
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("persisted"));
    }
}
