//! Output sinks for rendered reports.
//!
//! Every sink receives one [`ReportBlock`] per test and must write it
//! contiguously: when several test workers tear down at once, the lines of
//! two different tests never interleave. Each implementation takes a lock
//! for the whole block and writes it in one pass.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ============================================================================
// REPORT BLOCKS
// ============================================================================

/// What a line of a report block represents. Sinks may style by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Field,
    Separator,
    Raw,
    Marker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLine {
    pub kind: LineKind,
    pub text: String,
}

/// All lines of one test's report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportBlock {
    lines: Vec<BlockLine>,
}

impl ReportBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) -> &mut Self {
        self.lines.push(BlockLine {
            kind,
            text: text.into(),
        });
        self
    }

    pub fn lines(&self) -> &[BlockLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain text of the block, one line per entry, newline terminated.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.text);
            text.push('\n');
        }
        text
    }
}

impl std::fmt::Display for ReportBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

// ============================================================================
// OUTPUT SINKS: OutputBuffer, StdoutSink, WriterSink
// ============================================================================

/// Destination for rendered report blocks, shared across test workers.
pub trait OutputSink: Send + Sync {
    /// Writes the whole block without interleaving other blocks.
    fn emit_block(&self, block: &ReportBlock) -> io::Result<()>;
}

/// A sink shared between the reporter and its callers.
pub type SharedSink = Arc<dyn OutputSink>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// OutputBuffer: collects blocks in memory for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    blocks: Mutex<Vec<String>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every block received so far, in arrival order.
    pub fn blocks(&self) -> Vec<String> {
        lock(&self.blocks).clone()
    }

    /// All blocks concatenated.
    pub fn contents(&self) -> String {
        lock(&self.blocks).concat()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.blocks).is_empty()
    }
}

impl OutputSink for OutputBuffer {
    fn emit_block(&self, block: &ReportBlock) -> io::Result<()> {
        lock(&self.blocks).push(block.to_text());
        Ok(())
    }
}

/// NullSink: discards everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit_block(&self, _block: &ReportBlock) -> io::Result<()> {
        Ok(())
    }
}

/// Which standard stream a [`StdoutSink`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// StdoutSink: writes to a standard stream, optionally coloring section headers.
pub struct StdoutSink {
    stream: StandardStream,
}

impl StdoutSink {
    pub fn new(use_colors: bool) -> Self {
        Self::for_stream(Stream::Stdout, use_colors)
    }

    pub fn stderr(use_colors: bool) -> Self {
        Self::for_stream(Stream::Stderr, use_colors)
    }

    fn for_stream(stream: Stream, use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        let stream = match stream {
            Stream::Stdout => StandardStream::stdout(choice),
            Stream::Stderr => StandardStream::stderr(choice),
        };
        Self { stream }
    }
}

impl OutputSink for StdoutSink {
    fn emit_block(&self, block: &ReportBlock) -> io::Result<()> {
        // Holding the stream lock keeps other writers out until the block is done.
        let mut out = self.stream.lock();
        for line in block.lines() {
            match line.kind {
                LineKind::Header => {
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
                }
                LineKind::Marker => {
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                }
                _ => {}
            }
            out.write_all(line.text.as_bytes())?;
            out.reset()?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

/// WriterSink: any `Write` implementation behind a mutex (files, pipes, buffers).
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> OutputSink for WriterSink<W> {
    fn emit_block(&self, block: &ReportBlock) -> io::Result<()> {
        let mut writer = lock(&self.writer);
        writer.write_all(block.to_text().as_bytes())?;
        writer.flush()
    }
}
