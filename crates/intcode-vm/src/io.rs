//! I/O channel adapter.
//!
//! The `in` and `out` opcodes never talk to a medium directly. They go through
//! [`Ports`], which resolves the configured [`InputChannel`] / [`OutputChannel`]
//! and falls back to the VM's [`Console`] for terminal and ASCII traffic.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::error::{VmError, VmResult};
#[cfg(feature = "multithread")]
use crate::queue::BlockingQueue;

const NEWLINE: i64 = 10;

pub type InputFn<'a> = Box<dyn FnMut() -> VmResult<i64> + 'a>;
pub type OutputFn<'a> = Box<dyn FnMut(i64) -> VmResult<()> + 'a>;

/// Where `in` gets its values from.
#[derive(Default)]
pub enum InputChannel<'a> {
    /// Prompt the console for one integer per read.
    #[default]
    Terminal,
    /// Read console lines, hand them out one character code at a time.
    Ascii,
    /// Finite scripted input. Running dry is an error.
    Values(VecDeque<i64>),
    Callback(InputFn<'a>),
    /// Block until a peer pushes a value.
    #[cfg(feature = "multithread")]
    Queue(BlockingQueue),
}

impl<'a> InputChannel<'a> {
    pub fn values(values: impl IntoIterator<Item = i64>) -> Self {
        InputChannel::Values(values.into_iter().collect())
    }

    pub fn callback(f: impl FnMut() -> VmResult<i64> + 'a) -> Self {
        InputChannel::Callback(Box::new(f))
    }
}

impl fmt::Debug for InputChannel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputChannel::Terminal => f.write_str("Terminal"),
            InputChannel::Ascii => f.write_str("Ascii"),
            InputChannel::Values(v) => f.debug_tuple("Values").field(v).finish(),
            InputChannel::Callback(_) => f.write_str("Callback(..)"),
            #[cfg(feature = "multithread")]
            InputChannel::Queue(q) => f.debug_tuple("Queue").field(q).finish(),
        }
    }
}

/// Where `out` sends its values.
#[derive(Default)]
pub enum OutputChannel<'a> {
    /// Print each value on its own line.
    #[default]
    Terminal,
    /// Print each value as a character, no separator.
    Ascii,
    /// Collect values for the caller to inspect afterwards.
    Values(Vec<i64>),
    Callback(OutputFn<'a>),
    #[cfg(feature = "multithread")]
    Queue(BlockingQueue),
}

impl<'a> OutputChannel<'a> {
    pub fn values() -> Self {
        OutputChannel::Values(Vec::new())
    }

    pub fn callback(f: impl FnMut(i64) -> VmResult<()> + 'a) -> Self {
        OutputChannel::Callback(Box::new(f))
    }

    /// Values collected so far; empty for every other channel kind.
    pub fn collected(&self) -> &[i64] {
        match self {
            OutputChannel::Values(v) => v,
            _ => &[],
        }
    }

    pub fn into_values(self) -> Vec<i64> {
        match self {
            OutputChannel::Values(v) => v,
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for OutputChannel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputChannel::Terminal => f.write_str("Terminal"),
            OutputChannel::Ascii => f.write_str("Ascii"),
            OutputChannel::Values(v) => f.debug_tuple("Values").field(v).finish(),
            OutputChannel::Callback(_) => f.write_str("Callback(..)"),
            #[cfg(feature = "multithread")]
            OutputChannel::Queue(q) => f.debug_tuple("Queue").field(q).finish(),
        }
    }
}

// =============================================================================
// Console
// =============================================================================

/// The controlling terminal: prompts, ASCII line buffer, printed output and
/// traces all go through here.
pub struct Console {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
    pending: VecDeque<i64>,
}

impl Console {
    pub fn new(reader: impl BufRead + Send + 'static, writer: impl Write + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            pending: VecDeque::new(),
        }
    }

    /// Process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        &mut *self.writer
    }

    /// One line without its terminator, `None` at end of input.
    fn read_line(&mut self) -> VmResult<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn prompt_int(&mut self, ip: usize) -> VmResult<i64> {
        write!(self.writer, "? ")?;
        self.writer.flush()?;
        let line = self.read_line()?.ok_or(VmError::InputExhausted { ip })?;
        line.trim()
            .parse()
            .map_err(|_| VmError::BadTerminalInput(line))
    }

    /// Next character code of the current line, reading a new line (plus a
    /// trailing newline code) whenever the buffer has drained.
    fn next_char(&mut self, ip: usize) -> VmResult<i64> {
        if self.pending.is_empty() {
            let line = self.read_line()?.ok_or(VmError::InputExhausted { ip })?;
            self.pending.extend(line.chars().map(|c| c as i64));
            self.pending.push_back(NEWLINE);
        }
        self.pending.pop_front().ok_or(VmError::InputExhausted { ip })
    }

    fn print_char(&mut self, n: i64) -> VmResult<()> {
        match u32::try_from(n).ok().and_then(char::from_u32) {
            Some(c) => write!(self.writer, "{}", c)?,
            None => {
                log::warn!("ascii output {} is not a character", n);
                writeln!(self.writer, "{}", n)?;
            }
        }
        if n == NEWLINE {
            self.writer.flush()?;
        }
        Ok(())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Ports
// =============================================================================

/// Channels bound for the duration of one step.
pub struct Ports<'p, 'i, 'o> {
    pub input: &'p mut InputChannel<'i>,
    pub output: &'p mut OutputChannel<'o>,
    pub console: &'p mut Console,
}

impl Ports<'_, '_, '_> {
    pub fn read(&mut self, ip: usize) -> VmResult<i64> {
        let n = match &mut *self.input {
            InputChannel::Terminal => return self.console.prompt_int(ip),
            InputChannel::Ascii => self.console.next_char(ip)?,
            InputChannel::Callback(f) => f()?,
            #[cfg(feature = "multithread")]
            InputChannel::Queue(q) => q.pop().ok_or(VmError::InputExhausted { ip })?,
            InputChannel::Values(v) => v.pop_front().ok_or(VmError::InputExhausted { ip })?,
        };
        if matches!(self.output, OutputChannel::Terminal) {
            writeln!(self.console.writer, "? -> {}", n)?;
        }
        Ok(n)
    }

    pub fn write(&mut self, n: i64) -> VmResult<()> {
        match &mut *self.output {
            OutputChannel::Terminal => writeln!(self.console.writer, "{}", n)?,
            OutputChannel::Ascii => self.console.print_char(n)?,
            #[cfg(feature = "multithread")]
            OutputChannel::Queue(q) => q.push(n),
            OutputChannel::Callback(f) => f(n)?,
            OutputChannel::Values(v) => v.push(n),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::console;

    #[test]
    fn test_values_exhausted() {
        let (mut console, _) = console("");
        let mut input = InputChannel::values([5]);
        let mut output = OutputChannel::values();
        let mut ports = Ports {
            input: &mut input,
            output: &mut output,
            console: &mut console,
        };
        assert_eq!(ports.read(0).unwrap(), 5);
        assert!(matches!(ports.read(7), Err(VmError::InputExhausted { ip: 7 })));
    }

    #[test]
    fn test_ascii_refills_per_line() {
        let (mut console, _) = console("hi\nx\n");
        let codes: Vec<i64> = (0..5).map(|_| console.next_char(0).unwrap()).collect();
        assert_eq!(codes, vec![104, 105, 10, 120, 10]);
        assert!(matches!(
            console.next_char(0),
            Err(VmError::InputExhausted { .. })
        ));
    }

    #[test]
    fn test_terminal_prompt() {
        let (mut console, out) = console("  -12\nnope\n");
        assert_eq!(console.prompt_int(0).unwrap(), -12);
        assert!(matches!(
            console.prompt_int(0),
            Err(VmError::BadTerminalInput(s)) if s == "nope"
        ));
        assert_eq!(out.text(), "? ? ");
    }

    #[test]
    fn test_echo_when_output_is_terminal() {
        let (mut console, out) = console("");
        let mut input = InputChannel::values([3]);
        let mut output = OutputChannel::Terminal;
        let mut ports = Ports {
            input: &mut input,
            output: &mut output,
            console: &mut console,
        };
        let n = ports.read(0).unwrap();
        ports.write(n * 2).unwrap();
        assert_eq!(out.text(), "? -> 3\n6\n");
    }

    #[test]
    fn test_ascii_output() {
        let (mut console, out) = console("");
        for n in [72, 105, 10, 1_000_000_000] {
            console.print_char(n).unwrap();
        }
        assert_eq!(out.text(), "Hi\n1000000000\n");
    }

    #[test]
    fn test_callbacks() {
        let mut seen = Vec::new();
        {
            let (mut console, _) = console("");
            let mut input = InputChannel::callback(|| Ok(9));
            let mut output = OutputChannel::callback(|n| {
                seen.push(n);
                Ok(())
            });
            let mut ports = Ports {
                input: &mut input,
                output: &mut output,
                console: &mut console,
            };
            let n = ports.read(0).unwrap();
            ports.write(n + 1).unwrap();
        }
        assert_eq!(seen, vec![10]);
    }
}
