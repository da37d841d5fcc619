//! The engine: line editor, dispatcher and lifecycle.
//!
//! One [`Cli`] drives one interactive session. Received bytes go through a
//! FIFO into the per-byte state machine: escape sequences are decoded,
//! control characters edit or submit the line, displayable characters are
//! echoed and accumulated, and after every byte the live-completion repaint
//! keeps the screen in sync with the buffer.

use embedded_io::Write;
use heapless::spsc::Queue;
use heapless::Vec;

use crate::autocomplete;
use crate::command::{Binding, FallbackFn, PostCommandFn, RawCommand};
use crate::history::History;
use crate::line::LineBuffer;
use crate::token::{self, Args};
use crate::writer::{self, CliHandle};

const ESC: u8 = 0x1B;

const HELP_NAME: &str = "help";
const HELP_HINT: &str = "Print list of commands";

/// Configuration for the engine.
#[derive(Clone, Copy)]
pub struct CliConfig<'a> {
    /// Prompt emitted at the start of every editable line
    pub invitation: &'a str,
    /// Enable live and tab completion
    pub autocomplete: bool,
}

impl Default for CliConfig<'_> {
    fn default() -> Self {
        Self {
            invitation: "> ",
            autocomplete: true,
        }
    }
}

/// Outcome of a programmatic command submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectResult {
    /// A binding (or the built-in `help`) ran; carries its result code
    Handled(u8),
    /// No binding matched the command name
    Unbound,
    /// The submission was empty or all whitespace
    Empty,
    /// The submission does not fit the command buffer
    TooLong,
}

#[derive(Clone, Copy, PartialEq)]
enum RunState {
    /// Constructed, invitation not yet emitted
    Created,
    /// First drain has run
    Running,
}

/// Boolean engine state, one named field per condition.
#[derive(Clone, Copy)]
struct Flags {
    /// A received byte was dropped because the ingest FIFO was full
    overflow: bool,
    /// Inside an `ESC [` sequence, consuming until the final byte
    escape_mode: bool,
    /// Live and tab completion enabled
    autocomplete: bool,
}

/// Interactive command-line engine.
///
/// Generic over the output transport `W` and the host state `T` that is
/// forwarded to command handlers. Capacities are const parameters: the
/// command buffer, the ingest FIFO, the history arena and the binding
/// table. The whole engine is a by-value aggregate; nothing is allocated.
pub struct Cli<
    'a,
    W: Write,
    T,
    const CMD: usize = 64,
    const RX: usize = 64,
    const HISTORY: usize = 128,
    const BINDINGS: usize = 8,
> {
    invitation: &'a str,
    rx: Queue<u8, RX>,
    cmd: LineBuffer<CMD>,
    bindings: Vec<Binding<'a, W, T>, BINDINGS>,
    history: History<HISTORY>,
    /// Displayed length of the input line after the invitation, including
    /// any live-completion suffix
    input_line: usize,
    last_char: u8,
    run_state: RunState,
    flags: Flags,
    on_command: Option<FallbackFn<W, T>>,
    post_command: Option<PostCommandFn<T>>,
}

impl<
        'a,
        W: Write,
        T,
        const CMD: usize,
        const RX: usize,
        const HISTORY: usize,
        const BINDINGS: usize,
    > Cli<'a, W, T, CMD, RX, HISTORY, BINDINGS>
{
    pub const fn new(config: CliConfig<'a>) -> Self {
        Self {
            invitation: config.invitation,
            rx: Queue::new(),
            cmd: LineBuffer::new(),
            bindings: Vec::new(),
            history: History::new(),
            input_line: 0,
            last_char: 0,
            run_state: RunState::Created,
            flags: Flags {
                overflow: false,
                escape_mode: false,
                autocomplete: config.autocomplete,
            },
            on_command: None,
            post_command: None,
        }
    }

    /// Bytes needed to place an engine of this configuration.
    pub const fn required_size() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Ingest one received byte.
    ///
    /// Bytes are buffered until the next [`process`](Self::process) call.
    /// If the FIFO is full the byte is dropped and the in-flight command
    /// will be discarded when `process` completes.
    pub fn receive_char(&mut self, byte: u8) {
        if self.rx.enqueue(byte).is_err() {
            self.flags.overflow = true;
        }
    }

    /// Drain buffered input and advance the state machine.
    ///
    /// The first call emits the invitation. `state` is forwarded to any
    /// handler that a completed line dispatches to.
    pub fn process(&mut self, io: &mut W, state: &mut T) -> Result<(), W::Error> {
        if self.run_state == RunState::Created {
            self.run_state = RunState::Running;
            writer::write_str(io, self.invitation)?;
        }

        while let Some(byte) = self.rx.dequeue() {
            if self.flags.escape_mode {
                self.on_escaped_input(io, byte)?;
            } else if self.last_char == ESC && byte == b'[' {
                self.flags.escape_mode = true;
            } else if is_control_char(byte) {
                self.on_control_input(io, state, byte)?;
            } else if is_displayable(byte) {
                self.on_char_input(io, byte)?;
            }

            self.print_live_autocompletion(io)?;
            self.last_char = byte;
        }

        // a dropped byte would silently corrupt the command, force a retype
        if self.flags.overflow {
            self.cmd.clear();
            self.flags.overflow = false;
        }
        Ok(())
    }

    /// Register a command. The binding is handed back when the table is
    /// full.
    ///
    /// Names are case-sensitive and must not contain spaces. `help` is
    /// built in and cannot be shadowed.
    pub fn add_binding(
        &mut self,
        binding: Binding<'a, W, T>,
    ) -> Result<(), Binding<'a, W, T>> {
        debug_assert!(!binding.name.contains(' '));
        self.bindings.push(binding)
    }

    /// Fallback invoked for submitted names with no binding.
    pub fn set_on_command(&mut self, fallback: FallbackFn<W, T>) {
        self.on_command = Some(fallback);
    }

    /// Hook invoked with the result code after every dispatched command.
    pub fn set_post_command(&mut self, hook: PostCommandFn<T>) {
        self.post_command = Some(hook);
    }

    /// Interleave a line of output with the editable input line.
    ///
    /// The current line is cleared, `s` is emitted with a line break, and
    /// the invitation plus the in-progress command are painted back, so the
    /// host can log at any point without corrupting the user's input.
    pub fn print(&mut self, io: &mut W, s: &str) -> Result<(), W::Error> {
        self.clear_current_line(io)?;
        writer::write_str(io, s)?;
        writer::line_break(io)?;
        writer::write_str(io, self.invitation)?;
        writer::write_str(io, self.cmd.as_str())?;
        self.input_line = self.cmd.len();
        self.print_live_autocompletion(io)
    }

    /// Submit a command programmatically, bypassing the editor.
    ///
    /// The submission is not echoed and not recorded in history, and an
    /// unbound name is reported through the result instead of the
    /// unknown-command message.
    pub fn parse_direct_command(
        &mut self,
        io: &mut W,
        bytes: &[u8],
        state: &mut T,
    ) -> Result<DirectResult, W::Error> {
        if bytes.len() + 2 > CMD {
            return Ok(DirectResult::TooLong);
        }
        let mut buf = [0u8; CMD];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self::dispatch_line(
            &self.bindings,
            self.on_command,
            self.post_command,
            &mut self.history,
            io,
            state,
            &mut buf,
            bytes.len(),
            true,
        )
    }

    /// The command line currently being edited.
    pub fn current_command(&self) -> &str {
        self.cmd.as_str()
    }

    /// Submitted-command history.
    pub fn history(&self) -> &History<HISTORY> {
        &self.history
    }

    fn on_escaped_input(&mut self, io: &mut W, byte: u8) -> Result<(), W::Error> {
        // parameter bytes between `[` and the final byte are ignored
        if (0x40..=0x7E).contains(&byte) {
            self.flags.escape_mode = false;
            if byte == b'A' || byte == b'B' {
                self.navigate_history(io, byte == b'A')?;
            }
        }
        Ok(())
    }

    fn on_char_input(&mut self, io: &mut W, byte: u8) -> Result<(), W::Error> {
        if self.cmd.push(byte) {
            writer::write_byte(io, byte)?;
        }
        Ok(())
    }

    fn on_control_input(
        &mut self,
        io: &mut W,
        state: &mut T,
        byte: u8,
    ) -> Result<(), W::Error> {
        // a \r\n or \n\r pair submits only once
        if (self.last_char == b'\r' && byte == b'\n')
            || (self.last_char == b'\n' && byte == b'\r')
        {
            return Ok(());
        }

        match byte {
            b'\r' | b'\n' => {
                // snap to a unique completion before the line is finalized
                self.on_autocomplete_request(io)?;
                writer::line_break(io)?;
                if self.cmd.len() > 0 {
                    let len = self.cmd.len();
                    let _ = Self::dispatch_line(
                        &self.bindings,
                        self.on_command,
                        self.post_command,
                        &mut self.history,
                        io,
                        state,
                        self.cmd.raw_mut(),
                        len,
                        false,
                    )?;
                }
                self.cmd.clear();
                self.history.reset_cursor();
                self.input_line = 0;
                writer::write_str(io, self.invitation)?;
            }
            0x08 | 0x7F if self.cmd.len() > 0 => {
                writer::erase_glyph(io)?;
                self.cmd.backspace();
            }
            b'\t' => self.on_autocomplete_request(io)?,
            _ => {}
        }
        Ok(())
    }

    fn navigate_history(&mut self, io: &mut W, up: bool) -> Result<(), W::Error> {
        let Some(item) = self.history.navigate(up) else {
            return Ok(());
        };
        self.cmd.set(item);
        self.clear_current_line(io)?;
        writer::write_str(io, self.invitation)?;
        writer::write_str(io, self.cmd.as_str())?;
        self.input_line = self.cmd.len();
        self.print_live_autocompletion(io)
    }

    /// Repaint the line after a consumed byte.
    ///
    /// With exactly one completion candidate the missing suffix is painted
    /// past the cursor; leftovers of a longer previous paint are blanked
    /// out; then the cursor is put back where the user expects it by
    /// re-emitting the invitation and the buffer.
    fn print_live_autocompletion(&mut self, io: &mut W) -> Result<(), W::Error> {
        if !self.flags.autocomplete {
            return Ok(());
        }

        let completion = autocomplete::complete(
            core::iter::once(HELP_NAME).chain(self.bindings.iter().map(|b| b.name)),
            self.cmd.as_str(),
        );

        let shown = match completion.first_candidate {
            Some(name) if completion.count == 1 => {
                writer::write_str(io, &name[self.cmd.len()..completion.completed_len])?;
                completion.completed_len
            }
            _ => self.cmd.len(),
        };
        for _ in shown..self.input_line {
            writer::write_byte(io, b' ')?;
        }
        self.input_line = shown;

        writer::write_byte(io, b'\r')?;
        writer::write_str(io, self.invitation)?;
        writer::write_str(io, self.cmd.as_str())
    }

    /// Tab completion: extend the buffer as far as the candidates allow, or
    /// list them when nothing more can be added.
    fn on_autocomplete_request(&mut self, io: &mut W) -> Result<(), W::Error> {
        if !self.flags.autocomplete {
            return Ok(());
        }

        let completion = autocomplete::complete(
            core::iter::once(HELP_NAME).chain(self.bindings.iter().map(|b| b.name)),
            self.cmd.as_str(),
        );
        let Some(first) = completion.first_candidate else {
            return Ok(());
        };

        if completion.count == 1 || completion.completed_len > self.cmd.len() {
            let previous = self.cmd.len();
            for i in previous..completion.completed_len {
                if !self.cmd.push(first.as_bytes()[i]) {
                    break;
                }
            }
            if completion.count == 1 {
                self.cmd.push(b' ');
            }
            writer::write_str(io, &self.cmd.as_str()[previous..])?;
            self.input_line = self.cmd.len();
            return Ok(());
        }

        // nothing left to extend: list every candidate, then repaint
        self.clear_current_line(io)?;
        let prefix = self.cmd.as_str();
        for name in core::iter::once(HELP_NAME).chain(self.bindings.iter().map(|b| b.name)) {
            if name.starts_with(prefix) {
                writer::write_str(io, name)?;
                writer::line_break(io)?;
            }
        }
        writer::write_str(io, self.invitation)?;
        writer::write_str(io, self.cmd.as_str())?;
        self.input_line = self.cmd.len();
        Ok(())
    }

    fn clear_current_line(&mut self, io: &mut W) -> Result<(), W::Error> {
        let width = self.invitation.len() + self.input_line;
        writer::clear_line(io, width)?;
        self.input_line = 0;
        Ok(())
    }

    /// Shared dispatch path for interactive and direct submissions.
    ///
    /// Takes field borrows instead of `&mut self` so the command buffer,
    /// the history and the binding table stay disjoint while the buffer is
    /// rewritten in place.
    #[allow(clippy::too_many_arguments)]
    fn dispatch_line(
        bindings: &Vec<Binding<'a, W, T>, BINDINGS>,
        on_command: Option<FallbackFn<W, T>>,
        post_command: Option<PostCommandFn<T>>,
        history: &mut History<HISTORY>,
        io: &mut W,
        state: &mut T,
        buf: &mut [u8],
        len: usize,
        direct: bool,
    ) -> Result<DirectResult, W::Error> {
        if buf[..len].iter().all(|&b| b == b' ') {
            return Ok(DirectResult::Empty);
        }

        if !direct {
            // record before tokenization rewrites the buffer
            history.put(bytes_as_str(&buf[..len]));
        }

        let name_start = buf[..len]
            .iter()
            .position(|&b| b != b' ')
            .unwrap_or(len);
        let name_end = name_start
            + buf[name_start..len]
                .iter()
                .position(|&b| b == b' ')
                .unwrap_or(len - name_start);
        let args_start = name_end
            + buf[name_end..len]
                .iter()
                .position(|&b| b != b' ')
                .unwrap_or(len - name_end);

        let args_len = len - args_start;
        let (head, tail) = buf.split_at_mut(args_start);
        let name = bytes_as_str(&head[name_start..name_end]);

        if name == HELP_NAME {
            let args = if args_len == 0 {
                Args::empty()
            } else {
                let n = token::tokenize_args(tail, args_len);
                Args::new(bytes_as_str(&tail[..n]))
            };
            let result = Self::help_command(bindings, io, args)?;
            if let Some(post) = post_command {
                post(state, result);
            }
            return Ok(DirectResult::Handled(result));
        }

        if let Some(binding) = bindings.iter().find(|b| b.name == name) {
            let handler = binding.handler;
            let context = binding.context;

            let args = if args_len == 0 {
                Args::empty()
            } else if binding.tokenize_args {
                let n = token::tokenize_args(tail, args_len);
                Args::new(bytes_as_str(&tail[..n]))
            } else {
                Args::new(bytes_as_str(&tail[..args_len]))
            };

            let mut handle = CliHandle::new(io, state, context);
            let result = handler(&mut handle, args);
            if let Some(post) = post_command {
                post(state, result);
            }
            return Ok(DirectResult::Handled(result));
        }

        if direct {
            return Ok(DirectResult::Unbound);
        }

        if let Some(fallback) = on_command {
            let raw = RawCommand {
                name,
                args: bytes_as_str(&tail[..args_len]),
            };
            let mut handle = CliHandle::new(io, state, None);
            fallback(&mut handle, raw);
        } else {
            Self::unknown_command(io, name)?;
            if let Some(post) = post_command {
                post(state, 1);
            }
        }
        Ok(DirectResult::Unbound)
    }

    fn help_command(
        bindings: &Vec<Binding<'a, W, T>, BINDINGS>,
        io: &mut W,
        args: Args<'_>,
    ) -> Result<u8, W::Error> {
        match args.count() {
            0 => {
                for (name, help) in core::iter::once((HELP_NAME, Some(HELP_HINT)))
                    .chain(bindings.iter().map(|b| (b.name, b.help)))
                {
                    writer::write_str(io, " * ")?;
                    writer::write_str(io, name)?;
                    writer::line_break(io)?;
                    if let Some(help) = help {
                        writer::write_byte(io, b'\t')?;
                        writer::write_str(io, help)?;
                        writer::line_break(io)?;
                    }
                }
                Ok(0)
            }
            1 => {
                let wanted = args.token(1).unwrap_or("");
                if wanted == HELP_NAME {
                    Self::help_entry(io, HELP_NAME, HELP_HINT)?;
                    return Ok(0);
                }
                match bindings.iter().find(|b| b.name == wanted) {
                    Some(binding) => match binding.help {
                        Some(help) => {
                            Self::help_entry(io, binding.name, help)?;
                            Ok(0)
                        }
                        None => {
                            writer::write_str(io, "Help is not available")?;
                            writer::line_break(io)?;
                            Ok(1)
                        }
                    },
                    None => {
                        Self::unknown_command(io, wanted)?;
                        Ok(1)
                    }
                }
            }
            _ => {
                writer::write_str(io, "Command \"help\" receives one or zero arguments")?;
                writer::line_break(io)?;
                Ok(0)
            }
        }
    }

    fn help_entry(io: &mut W, name: &str, help: &str) -> Result<(), W::Error> {
        writer::write_str(io, " * ")?;
        writer::write_str(io, name)?;
        writer::line_break(io)?;
        writer::write_byte(io, b'\t')?;
        writer::write_str(io, help)?;
        writer::line_break(io)
    }

    fn unknown_command(io: &mut W, name: &str) -> Result<(), W::Error> {
        writer::write_str(io, "Unknown command: \"")?;
        writer::write_str(io, name)?;
        writer::write_str(io, "\". Write \"help\" for a list of available commands")?;
        writer::line_break(io)
    }
}

impl<
        'a,
        W: Write,
        T,
        const CMD: usize,
        const RX: usize,
        const HISTORY: usize,
        const BINDINGS: usize,
    > Default for Cli<'a, W, T, CMD, RX, HISTORY, BINDINGS>
{
    fn default() -> Self {
        Self::new(CliConfig::default())
    }
}

fn is_control_char(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n' || byte == 0x08 || byte == b'\t' || byte == 0x7F
}

fn is_displayable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

fn bytes_as_str(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("")
}
