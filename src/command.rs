//! Command bindings and dispatch hooks.

use core::any::Any;

use embedded_io::Write;

use crate::token::Args;
use crate::writer::CliHandle;

/// Handler invoked when its command name is submitted.
///
/// Receives the session handle (output channel, host state, the binding's
/// `context`) and the argument string, and returns a result code that is
/// forwarded to the post-command hook.
pub type CommandFn<W, T> = fn(&mut CliHandle<'_, W, T>, Args<'_>) -> u8;

/// Fallback for submitted names that have no binding.
pub type FallbackFn<W, T> = fn(&mut CliHandle<'_, W, T>, RawCommand<'_>);

/// Hook invoked with the result code after every dispatched command.
pub type PostCommandFn<T> = fn(&mut T, u8);

/// A registered command.
///
/// `name` and `help` are borrowed for the engine's lifetime. When
/// `tokenize_args` is set the dispatcher rewrites the argument string into
/// a token stream before invoking the handler (see [`crate::token`]).
pub struct Binding<'a, W: Write, T> {
    /// Command name; case-sensitive, must not contain spaces
    pub name: &'a str,
    /// One-line description shown by `help`
    pub help: Option<&'a str>,
    /// Pre-tokenize the argument string in place
    pub tokenize_args: bool,
    /// Opaque per-binding data, handed back through the session handle
    pub context: Option<&'a dyn Any>,
    /// The command implementation
    pub handler: CommandFn<W, T>,
}

/// An unbound command as seen by the fallback hook.
#[derive(Debug, Clone, Copy)]
pub struct RawCommand<'c> {
    /// The submitted command name
    pub name: &'c str,
    /// Everything after the name, untokenized; empty when absent
    pub args: &'c str,
}
