#![cfg_attr(not(test), no_std)]

//! An interactive command-line engine for `no_std` embedded systems.
//!
//! This crate turns a byte-oriented duplex transport (a UART, a USB CDC
//! endpoint, a raw TCP stream) into an editable command line with live
//! echo, VT100 arrow-key history, autocompletion and command dispatch.
//! The engine owns no thread and never blocks: received bytes are pushed
//! in with [`Cli::receive_char`] and the host drives progress by calling
//! [`Cli::process`] from its main loop.
//!
//! ```ignore
//! use serial_cli::prelude::*;
//!
//! let mut cli: Cli<Uart, App> = Cli::new(CliConfig::default());
//! cli.add_binding(Binding {
//!     name: "set",
//!     help: Some("Write a parameter"),
//!     tokenize_args: true,
//!     context: None,
//!     handler: set_param,
//! });
//!
//! loop {
//!     while let Some(byte) = uart.read_byte() {
//!         cli.receive_char(byte);
//!     }
//!     cli.process(&mut uart, &mut app)?;
//! }
//! ```
//!
//! Handlers receive a [`CliHandle`] for output and the host state passed to
//! `process`; asynchronous host output goes through [`Cli::print`], which
//! restores the prompt and the in-progress line afterwards.

pub mod autocomplete;
pub mod cli;
pub mod command;
pub mod history;
pub mod token;
pub mod writer;

mod line;

pub use autocomplete::{complete, Completion};
pub use cli::{Cli, CliConfig, DirectResult};
pub use command::{Binding, CommandFn, FallbackFn, PostCommandFn, RawCommand};
pub use history::History;
pub use token::{tokenize_args, Args};
pub use writer::CliHandle;

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::cli::{Cli, CliConfig, DirectResult};
    pub use crate::command::{Binding, RawCommand};
    pub use crate::token::Args;
    pub use crate::writer::CliHandle;
}
