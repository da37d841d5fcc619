//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use core::convert::Infallible;

use serial_cli::prelude::*;

/// Collects everything the engine writes so tests can assert on the exact
/// byte stream.
#[derive(Default)]
pub struct Sink(pub Vec<u8>);

impl embedded_io::ErrorType for Sink {
    type Error = Infallible;
}

impl embedded_io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl Sink {
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap()
    }

    /// Drain collected output, returning it.
    pub fn take(&mut self) -> String {
        let s = self.as_str().to_owned();
        self.0.clear();
        s
    }
}

/// Host state recording everything handlers observe.
#[derive(Default)]
pub struct App {
    /// (command name, raw args, tokens) per handler invocation
    pub calls: Vec<(String, String, Vec<String>)>,
    /// Result codes seen by the post-command hook
    pub post: Vec<u8>,
    /// (name, args) per fallback invocation
    pub fallback: Vec<(String, String)>,
}

pub type TestCli = Cli<'static, Sink, App>;

pub fn quiet() -> CliConfig<'static> {
    CliConfig {
        invitation: "> ",
        autocomplete: false,
    }
}

fn record(
    handle: &mut CliHandle<'_, Sink, App>,
    name: &str,
    args: Args<'_>,
    result: u8,
) -> u8 {
    let tokens = args.iter().map(str::to_owned).collect();
    handle
        .state()
        .calls
        .push((name.to_owned(), args.raw().to_owned(), tokens));
    result
}

fn get_led(handle: &mut CliHandle<'_, Sink, App>, args: Args<'_>) -> u8 {
    record(handle, "get-led", args, 0)
}

fn get_adc(handle: &mut CliHandle<'_, Sink, App>, args: Args<'_>) -> u8 {
    record(handle, "get-adc", args, 0)
}

fn set(handle: &mut CliHandle<'_, Sink, App>, args: Args<'_>) -> u8 {
    record(handle, "set", args, 0)
}

pub fn post_command(state: &mut App, result: u8) {
    state.post.push(result);
}

pub fn fallback(handle: &mut CliHandle<'_, Sink, App>, cmd: RawCommand<'_>) {
    handle
        .state()
        .fallback
        .push((cmd.name.to_owned(), cmd.args.to_owned()));
}

/// Engine with the standard binding set: `get-led`, `get-adc` (raw args)
/// and `set` (tokenized, no help text).
pub fn new_cli(config: CliConfig<'static>) -> TestCli {
    let mut cli = TestCli::new(config);
    add(&mut cli, "get-led", Some("Read LED state"), false, get_led);
    add(&mut cli, "get-adc", Some("Read ADC value"), false, get_adc);
    add(&mut cli, "set", None, true, set);
    cli
}

pub fn add(
    cli: &mut TestCli,
    name: &'static str,
    help: Option<&'static str>,
    tokenize_args: bool,
    handler: fn(&mut CliHandle<'_, Sink, App>, Args<'_>) -> u8,
) {
    assert!(cli
        .add_binding(Binding {
            name,
            help,
            tokenize_args,
            context: None,
            handler,
        })
        .is_ok());
}

/// Push every byte of `input`, then drain.
pub fn feed(cli: &mut TestCli, sink: &mut Sink, app: &mut App, input: &str) {
    for byte in input.bytes() {
        cli.receive_char(byte);
    }
    cli.process(sink, app).unwrap();
}
