//! History recording and arrow-key navigation.

mod common;

use common::*;
use serial_cli::prelude::*;

const UP: &str = "\x1b[A";
const DOWN: &str = "\x1b[B";

#[test]
fn submitted_commands_are_recorded_newest_first() {
    let mut cli = new_cli(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    feed(&mut cli, &mut sink, &mut app, "get-led\r");
    feed(&mut cli, &mut sink, &mut app, "get-adc\r");
    assert_eq!(cli.history().get(1), Some("get-adc"));
    assert_eq!(cli.history().get(2), Some("get-led"));
}

#[test]
fn resubmission_deduplicates() {
    let mut cli = new_cli(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    feed(&mut cli, &mut sink, &mut app, "a\r");
    feed(&mut cli, &mut sink, &mut app, "b\r");
    feed(&mut cli, &mut sink, &mut app, "a\r");
    assert_eq!(cli.history().len(), 2);
    assert_eq!(cli.history().get(1), Some("a"));
    assert_eq!(cli.history().get(2), Some("b"));
}

#[test]
fn cursor_up_recalls_previous_commands() {
    let mut cli = new_cli(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    feed(&mut cli, &mut sink, &mut app, "get-led\r");
    feed(&mut cli, &mut sink, &mut app, "get-adc\r");
    sink.take();

    feed(&mut cli, &mut sink, &mut app, UP);
    assert_eq!(sink.take(), "\r  \r> get-adc");
    assert_eq!(cli.current_command(), "get-adc");

    feed(&mut cli, &mut sink, &mut app, UP);
    assert_eq!(sink.take(), "\r         \r> get-led");
    assert_eq!(cli.current_command(), "get-led");

    // already at the oldest entry
    feed(&mut cli, &mut sink, &mut app, UP);
    assert_eq!(sink.take(), "");
    assert_eq!(cli.current_command(), "get-led");
}

#[test]
fn cursor_down_returns_to_a_fresh_line() {
    let mut cli = new_cli(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    feed(&mut cli, &mut sink, &mut app, "get-led\r");
    sink.take();

    feed(&mut cli, &mut sink, &mut app, UP);
    assert_eq!(cli.current_command(), "get-led");
    sink.take();

    feed(&mut cli, &mut sink, &mut app, DOWN);
    assert_eq!(sink.take(), "\r         \r> ");
    assert_eq!(cli.current_command(), "");

    // already on the fresh line
    feed(&mut cli, &mut sink, &mut app, DOWN);
    assert_eq!(sink.take(), "");
}

#[test]
fn navigation_resets_after_submit() {
    let mut cli = new_cli(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    feed(&mut cli, &mut sink, &mut app, "get-led\r");
    feed(&mut cli, &mut sink, &mut app, UP);
    feed(&mut cli, &mut sink, &mut app, "\r");
    assert_eq!(app.calls.len(), 2);

    feed(&mut cli, &mut sink, &mut app, UP);
    assert_eq!(cli.current_command(), "get-led");
}

#[test]
fn recalled_commands_can_be_edited() {
    let mut cli = new_cli(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    feed(&mut cli, &mut sink, &mut app, "get-led\r");
    feed(&mut cli, &mut sink, &mut app, UP);
    feed(&mut cli, &mut sink, &mut app, "\x08\x08\x08adc\r");
    assert_eq!(app.calls.last().unwrap().0, "get-adc");
}

#[test]
fn zero_capacity_disables_history() {
    let mut cli: Cli<'static, Sink, App, 64, 64, 0> = Cli::new(quiet());
    let mut sink = Sink::default();
    let mut app = App::default();

    for byte in "x\r".bytes() {
        cli.receive_char(byte);
    }
    cli.process(&mut sink, &mut app).unwrap();
    assert!(cli.history().is_empty());

    sink.take();
    for byte in UP.bytes() {
        cli.receive_char(byte);
    }
    cli.process(&mut sink, &mut app).unwrap();
    assert_eq!(sink.take(), "");
}
