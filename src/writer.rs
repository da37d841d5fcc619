//! Output side: the handler-facing session handle and the low-level
//! terminal emit helpers.

use core::any::Any;
use core::fmt;

use embedded_io::Write;

pub(crate) const LINE_BREAK: &str = "\r\n";

/// Session handle passed to command handlers.
///
/// Carries the transport, the host state given to `process`, and the
/// binding's opaque context. Output written here goes straight to the
/// transport: while a handler runs the input line has already been
/// finalized, so no repaint is needed.
pub struct CliHandle<'h, W: Write, T> {
    out: &'h mut W,
    state: &'h mut T,
    context: Option<&'h dyn Any>,
}

impl<'h, W: Write, T> CliHandle<'h, W, T> {
    pub(crate) fn new(
        out: &'h mut W,
        state: &'h mut T,
        context: Option<&'h dyn Any>,
    ) -> Self {
        Self {
            out,
            state,
            context,
        }
    }

    /// Write `s` followed by a line break.
    pub fn print(&mut self, s: &str) -> Result<(), W::Error> {
        write_str(self.out, s)?;
        line_break(self.out)
    }

    /// Host state passed to `process`.
    pub fn state(&mut self) -> &mut T {
        &mut *self.state
    }

    /// The binding's `context`, if it carries one.
    pub fn context(&self) -> Option<&'h dyn Any> {
        self.context
    }
}

/// `write!` support; transport errors surface as `fmt::Error`.
impl<W: Write, T> fmt::Write for CliHandle<'_, W, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_str(self.out, s).map_err(|_| fmt::Error)
    }
}

pub(crate) fn write_str<W: Write>(out: &mut W, s: &str) -> Result<(), W::Error> {
    out.write_all(s.as_bytes())
}

pub(crate) fn write_byte<W: Write>(out: &mut W, byte: u8) -> Result<(), W::Error> {
    out.write_all(&[byte])
}

pub(crate) fn line_break<W: Write>(out: &mut W) -> Result<(), W::Error> {
    write_str(out, LINE_BREAK)
}

/// Blank out `width` columns and return the cursor to the line start.
pub(crate) fn clear_line<W: Write>(out: &mut W, width: usize) -> Result<(), W::Error> {
    write_byte(out, b'\r')?;
    for _ in 0..width {
        write_byte(out, b' ')?;
    }
    write_byte(out, b'\r')
}

/// Erase one glyph to the left of the cursor.
pub(crate) fn erase_glyph<W: Write>(out: &mut W) -> Result<(), W::Error> {
    write_str(out, "\x08 \x08")
}
