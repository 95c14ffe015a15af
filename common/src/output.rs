//! User-facing line output.
//!
//! Binaries hand an explicit writer to library code instead of printing, so
//! the text users see can be asserted in tests.

use std::fmt::Display;
use std::io::Write;

/// Writes `message` followed by a newline.
///
/// Output is best effort: a closed pipe must not turn a successful run into a
/// failure, so write errors are logged and otherwise ignored.
pub fn write_line(out: &mut dyn Write, message: impl Display) {
    if let Err(e) = writeln!(out, "{message}") {
        log::debug!("dropping output line: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_line_appends_newline() {
        let mut buffer = Vec::new();
        write_line(&mut buffer, "✓ Created install.sh");
        assert_eq!(buffer, "✓ Created install.sh\n".as_bytes());
    }
}
