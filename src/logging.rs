//! `tracing` output. In the browser each formatted line goes to
//! `console.log`; on native targets it goes to stderr.

use std::io;

use tracing_subscriber::EnvFilter;

/// Buffers one formatted event and flushes it as a single console line on drop.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        emit_line(line.trim_end());
    }
}

#[cfg(target_arch = "wasm32")]
fn emit_line(line: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
}

#[cfg(not(target_arch = "wasm32"))]
fn emit_line(line: &str) {
    eprintln!("{line}");
}

/// Install the global subscriber with an `EnvFilter` directive such as
/// `"find_meow=debug"`. Returns false if a subscriber was already set or the
/// directive does not parse.
pub fn init(directive: &str) -> bool {
    let Ok(filter) = EnvFilter::try_new(directive) else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_writer_buffers_until_drop() {
        let mut w = ConsoleWriter::default();
        w.write_all(b"scan ").unwrap();
        w.write_all(b"started\n").unwrap();
        assert_eq!(w.buf, b"scan started\n");
    }

    #[test]
    fn test_bad_directive_is_rejected() {
        assert!(!init("find_meow=notalevel"));
    }
}
