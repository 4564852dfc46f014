// Console passthrough for child output
use std::io::Write;

use failmap_core::port::OutputObserver;

/// Echoes every line to this process's stdout as soon as it arrives
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutEcho;

impl OutputObserver for StdoutEcho {
    fn on_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed console must not abort the capture
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }
}
