//! Human-readable formatting for sizes and scan durations.

use std::time::Duration;

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a scan duration: whole milliseconds below one second, seconds after.
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_secs_f64() * 1000.0;
    let rounded = ms.round();
    if rounded < 1000.0 {
        format!("{rounded:.0} ms")
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}
