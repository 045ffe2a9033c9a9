//! Duration label parsing.
//!
//! Labels such as `"45s"` or `"2 min"` are reduced to the first run of decimal
//! digits. Units are not interpreted, so `"2 min"` is 2 seconds. Total-time
//! contracts downstream depend on this, so keep it.

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Returns the first contiguous digit run in `label` as seconds, or 0 if none.
pub fn parse_seconds(label: &str) -> u32 {
    let digits: &str = match label.find(|c: char| c.is_ascii_digit()) {
        Some(start) => {
            let rest = &label[start..];
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        }
        None => {
            log_debug!("duration label {:?} has no digits, using 0s", label);
            return 0;
        }
    };

    // Only overflow can fail here; saturate rather than reset to zero.
    digits.parse::<u32>().unwrap_or(u32::MAX)
}
