pub mod flatten;
pub mod layout;

pub use flatten::{flatten, leaf_count, section_seconds, total_seconds, PlaybackStep};
pub use layout::{section_widths, widths_from_seconds, LayoutBasis};
