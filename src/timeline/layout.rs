use crate::plan::{parse_seconds, TrainingPlan};

use super::flatten::section_seconds;

/// Which durations drive the proportion bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutBasis {
    /// Sum of the section's flattened leaf steps; matches playback timing.
    #[default]
    Flattened,
    /// The section's own declared duration label.
    Declared,
}

/// Percent width for each entry, `seconds / total * 100`. All zeros when the
/// total is zero.
pub fn widths_from_seconds<T>(seconds: &[T]) -> Vec<f64>
where
    T: Copy + Into<u64>,
{
    let total: u64 = seconds.iter().map(|&s| Into::<u64>::into(s)).sum();
    if total == 0 {
        return vec![0.0; seconds.len()];
    }

    seconds
        .iter()
        .map(|&s| Into::<u64>::into(s) as f64 / total as f64 * 100.0)
        .collect()
}

/// Percent width for each section of `plan`.
pub fn section_widths(plan: &TrainingPlan, basis: LayoutBasis) -> Vec<f64> {
    match basis {
        LayoutBasis::Flattened => widths_from_seconds(&section_seconds(plan)),
        LayoutBasis::Declared => {
            let declared: Vec<u32> = plan
                .sections
                .iter()
                .map(|section| parse_seconds(&section.duration))
                .collect();
            widths_from_seconds(&declared)
        }
    }
}
