//! Plain-text rendering of plans, steps and playback state.

use std::fmt::Write;

use crate::plan::{parse_seconds, Exercise, Movement, TrainingPlan};
use crate::player::{PlaybackSnapshot, PlaybackStatus};
use crate::timeline::{section_seconds, PlaybackStep};

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Outline of the whole plan, composites indented under their titles.
pub fn render_plan(plan: &TrainingPlan) -> String {
    let mut out = String::new();
    let totals = section_seconds(plan);
    let _ = writeln!(
        out,
        "Training plan ({}), {} of playback",
        display_or(&plan.duration, "no duration"),
        format_clock(totals.iter().sum())
    );

    for (index, section) in plan.sections.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} [{}] {} / {}",
            index + 1,
            section.section_type,
            display_or(&section.group, "-"),
            display_or(&section.duration, "?"),
            format_clock(totals[index])
        );
        for exercise in &section.exercises {
            render_exercise(&mut out, exercise, 1);
        }
    }

    out
}

pub fn render_exercise(out: &mut String, exercise: &Exercise, depth: usize) {
    let indent = "  ".repeat(depth);
    match exercise {
        Exercise::Simple(simple) => {
            let reps = simple
                .reps
                .map(|reps| format!(" x{reps}"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{indent}- {} ({}s){reps}",
                simple.title,
                parse_seconds(&simple.duration)
            );
        }
        Exercise::Combo(combo) => {
            let _ = writeln!(
                out,
                "{indent}- {} ({}s) combo of {}",
                combo.title,
                parse_seconds(&combo.duration),
                combo.movements.len()
            );
            for movement in &combo.movements {
                let _ = writeln!(out, "{indent}    * {}", render_movement(movement));
            }
        }
        Exercise::Composite(composite) => {
            let _ = writeln!(
                out,
                "{indent}+ {} ({})",
                composite.title,
                display_or(&composite.duration, "no duration")
            );
            for child in &composite.exercises {
                render_exercise(out, child, depth + 1);
            }
        }
    }
}

pub fn render_movement(movement: &Movement) -> String {
    let mut line = display_or(&movement.description, movement.id.0.as_str()).to_string();
    if !movement.body_part.is_empty() {
        let _ = write!(line, " [{}]", movement.body_part);
    }
    if let Some(video) = &movement.video {
        let _ = write!(line, " video: {video}");
    }
    line
}

/// Proportion bar `columns` wide. Each section is drawn with the first letter of
/// its type; sections too small for a column are dropped.
pub fn render_bar(plan: &TrainingPlan, widths: &[f64], columns: usize) -> String {
    let mut bar = String::new();
    let mut legend = String::new();

    for (section, width) in plan.sections.iter().zip(widths) {
        let cells = (width / 100.0 * columns as f64).round() as usize;
        let mark = section
            .section_type
            .as_str()
            .chars()
            .next()
            .unwrap_or('#');
        bar.extend(std::iter::repeat(mark).take(cells));
        let _ = write!(legend, "{}={} {:.1}%  ", mark, section.section_type, width);
    }

    format!("|{bar}|\n{}", legend.trim_end())
}

pub fn render_step(step: &PlaybackStep, position: usize, count: usize) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "[{}/{}] {}: ",
        position + 1,
        count,
        step.section_type
    );
    for parent in &step.parents {
        let _ = write!(out, "{parent} > ");
    }
    let _ = write!(out, "{} ({})", step.label, format_clock(u64::from(step.seconds)));

    match &step.source {
        Exercise::Simple(simple) => {
            if let Some(reps) = simple.reps {
                let _ = write!(out, " x{reps}");
            }
        }
        Exercise::Combo(combo) => {
            for (index, movement) in combo.movements.iter().enumerate() {
                let _ = write!(out, "\n    {}. {}", index + 1, render_movement(movement));
            }
        }
        // Flattening never yields a composite step.
        Exercise::Composite(_) => {}
    }

    out
}

pub fn render_status(snapshot: &PlaybackSnapshot) -> String {
    let engine = &snapshot.engine;
    match engine.status {
        PlaybackStatus::Idle => "Idle".to_string(),
        PlaybackStatus::Finished => format!(
            "Finished at {} of the timeline",
            format_clock(engine.elapsed_seconds)
        ),
        status => format!(
            "{} {} left in step, {} / {} total",
            status.as_str(),
            format_clock(u64::from(engine.time_left)),
            format_clock(engine.elapsed_seconds),
            format_clock(engine.total_seconds)
        ),
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
