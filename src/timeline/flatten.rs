use serde::Serialize;

use crate::plan::{parse_seconds, Exercise, SectionType, TrainingPlan};

/// One atomic unit of playback time.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStep {
    pub section_index: usize,
    pub section_type: SectionType,
    pub label: String,
    pub seconds: u32,
    /// Titles of the composite exercises enclosing this step, outermost first.
    pub parents: Vec<String>,
    /// The leaf exercise this step was built from (Simple or Combo).
    pub source: Exercise,
}

/// Expands the plan into its leaf steps, in playback order.
///
/// Composite exercises never produce a step of their own; their children are
/// spliced in where the composite sits, at any depth.
pub fn flatten(plan: &TrainingPlan) -> Vec<PlaybackStep> {
    let mut steps = Vec::new();
    let mut parents = Vec::new();

    for (section_index, section) in plan.sections.iter().enumerate() {
        for exercise in &section.exercises {
            push_steps(
                exercise,
                section_index,
                &section.section_type,
                &mut parents,
                &mut steps,
            );
        }
    }

    steps
}

fn push_steps(
    exercise: &Exercise,
    section_index: usize,
    section_type: &SectionType,
    parents: &mut Vec<String>,
    steps: &mut Vec<PlaybackStep>,
) {
    match exercise {
        Exercise::Simple(_) | Exercise::Combo(_) => steps.push(PlaybackStep {
            section_index,
            section_type: section_type.clone(),
            label: exercise.title().to_string(),
            seconds: parse_seconds(exercise.duration()),
            parents: parents.clone(),
            source: exercise.clone(),
        }),
        Exercise::Composite(composite) => {
            parents.push(composite.title.clone());
            for child in &composite.exercises {
                push_steps(child, section_index, section_type, parents, steps);
            }
            parents.pop();
        }
    }
}

/// Sum of step durations in seconds.
pub fn total_seconds(steps: &[PlaybackStep]) -> u64 {
    steps.iter().map(|step| u64::from(step.seconds)).sum()
}

/// Number of playback steps an exercise expands to.
pub fn leaf_count(exercise: &Exercise) -> usize {
    match exercise {
        Exercise::Simple(_) | Exercise::Combo(_) => 1,
        Exercise::Composite(composite) => composite.exercises.iter().map(leaf_count).sum(),
    }
}

/// Flattened seconds per section, one entry per section (zero when a section has
/// no steps).
pub fn section_seconds(plan: &TrainingPlan) -> Vec<u64> {
    let mut totals = vec![0u64; plan.sections.len()];
    for step in flatten(plan) {
        totals[step.section_index] += u64::from(step.seconds);
    }
    totals
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::plan::strategies::arb_plan;
    use proptest::prelude::*;

    fn leaf_seconds(exercise: &Exercise) -> u64 {
        match exercise {
            Exercise::Simple(_) | Exercise::Combo(_) => u64::from(parse_seconds(exercise.duration())),
            Exercise::Composite(composite) => composite.exercises.iter().map(leaf_seconds).sum(),
        }
    }

    proptest! {
        #[test]
        fn flattened_seconds_match_leaves(plan in arb_plan()) {
            let steps = flatten(&plan);
            let expected: u64 = plan
                .sections
                .iter()
                .flat_map(|section| section.exercises.iter())
                .map(leaf_seconds)
                .sum();
            prop_assert_eq!(total_seconds(&steps), expected);
            prop_assert_eq!(section_seconds(&plan).iter().sum::<u64>(), expected);
        }

        #[test]
        fn step_count_matches_leaf_count(plan in arb_plan()) {
            let steps = flatten(&plan);
            let leaves: usize = plan
                .sections
                .iter()
                .flat_map(|section| section.exercises.iter())
                .map(leaf_count)
                .sum();
            prop_assert_eq!(steps.len(), leaves);
            prop_assert!(steps.iter().all(|step| !matches!(step.source, Exercise::Composite(_))));
            prop_assert!(steps
                .windows(2)
                .all(|pair| pair[0].section_index <= pair[1].section_index));
        }
    }
}
