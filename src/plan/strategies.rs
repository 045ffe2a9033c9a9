//! Arbitrary plans for property tests.

use proptest::prelude::*;

use super::{
    ComboExercise, CompositeExercise, Exercise, Section, SectionType, SimpleExercise,
    TrainingPlan,
};

/// Labels as generators write them, plus blanks and digit-free text.
pub fn arb_duration() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..600).prop_map(|seconds| format!("{seconds}s")),
        (1u32..30).prop_map(|minutes| format!("{minutes} min")),
        Just(String::new()),
        "[a-z ]{0,8}",
    ]
}

fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,10}"
}

fn arb_leaf() -> impl Strategy<Value = Exercise> {
    prop_oneof![
        (arb_title(), arb_duration(), proptest::option::of(1u32..30)).prop_map(
            |(title, duration, reps)| {
                Exercise::Simple(SimpleExercise {
                    reference: String::new(),
                    title,
                    duration,
                    reps,
                })
            }
        ),
        (arb_title(), arb_duration()).prop_map(|(title, duration)| {
            Exercise::Combo(ComboExercise {
                reference: String::new(),
                title,
                duration,
                movements: Vec::new(),
            })
        }),
    ]
}

/// Simple and Combo leaves under composites nested up to four deep.
pub fn arb_exercise() -> impl Strategy<Value = Exercise> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        (
            arb_title(),
            arb_duration(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(title, duration, exercises)| {
                Exercise::Composite(CompositeExercise {
                    reference: String::new(),
                    title,
                    duration,
                    exercises,
                })
            })
    })
}

fn arb_section_type() -> impl Strategy<Value = SectionType> {
    prop_oneof![
        Just(SectionType::Warmup),
        Just(SectionType::Calisthenics),
        Just(SectionType::Workout),
        Just(SectionType::Combo),
        Just(SectionType::Cooldown),
        Just(SectionType::Close),
    ]
}

pub fn arb_plan() -> impl Strategy<Value = TrainingPlan> {
    let section = (
        arb_section_type(),
        arb_duration(),
        prop::collection::vec(arb_exercise(), 0..4),
    )
        .prop_map(|(section_type, duration, exercises)| Section {
            section_type,
            duration,
            group: String::new(),
            exercises,
        });

    prop::collection::vec(section, 0..5).prop_map(|sections| TrainingPlan {
        duration: String::new(),
        sections,
    })
}
