pub mod duration;
pub mod models;
#[cfg(test)]
pub(crate) mod strategies;

pub use duration::parse_seconds;
pub use models::{
    ComboExercise, CompositeExercise, Exercise, Movement, MovementId, MovementLink, Section,
    SectionType, SimpleExercise, StandaloneCombo, TrainingPlan,
};
