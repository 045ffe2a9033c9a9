//! Wire models for generated training plans.
//!
//! These mirror the payloads returned by the generation service. Everything here
//! is immutable once received; a new plan replaces the old one wholesale.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Movement identifier. The service sends either strings or integers, so both are
/// normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MovementId(pub String);

impl<'de> Deserialize<'de> for MovementId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => MovementId(text),
            RawId::Number(number) => MovementId(number.to_string()),
        })
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Probabilistic successor edge. Only the generator reads `chance`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovementLink {
    pub movement_id: MovementId,
    pub chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: MovementId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body_part: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default)]
    pub after: Vec<MovementLink>,
    #[serde(default)]
    pub excludes: BTreeSet<MovementId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleExercise {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComboExercise {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

/// An exercise made of further exercises. Its own `duration` is display text;
/// playback time comes from the leaves underneath it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositeExercise {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Exercise {
    #[serde(alias = "simple", alias = "SIMPLE")]
    Simple(SimpleExercise),
    #[serde(alias = "combo", alias = "COMBO")]
    Combo(ComboExercise),
    #[serde(alias = "composite", alias = "COMPOSITE")]
    Composite(CompositeExercise),
}

impl Exercise {
    pub fn title(&self) -> &str {
        match self {
            Exercise::Simple(simple) => &simple.title,
            Exercise::Combo(combo) => &combo.title,
            Exercise::Composite(composite) => &composite.title,
        }
    }

    pub fn duration(&self) -> &str {
        match self {
            Exercise::Simple(simple) => &simple.duration,
            Exercise::Combo(combo) => &combo.duration,
            Exercise::Composite(composite) => &composite.duration,
        }
    }
}

/// Section label. Unknown labels from newer generators are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionType {
    Warmup,
    Calisthenics,
    Workout,
    Combo,
    Cooldown,
    Close,
    Other(String),
}

impl SectionType {
    pub fn as_str(&self) -> &str {
        match self {
            SectionType::Warmup => "Warmup",
            SectionType::Calisthenics => "Calisthenics",
            SectionType::Workout => "Workout",
            SectionType::Combo => "Combo",
            SectionType::Cooldown => "Cooldown",
            SectionType::Close => "Close",
            SectionType::Other(label) => label,
        }
    }
}

impl From<String> for SectionType {
    fn from(label: String) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "warmup" => SectionType::Warmup,
            "calisthenics" => SectionType::Calisthenics,
            "workout" => SectionType::Workout,
            "combo" => SectionType::Combo,
            "cooldown" => SectionType::Cooldown,
            "close" => SectionType::Close,
            _ => SectionType::Other(label),
        }
    }
}

impl From<SectionType> for String {
    fn from(section_type: SectionType) -> Self {
        section_type.as_str().to_string()
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl TrainingPlan {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Wraps a standalone combo in a single implicit `Combo` section.
    pub fn from_combo(combo: StandaloneCombo) -> Self {
        let title = if combo.title.is_empty() {
            SectionType::Combo.to_string()
        } else {
            combo.title
        };

        Self {
            duration: combo.duration.clone(),
            sections: vec![Section {
                section_type: SectionType::Combo,
                duration: combo.duration.clone(),
                group: String::new(),
                exercises: vec![Exercise::Combo(ComboExercise {
                    reference: combo.reference,
                    title,
                    duration: combo.duration,
                    movements: combo.movements,
                })],
            }],
        }
    }
}

/// Payload of the standalone combo endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneCombo {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_PLAN: &str = r#"{
        "duration": "45 min",
        "sections": [
            {
                "type": "Warmup",
                "duration": "5 min",
                "group": "circuit",
                "exercises": [
                    { "kind": "Simple", "ref": "w1", "title": "Jumping jacks", "duration": "30s", "reps": 20 }
                ]
            },
            {
                "type": "Stretching",
                "duration": "2 min",
                "group": "pairs",
                "exercises": [
                    {
                        "kind": "composite",
                        "ref": "c1",
                        "title": "Ladder",
                        "duration": "90s",
                        "exercises": [
                            { "kind": "Simple", "ref": "s1", "title": "Lunge", "duration": "20s" },
                            {
                                "kind": "Combo",
                                "ref": "k1",
                                "title": "Jab cross",
                                "duration": "15s",
                                "movements": [
                                    {
                                        "id": 7,
                                        "description": "Jab",
                                        "bodyPart": "arms",
                                        "after": [{ "movementId": "8", "chance": 0.5 }],
                                        "excludes": [9]
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_nested_plan() {
        let plan: TrainingPlan = serde_json::from_str(NESTED_PLAN).unwrap();

        assert_eq!(plan.sections.len(), 2);
        assert_eq!(plan.sections[0].section_type, SectionType::Warmup);
        assert_eq!(
            plan.sections[1].section_type,
            SectionType::Other("Stretching".to_string())
        );

        match &plan.sections[0].exercises[0] {
            Exercise::Simple(simple) => {
                assert_eq!(simple.reference, "w1");
                assert_eq!(simple.reps, Some(20));
            }
            other => panic!("expected simple exercise, got {other:?}"),
        }

        let Exercise::Composite(composite) = &plan.sections[1].exercises[0] else {
            panic!("expected composite exercise");
        };
        assert_eq!(composite.exercises.len(), 2);

        let Exercise::Combo(combo) = &composite.exercises[1] else {
            panic!("expected combo exercise");
        };
        let jab = &combo.movements[0];
        assert_eq!(jab.id, MovementId("7".to_string()));
        assert_eq!(jab.after[0].movement_id, MovementId("8".to_string()));
        assert!(jab.excludes.contains(&MovementId("9".to_string())));
        assert!(jab.picture.is_none());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let plan: TrainingPlan = serde_json::from_str("{}").unwrap();
        assert!(plan.is_empty());

        let section: Section = serde_json::from_str(r#"{ "type": "Close" }"#).unwrap();
        assert!(section.exercises.is_empty());
        assert_eq!(section.section_type, SectionType::Close);
    }

    #[test]
    fn test_section_type_round_trips_unknown_labels() {
        let json = serde_json::to_string(&SectionType::Other("Mobility".into())).unwrap();
        assert_eq!(json, "\"Mobility\"");
        let json = serde_json::to_string(&SectionType::Cooldown).unwrap();
        assert_eq!(json, "\"Cooldown\"");
    }

    #[test]
    fn test_unknown_exercise_kind_is_rejected() {
        let result: Result<Exercise, _> =
            serde_json::from_str(r#"{ "kind": "Superset", "title": "x", "duration": "1s" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_combo_builds_single_section() {
        let combo: StandaloneCombo = serde_json::from_str(
            r#"{ "duration": "40s", "movements": [{ "id": "a" }, { "id": "b" }] }"#,
        )
        .unwrap();
        let plan = TrainingPlan::from_combo(combo);

        assert_eq!(plan.sections.len(), 1);
        assert_eq!(plan.sections[0].section_type, SectionType::Combo);
        let Exercise::Combo(exercise) = &plan.sections[0].exercises[0] else {
            panic!("expected combo exercise");
        };
        assert_eq!(exercise.title, "Combo");
        assert_eq!(exercise.duration, "40s");
        assert_eq!(exercise.movements.len(), 2);
    }
}
