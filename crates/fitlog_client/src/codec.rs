//! Mapping between entities and store documents.
//!
//! The entity id is the document key: [`encode`] drops it from the body and
//! [`decode`] re-attaches it from the document. Date fields listed in
//! [`Entity::DATE_FIELDS`] go through [`Timestamp`]; an unset optional date
//! is written as an explicit `null` and read back as `None`.

use crate::FitlogError;
use crate::models::{
    BodyMeasurement, Exercise, Goal, MuscleGrowthSimulation, UserProfile, WorkoutSession,
};
use crate::store::{Fields, StoredDocument, Value};
use crate::timestamp::Timestamp;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    const DATE_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! entity {
    ($ty:ty, $collection:literal, [$($date:literal),*]) => {
        impl Entity for $ty {
            const COLLECTION: &'static str = $collection;
            const DATE_FIELDS: &'static [&'static str] = &[$($date),*];

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

entity!(UserProfile, "users", ["createdAt", "updatedAt"]);
entity!(Exercise, "exercises", []);
entity!(WorkoutSession, "workoutSessions", ["date"]);
entity!(Goal, "goals", ["createdAt", "updatedAt", "targetDate"]);
entity!(MuscleGrowthSimulation, "muscleSimulations", ["date"]);
entity!(BodyMeasurement, "bodyMeasurements", ["date"]);

/// Document body for `entity`, without its id.
pub fn encode<E: Entity>(entity: &E) -> Result<Fields, FitlogError> {
    let mut object = match serde_json::to_value(entity)? {
        serde_json::Value::Object(object) => object,
        other => {
            return Err(FitlogError::Decode(format!(
                "{} must serialize to an object, got {other}",
                E::COLLECTION
            )));
        }
    };
    object.remove("id");

    let mut fields = Fields::new();
    for &name in E::DATE_FIELDS {
        let value = match object.remove(name) {
            None | Some(serde_json::Value::Null) => Value::Null,
            Some(raw) => {
                let date: DateTime<Utc> = serde_json::from_value(raw)?;
                Value::Timestamp(Timestamp::from_date(date))
            }
        };
        fields.insert(name.to_string(), value);
    }
    for (name, raw) in object {
        fields.insert(name, Value::from_json(raw));
    }
    Ok(fields)
}

/// Entity stored in `doc`, with its id taken from the document key.
pub fn decode<E: Entity>(doc: StoredDocument) -> Result<E, FitlogError> {
    let mut object = serde_json::Map::new();
    for (name, value) in doc.fields {
        if !E::DATE_FIELDS.contains(&name.as_str()) {
            object.insert(name, value.into_json());
            continue;
        }
        match value {
            Value::Timestamp(ts) => {
                object.insert(name, serde_json::to_value(ts.to_date())?);
            }
            Value::Null => {}
            other => {
                return Err(FitlogError::Decode(format!(
                    "{}/{}: field `{name}` is not a timestamp: {other:?}",
                    E::COLLECTION,
                    doc.id
                )));
            }
        }
    }
    object.insert("id".into(), serde_json::Value::String(doc.id.clone()));
    serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| {
        FitlogError::Decode(format!("{}/{}: {e}", E::COLLECTION, doc.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalCategory, MuscleGroup, WorkoutExercise, WorkoutSet};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn goal() -> Goal {
        Goal {
            id: "g1".into(),
            user_id: "u1".into(),
            title: "Bench 100kg".into(),
            description: None,
            target_date: None,
            target_value: Some(100.0),
            current_value: Some(80.0),
            unit: Some("kg".into()),
            completed: false,
            category: GoalCategory::Strength,
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn encode_strips_id_and_converts_dates() {
        let fields = encode(&goal()).unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["userId"], Value::from("u1"));
        assert_eq!(
            fields["createdAt"],
            Value::Timestamp(Timestamp::parse("2024-01-10T09:00:00Z").unwrap())
        );
        assert_eq!(fields["targetValue"], Value::Double(100.0));
        assert_eq!(fields["category"], Value::from("strength"));
    }

    #[test]
    fn unset_optional_date_is_written_as_null_marker() {
        let fields = encode(&goal()).unwrap();
        assert_eq!(fields["targetDate"], Value::Null);
        // other unset optionals are simply not written
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn decode_reattaches_id_and_drops_null_dates() {
        let original = goal();
        let doc = StoredDocument {
            id: "g1".into(),
            fields: encode(&original).unwrap(),
        };
        let decoded: Goal = decode(doc).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.target_date, None);
    }

    #[test]
    fn decode_rejects_non_timestamp_dates() {
        let mut fields = encode(&goal()).unwrap();
        fields.insert("createdAt".into(), Value::from("2024-01-10"));
        let err = decode::<Goal>(StoredDocument {
            id: "g1".into(),
            fields,
        })
        .unwrap_err();
        assert!(matches!(err, FitlogError::Decode(msg) if msg.contains("createdAt")));
    }

    #[test]
    fn decode_reports_missing_required_fields() {
        let err = decode::<Exercise>(StoredDocument {
            id: "e1".into(),
            fields: Fields::from([("name".to_string(), Value::from("Squat"))]),
        })
        .unwrap_err();
        assert!(matches!(err, FitlogError::Decode(msg) if msg.starts_with("exercises/e1")));
    }

    #[test]
    fn workout_exercise_order_survives_the_round_trip() {
        let set = |reps| WorkoutSet {
            reps,
            weight: Some(60.0),
            duration: None,
            rest_time: Some(90),
            completed: true,
        };
        let session = WorkoutSession {
            id: "w1".into(),
            user_id: "u1".into(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap(),
            duration: 50,
            exercises: vec![
                WorkoutExercise {
                    exercise_id: "squat".into(),
                    exercise_name: "Squat".into(),
                    sets: vec![set(5), set(5), set(3)],
                },
                WorkoutExercise {
                    exercise_id: "plank".into(),
                    exercise_name: "Plank".into(),
                    sets: vec![WorkoutSet {
                        reps: 1,
                        weight: None,
                        duration: Some(60),
                        rest_time: None,
                        completed: false,
                    }],
                },
            ],
            notes: Some("felt strong".into()),
            rating: Some(4),
        };
        let fields = encode(&session).unwrap();
        let decoded: WorkoutSession = decode(StoredDocument {
            id: "w1".into(),
            fields,
        })
        .unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn simulation_map_round_trips() {
        let sim = MuscleGrowthSimulation {
            id: "s1".into(),
            user_id: "u1".into(),
            date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            muscle_groups: BTreeMap::from([(MuscleGroup::Arms, 35.0), (MuscleGroup::FullBody, 10.0)]),
            image_url: Some("https://img.example/s1.png".into()),
            previous_image_url: None,
        };
        let fields = encode(&sim).unwrap();
        let Value::Map(groups) = &fields["muscleGroups"] else {
            panic!("expected map");
        };
        assert_eq!(groups["fullBody"], Value::Double(10.0));
        let decoded: MuscleGrowthSimulation = decode(StoredDocument {
            id: "s1".into(),
            fields,
        })
        .unwrap();
        assert_eq!(decoded, sim);
    }
}
