use log::error;
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, QUIZ_DATA_KEY};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gender {
    #[default]
    #[serde(rename = "HOMBRE")]
    Hombre,
    #[serde(rename = "MUJER")]
    Mujer,
}

impl Gender {
    /// Pronoun for the ex-partner, lowercase.
    pub fn partner_pronoun(self) -> &'static str {
        match self {
            Gender::Hombre => "ella",
            Gender::Mujer => "él",
        }
    }

    pub fn partner_pronoun_capitalized(self) -> &'static str {
        match self {
            Gender::Hombre => "Ella",
            Gender::Mujer => "Él",
        }
    }
}

/// Answers written by the quiz steps. Read-only from the result page.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizAnswers {
    pub gender: Gender,
    pub time_separation: Option<String>,
    pub who_ended: Option<String>,
    pub current_situation: Option<String>,
    pub commitment_level: Option<String>,
}

pub fn load_quiz_answers(store: &dyn KeyValueStore) -> QuizAnswers {
    let Some(raw) = store.get(QUIZ_DATA_KEY) else {
        return QuizAnswers::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        error!("Stored quiz answers are unreadable: {}", e);
        QuizAnswers::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_camel_case_record() {
        let store = MemoryStorage::new().with_item(
            QUIZ_DATA_KEY,
            r#"{"gender":"MUJER","timeSeparation":"1-3 meses","currentSituation":"ME IGNORA","extra":1}"#,
        );
        assert_eq!(
            load_quiz_answers(&store),
            QuizAnswers {
                gender: Gender::Mujer,
                time_separation: Some("1-3 meses".into()),
                who_ended: None,
                current_situation: Some("ME IGNORA".into()),
                commitment_level: None,
            }
        );
    }

    #[test]
    fn missing_gender_defaults_to_hombre() {
        let store = MemoryStorage::new().with_item(QUIZ_DATA_KEY, r#"{"whoEnded":"Ella"}"#);
        let answers = load_quiz_answers(&store);
        assert_eq!(answers.gender, Gender::Hombre);
        assert_eq!(answers.who_ended.as_deref(), Some("Ella"));
    }

    #[test]
    fn corrupt_record_falls_back_to_default() {
        let store = MemoryStorage::new().with_item(QUIZ_DATA_KEY, "{not json");
        assert_eq!(load_quiz_answers(&store), QuizAnswers::default());
    }
}
