// src/models/answer.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::assignment::{Assignment, QuestionId};

/// A learner's answer to one question.
/// Serialised as a bare JSON string or a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(BTreeSet<String>),
}

impl AnswerValue {
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Choices(choices) => choices.is_empty(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        AnswerValue::Text(text.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        AnswerValue::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
}

/// In-progress answer set for one attempt.
/// Persisted locally as `{"answers": [...]}` so it survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub answers: Vec<AnswerEntry>,
}

impl Draft {
    /// One empty entry per question, in declaration order.
    pub fn blank(assignment: &Assignment) -> Result<Self, AppError> {
        let ids = assignment.question_ids()?;

        let answers = ids
            .into_iter()
            .zip(&assignment.questions)
            .map(|(question_id, question)| AnswerEntry {
                question_id,
                answer: if question.is_multi_select() {
                    AnswerValue::Choices(BTreeSet::new())
                } else {
                    AnswerValue::Text(String::new())
                },
            })
            .collect();

        Ok(Self { answers })
    }

    pub fn get(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|entry| entry.question_id == question_id)
            .map(|entry| &entry.answer)
    }

    /// Replaces the answer for `question_id`, appending an entry if none exists.
    pub fn set(&mut self, question_id: QuestionId, answer: AnswerValue) {
        match self
            .answers
            .iter_mut()
            .find(|entry| entry.question_id == question_id)
        {
            Some(entry) => entry.answer = answer,
            None => self.answers.push(AnswerEntry {
                question_id,
                answer,
            }),
        }
    }

    /// Adds `option` to a multi-select answer, or removes it if present.
    /// Returns `false` (and changes nothing) when there is no set-valued
    /// entry for `question_id`.
    pub fn toggle(&mut self, question_id: QuestionId, option: &str) -> bool {
        let Some(entry) = self
            .answers
            .iter_mut()
            .find(|entry| entry.question_id == question_id)
        else {
            return false;
        };

        match &mut entry.answer {
            AnswerValue::Choices(choices) => {
                if !choices.remove(option) {
                    choices.insert(option.to_string());
                }
                true
            }
            AnswerValue::Text(_) => false,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|e| !e.answer.is_blank()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_assignment() -> Assignment {
        serde_json::from_value(json!({
            "id": "a1",
            "title": "Mixed",
            "questions": [
                { "type": "MULTIPLE_CHOICE", "prompt": "One", "options": ["A", "B"], "correctAnswer": "B" },
                { "type": "MULTIPLE_CHOICE", "prompt": "Many", "options": ["A", "B", "C"], "correctAnswer": ["A", "C"] },
                { "type": "ESSAY", "prompt": "Discuss" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_blank_draft_matches_questions() {
        let draft = Draft::blank(&sample_assignment()).unwrap();

        assert_eq!(draft.answers.len(), 3);
        assert_eq!(draft.answers[0].answer, AnswerValue::Text(String::new()));
        assert_eq!(draft.answers[1].answer, AnswerValue::Choices(BTreeSet::new()));
        assert_eq!(draft.answers[2].question_id, QuestionId(2));
        assert_eq!(draft.answered_count(), 0);
    }

    #[test]
    fn test_set_replaces_or_appends() {
        let mut draft = Draft::blank(&sample_assignment()).unwrap();

        draft.set(QuestionId(0), "B".into());
        draft.set(QuestionId(9), "orphan".into());

        assert_eq!(draft.get(QuestionId(0)), Some(&AnswerValue::from("B")));
        assert_eq!(draft.answers.len(), 4);
        assert_eq!(draft.answered_count(), 2);
    }

    #[test]
    fn test_toggle_twice_restores_previous_state() {
        let mut draft = Draft::blank(&sample_assignment()).unwrap();
        draft.toggle(QuestionId(1), "C");
        let before = draft.clone();

        assert!(draft.toggle(QuestionId(1), "A"));
        assert_ne!(draft, before);
        assert!(draft.toggle(QuestionId(1), "A"));
        assert_eq!(draft, before);

        // Removing an existing choice and adding it back is also a no-op overall.
        draft.toggle(QuestionId(1), "C");
        draft.toggle(QuestionId(1), "C");
        assert_eq!(draft, before);
    }

    #[test]
    fn test_toggle_ignores_missing_and_single_valued_entries() {
        let mut draft = Draft::blank(&sample_assignment()).unwrap();
        let before = draft.clone();

        assert!(!draft.toggle(QuestionId(42), "A"));
        assert!(!draft.toggle(QuestionId(0), "A"));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_draft_wire_shape() {
        let mut draft = Draft::blank(&sample_assignment()).unwrap();
        draft.set(QuestionId(0), "B".into());
        draft.toggle(QuestionId(1), "C");

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            json!({ "answers": [
                { "questionId": 0, "answer": "B" },
                { "questionId": 1, "answer": ["C"] },
                { "questionId": 2, "answer": "" }
            ]})
        );
    }
}
