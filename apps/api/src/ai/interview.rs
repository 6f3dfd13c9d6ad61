//! Interview preparation: a fixed-size set of questions with coaching notes.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::ai::prompts::{interview_prep_prompt, interview_prep_system};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

pub const QUESTION_COUNT: usize = 10;
const MAX_PREP_FIELD_CHARS: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewPrepRequest {
    #[serde(default)]
    pub target_role: String,
    /// Free text ("3", "5+", "senior"); numbers are accepted too.
    #[serde(default, deserialize_with = "string_or_number")]
    pub years_experience: String,
    #[serde(default)]
    pub topics: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub explanation: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

impl InterviewPrepRequest {
    /// Trims every field, then reports all violations at once.
    pub fn normalized(mut self) -> Result<Self, AppError> {
        for field in [
            &mut self.target_role,
            &mut self.years_experience,
            &mut self.topics,
            &mut self.description,
        ] {
            *field = field.trim().to_string();
        }

        let mut violations = Vec::new();
        if self.target_role.is_empty() {
            violations.push("target_role is required".to_string());
        }
        if self.years_experience.is_empty() {
            violations.push("years_experience is required".to_string());
        }
        for (name, value) in [
            ("target_role", &self.target_role),
            ("years_experience", &self.years_experience),
            ("topics", &self.topics),
            ("description", &self.description),
        ] {
            if value.chars().count() > MAX_PREP_FIELD_CHARS {
                violations.push(format!(
                    "{name} cannot be more than {MAX_PREP_FIELD_CHARS} characters"
                ));
            }
        }

        if violations.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Validation(violations.join(", ")))
        }
    }
}

pub async fn generate_questions(
    llm: &LlmClient,
    request: &InterviewPrepRequest,
) -> Result<Vec<InterviewQuestion>, AppError> {
    let prompt = interview_prep_prompt(
        &request.target_role,
        &request.years_experience,
        &request.topics,
        &request.description,
        QUESTION_COUNT,
    );
    let questions: Vec<InterviewQuestion> = llm
        .call_json(&prompt, &interview_prep_system())
        .await
        .map_err(|e| AppError::Llm(format!("Interview question generation failed: {e}")))?;

    let questions = check_question_set(questions)?;
    info!(
        "Generated {} interview questions for {}",
        questions.len(),
        request.target_role
    );
    Ok(questions)
}

/// Exactly `QUESTION_COUNT` questions, each with non-blank text.
fn check_question_set(questions: Vec<InterviewQuestion>) -> Result<Vec<InterviewQuestion>, AppError> {
    if questions.len() != QUESTION_COUNT {
        return Err(AppError::Llm(format!(
            "Expected {QUESTION_COUNT} interview questions, got {}",
            questions.len()
        )));
    }
    if let Some(index) = questions
        .iter()
        .position(|q| q.question.trim().is_empty() || q.explanation.trim().is_empty())
    {
        return Err(AppError::Llm(format!(
            "Interview question at index {index} is incomplete"
        )));
    }
    Ok(questions)
}
