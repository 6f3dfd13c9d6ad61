// LLM prompts for the AI assistance module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub const GENERAL_REVIEW_SYSTEM: &str = "You are an experienced technical recruiting manager. \
    Review the resume against the job description and give a professional evaluation of \
    whether the candidate's profile fits the role. \
    Highlight the candidate's strengths and weaknesses relative to the stated requirements.";

pub const SKILLS_REVIEW_SYSTEM: &str = "You are a technical recruiting manager. \
    Assess the resume in light of the job description and judge the candidate's suitability \
    for the role. Then advise on how the candidate can strengthen their skills and name the \
    areas that need improvement.";

pub const KEYWORDS_REVIEW_SYSTEM: &str = "You are an applicant tracking system (ATS) scanner \
    with a recruiter's judgement. Evaluate the resume against the job description, list the \
    keywords from the job description that are missing from the resume, and recommend which \
    skills the candidate should develop.";

pub const MATCH_PERCENTAGE_SYSTEM: &str = "You are an applicant tracking system (ATS) scanner \
    with a recruiter's judgement. Evaluate the resume against the job description. \
    Start your answer with the match percentage, then list the missing keywords, \
    and finish with your final thoughts.";

/// User turn for a resume review.
pub fn resume_review_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "<resume>\n{resume_text}\n</resume>\n\n<job_description>\n{job_description}\n</job_description>"
    )
}

pub const INTERVIEW_PREP_SYSTEM_BASE: &str = "You are an experienced technical interview \
    specialist and career coach.";

/// System prompt for interview question generation.
pub fn interview_prep_system() -> String {
    format!("{INTERVIEW_PREP_SYSTEM_BASE} {JSON_ONLY_SYSTEM}")
}

/// User turn for interview question generation.
pub fn interview_prep_prompt(
    target_role: &str,
    years_experience: &str,
    topics: &str,
    description: &str,
    question_count: usize,
) -> String {
    let topics = if topics.is_empty() {
        "General topics relevant to the role"
    } else {
        topics
    };
    let description = if description.is_empty() {
        "No additional description provided"
    } else {
        description
    };

    format!(
        r#"Generate exactly {question_count} interview questions for a candidate preparing for this role.

- Target role: {target_role}
- Years of experience: {years_experience}
- Topics to focus on: {topics}
- Additional description: {description}

The questions must be relevant to the role and the experience level, cover the topics above,
and mix technical, behavioral and situational questions.

For each question give a detailed explanation: why the question matters, what the interviewer
is looking for, tips for answering well, and common mistakes to avoid.

Return a JSON array of exactly {question_count} objects with this schema:
[
  {{"question": "...", "explanation": "..."}}
]"#
    )
}
