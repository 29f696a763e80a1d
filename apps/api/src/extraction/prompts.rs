// Prompt constants for résumé extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role statement for résumé extraction. The JSON-only fragment is appended at call time.
pub const RESUME_PARSE_SYSTEM: &str =
    "You are a helpful assistant that extracts structured resume data for HR systems.";

/// Résumé extraction prompt template. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"From the following resume text, extract and return a valid JSON object with the following fields:

- summary: A brief 1-3 line professional summary.
- experienceLevel: One of the following values: "Internship", "Entry level", "Associate", "Mid-Senior level", "Executive", "Director".
- skills: A complete list of all relevant skills and technologies found anywhere in the resume. Each item must be in the format "SkillName (type or description)".
- certifications: List of all certifications, especially English language certifications (such as TOEIC, IELTS, TOEFL, CEFR levels: B1, B2, C1, etc.). Each certification must be an object with the following fields:
    - name (e.g., TOEIC, IELTS)
    - score (e.g., 850, 7.5, B2)
    - issuer (if available)
  Always include the score if mentioned in the resume.
- education: List of objects with fields: degree, school, graduationYear.
- workExperience: List of objects with fields: company, role, duration, description.
- awards: List of strings (if any).
- projects: List of objects with fields: name, description, technologies, role, url (if available).

Ensure that all relevant information is extracted, even if it is embedded in job descriptions, project content, certifications, or education history. Do not omit any skill or important detail that appears anywhere in the resume.
Only return the JSON object. Do not include any explanation or formatting outside the JSON.

Resume text:
{resume_text}
"#;
