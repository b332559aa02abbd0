/// Predefined prompts for resume analysis
pub const SYSTEM_PROMPT: &str = "You are a seasoned career advisor and resume expert.";

const RESUME_PLACEHOLDER: &str = "{resume_text}";
const ANALYSIS_PLACEHOLDER: &str = "{analysis}";
const QUESTION_PLACEHOLDER: &str = "{question}";

pub const RESUME_ANALYSIS_TEMPLATE: &str = "You are a seasoned career advisor and resume expert. \
Analyze the resume provided below and perform the following tasks:
1. Identify the candidate's key skills and competencies.
2. Highlight the strengths and areas for improvement in the resume.
3. Provide actionable suggestions for formatting, content, and clarity enhancements.

Resume:
{resume_text}

Please provide your analysis in a clear and concise manner.";

pub const FOLLOWUP_TEMPLATE: &str = "You are a seasoned career advisor and resume expert. \
The following is the previous analysis of a candidate's resume:
{analysis}

Now, the candidate has a follow-up question: {question}

Please provide detailed, actionable suggestions on how to improve the resume based on this question.";

/// Render the initial analysis prompt around the full resume text.
pub fn build_analysis_prompt(resume_text: &str) -> String {
    fill(RESUME_ANALYSIS_TEMPLATE, &[(RESUME_PLACEHOLDER, resume_text)])
}

/// Render a follow-up prompt from the prior feedback and the user's question.
pub fn build_followup_prompt(prior_feedback: &str, question: &str) -> String {
    fill(
        FOLLOWUP_TEMPLATE,
        &[(ANALYSIS_PLACEHOLDER, prior_feedback), (QUESTION_PLACEHOLDER, question)],
    )
}

// Single pass over the template; substituted values are never rescanned, so
// text that happens to contain "{question}" comes through untouched.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    'outer: while !rest.is_empty() {
        for (placeholder, value) in values {
            if let Some(tail) = rest.strip_prefix(placeholder) {
                out.push_str(value);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}
