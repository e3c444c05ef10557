// Prompt constants for LLM-backed free-text grading.

/// System prompt for grading calls.
pub const GRADING_SYSTEM: &str = "You are a fair but demanding workplace evaluator grading a written answer. \
    You MUST respond with valid JSON only: one JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Grading template. Replace {scoring}, {question}, {expected}, {submission}.
pub const GRADING_PROMPT_TEMPLATE: &str = r#"{scoring}

QUESTION / TASK:
{question}

GRADING KEY (what a strong answer covers; the candidate has not seen this):
{expected}

SUBMITTED ANSWER:
{submission}

Return ONE JSON object:
{
  "score": 74,
  "feedback": "Two or three sentences: what was good, what was missing, phrased to the candidate."
}

Rules:
- grade against the key, but accept equivalent points phrased differently
- do not reveal the grading key verbatim in the feedback
- feedback addresses the candidate directly"#;
