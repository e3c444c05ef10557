// Prompt constants for the content generator. Templates use {placeholder}
// substitution; cross-cutting fragments come from llm_client::prompts.

/// System prompt for job batch generation.
pub const JOBS_SYSTEM: &str = "You are a job market simulator generating realistic job listings. \
    You MUST respond with valid JSON only: a JSON array of job objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Job batch template. Replace {count}, {profession}, {level}, {world}.
pub const JOBS_PROMPT_TEMPLATE: &str = r#"{world}

Generate {count} distinct job listings for the profession "{profession}" at the {level} level.
Every listing must be relevant to that profession.

Return a JSON ARRAY of objects with this EXACT schema:
[
  {
    "company": "Meridian Labs",
    "position": "Backend Software Engineer",
    "location": "Austin, TX",
    "job_type": "remote",
    "salary_min": 85000,
    "salary_max": 110000,
    "level": "entry",
    "requirements": ["2+ years of backend experience", "SQL proficiency"],
    "responsibilities": ["Build and maintain API endpoints", "Review code"],
    "benefits": ["Health insurance", "401k matching"],
    "description": "One paragraph describing the role and team."
  }
]

Rules:
- job_type is exactly one of: "remote", "hybrid", "onsite"
- level is exactly one of: "entry", "mid", "senior"
- salary_min <= salary_max, realistic for the level and location
- vary companies, locations, and salary bands across the batch"#;

/// System prompt for interview question generation.
pub const INTERVIEW_SYSTEM: &str = "You are an experienced hiring manager writing interview questions. \
    You MUST respond with valid JSON only: a JSON array of question objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Interview questions template. Replace {position}, {company}, {requirements}, {level}.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Write interview questions for this opening:

Position: {position}
Company: {company}
Level: {level}
Key requirements: {requirements}

Return a JSON ARRAY of 3 to 5 objects:
[
  {
    "question": "Tell me about a time you had to debug a production issue.",
    "expected_answer": "A strong answer describes a concrete incident, the diagnosis steps taken, and what changed afterwards."
  }
]

Rules:
- questions must be answerable in a few sentences of free text
- expected_answer is grading guidance for an evaluator, never shown to the candidate
- mix behavioral and role-specific technical questions"#;

/// System prompt for work task generation.
pub const TASK_SYSTEM: &str = "You are a work simulator generating a single realistic work assignment. \
    You MUST respond with valid JSON only: one JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Task template. Replace {position}, {company}, {player_level}, {tasks_completed}, {world}.
pub const TASK_PROMPT_TEMPLATE: &str = r#"{world}

Generate one work task for an employee at {company} working as {position}.
The player is at level {player_level} of 10 and has completed {tasks_completed} tasks so far;
scale difficulty accordingly.
{origin}

Return ONE JSON object:
{
  "title": "Triage the flaky checkout test",
  "description": "What the employee is asked to do, in 2-3 sentences.",
  "difficulty": 4,
  "xp_reward": 60,
  "payload": { ... }
}

The payload object's "format" field picks the task type. Use EXACTLY one of these shapes:

{"format": "text_answer", "expected_points": ["point the answer should cover", "..."]}

{"format": "multiple_choice",
 "options": [{"id": "A", "text": "..."}, {"id": "B", "text": "..."}, {"id": "C", "text": "..."}, {"id": "D", "text": "..."}],
 "correct_answer": "B"}

{"format": "fill_in_blank", "text": "Sentence with ___ markers for each blank", "blanks": ["answer per blank, in order"]}

{"format": "matching", "left": ["item", "..."], "right": ["match", "..."],
 "correct_pairs": [{"left": "item", "right": "match"}]}

{"format": "code_review", "code": "snippet with planted defects", "bugs": ["each defect, briefly"]}

{"format": "prioritization", "items": [{"id": "1", "text": "..."}, {"id": "2", "text": "..."}],
 "correct_order": ["2", "1"]}

Rules:
- multiple_choice has EXACTLY 4 options and correct_answer is one of their ids
- fill_in_blank has exactly as many blanks entries as ___ markers
- matching left and right have the same length and correct_pairs covers every left item
- difficulty is 1-10; xp_reward grows with difficulty (roughly 20 + 10 * difficulty)
- vary the format; do not always pick the same one"#;

/// System prompt for meeting generation.
pub const MEETING_SYSTEM: &str = "You are a workplace simulator generating a realistic meeting. \
    You MUST respond with valid JSON only: one JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Meeting template. Replace {meeting_type}, {position}, {player_level}, {recent_tasks}, {world}.
pub const MEETING_PROMPT_TEMPLATE: &str = r#"{world}

Generate a "{meeting_type}" meeting for an employee working as {position} (player level {player_level} of 10).
Recent work the employee finished, for context: {recent_tasks}

Return ONE JSON object:
{
  "title": "Q3 roadmap check-in",
  "context": "One or two sentences setting the scene.",
  "participants": [
    {"name": "Priya Sharma", "role": "Product Manager", "personality": "detail-oriented, skeptical of estimates"}
  ],
  "topics": [
    {
      "question": "What the participant asks the employee",
      "context": "Why this is being asked",
      "expected_points": ["what a good answer covers"]
    }
  ]
}

Rules:
- 1 to 3 participants, each with a distinct role and personality
- 3 to 5 topics, ordered as the conversation should flow
- topics must reference the meeting type and, where natural, the recent work
- expected_points is evaluator guidance, never shown to the player"#;

/// System prompt for in-meeting participant replies.
pub const REPLIES_SYSTEM: &str = "You are roleplaying the other participants of a workplace meeting. \
    You MUST respond with valid JSON only: one JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replies template. Replace {meeting_json}, {topic_question}, {player_response}, {world}.
pub const REPLIES_PROMPT_TEMPLATE: &str = r#"{world}

Meeting state:
{meeting_json}

The current topic is: "{topic_question}"
The employee just responded: "{player_response}"

As the meeting participants, react in character and move the conversation along.

Return ONE JSON object:
{
  "replies": [
    {"speaker": "participant name exactly as given", "content": "their in-character reply"}
  ],
  "assessment": "one-sentence private note on how well the response addressed the topic"
}

Rules:
- 1 to 3 replies, speakers must be participants of the meeting
- replies react to the employee's actual words, not generic filler
- assessment is private evaluator feedback, phrased constructively"#;

/// System prompt for the single end-of-meeting evaluation call.
pub const EVALUATION_SYSTEM: &str = "You are evaluating an employee's performance across a full workplace meeting. \
    You MUST respond with valid JSON only: one JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Evaluation template. Replace {meeting_json}, {scoring}.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"{scoring}

Evaluate the employee's contributions across this completed meeting, using the
topics' expected_points as the rubric:

{meeting_json}

Return ONE JSON object:
{
  "score": 78,
  "strengths": ["what the employee did well, concretely"],
  "improvements": ["what to work on next time"],
  "should_generate_tasks": true,
  "follow_up_task_count": 2,
  "follow_up_summary": "Action items that came out of the discussion, one line."
}

Rules:
- should_generate_tasks is true only if the discussion produced concrete action items
- follow_up_task_count is 0 to 3 and must be 0 when should_generate_tasks is false
- strengths and improvements each have 1 to 3 entries"#;
