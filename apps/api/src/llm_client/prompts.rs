// Cross-cutting prompt fragments shared by every content kind.
// Each feature module defines its own prompts.rs alongside it; this file only
// holds the pieces that must stay identical across all of them.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction keeping generated content inside the workplace fiction.
/// Appended to every content-generation prompt so the game never breaks
/// character or references the generation process itself.
pub const WORLD_INSTRUCTION: &str = "\
    The content is part of a professional career simulation. \
    Stay strictly in-world: realistic companies, plausible colleagues, \
    workplace-appropriate language. Never mention that this is a game, \
    a simulation, or AI-generated.";

/// Instruction for grading-style calls: numeric scores are on a 0-100 scale.
pub const SCORING_INSTRUCTION: &str = "\
    Scores are integers from 0 to 100. 70 is the passing bar. \
    Be fair but demanding: vague or generic answers that ignore the \
    specifics of the question score below 50.";
