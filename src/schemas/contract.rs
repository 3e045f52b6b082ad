//! Fixed text sent to the generation service alongside every directive.

/// System instruction for every generation call.
pub const SYSTEM_INSTRUCTION: &str =
    "You generate realistic, practical travel itineraries. You reply with JSON only.";

const ITINERARY_SCHEMA_PROMPT: &str = r#"You MUST output valid JSON only.

The JSON MUST follow this exact structure:

{
  "days": [
    {
      "day": <integer starting from 1>,
      "sections": {
        "morning": [<string>, <string>, ...],
        "afternoon": [<string>, <string>, ...],
        "evening": [<string>, <string>, ...]
      }
    }
  ],
  "summary": <string>
}

Rules:
- Do NOT include markdown or code fences.
- Do NOT include headings like "Day 1:" outside the JSON.
- Do NOT include explanations or notes outside the JSON.
- Each activity must be a short, concrete sentence.
- If a section has nothing planned, use an empty list [].
- The number of days MUST match the trip length.
- Number the days 1, 2, 3, ... in order with no gaps.
- Any assumptions note belongs at the end of "summary".

If you violate this format, the response is invalid."#;

/// The literal output contract: JSON shape plus formatting rules.
pub fn itinerary_schema_prompt() -> &'static str {
    ITINERARY_SCHEMA_PROMPT
}
