//! Prompt templates.
//!
//! These functions only format text. No parsing, no networking.

/// Instruction for writing a fresh story from the user's idea.
pub fn story_prompt(user_request: &str) -> String {
    format!(
        r#"
Write a gentle bedtime story for children ages 5–10 based on this idea:

"{user_request}"

Requirements:
- Simple language a child can understand
- Focus on a calming tone, a simple plot, and relatable, gentle characters that can help relax a child before sleep
- Create characters with depth. The child should understand why each character makes their choices and drives the story forward
- Maintain momentum: each scene should build upon the last, raising the stakes or offering new information that moves the story along
- Follow this story arc structure:
Act I (Setup): Introduce the characters, the setting and the everyday status quo. An inciting incident disrupts this balance and presents the main problem or challenge.
Act II (Rising Action): The bulk of the story. The hero tries to solve the problem, meeting obstacles and gentle setbacks that build toward a climax.
Act III (Resolution): The climax, where the hero faces the biggest challenge. Afterwards the loose ends are tied up and the story settles into a new normal.
- Include emojis when appropriate to keep the story fun and lively
"#
    )
}

/// Instruction for rewriting `current_story` according to `feedback`.
pub fn refine_story_prompt(current_story: &str, feedback: &str) -> String {
    format!(
        r#"
Rewrite the following children's story based on the requested changes.

Original story:
"""{current_story}"""

Feedback:
"""{feedback}"""

Make the new story warm, child-friendly, imaginative, and easy to understand.
Keep a clear moral at the end and maintain a gentle bedtime tone.
"#
    )
}

/// Rubric asking the judge for a JSON verdict on `story`.
pub fn judge_prompt(story: &str) -> String {
    format!(
        r#"
You are a strict literary critic for children's bedtime stories (ages 5–10).
You NEVER give high scores unless all conditions are met perfectly.

Story:
"""{story}"""

Rate the story from 1–10 based ONLY on these criteria:

1. **Simple language** a 5–10 year old can understand
2. **Calming tone** suitable for bedtime
3. **Relatable, gentle characters** who make emotionally clear choices
4. **Character motivation** — a child should understand *why* characters act the way they do
5. **Strong plot momentum** — each scene builds on the last, adding gentle tension or curiosity
6. **Story arc quality**:
   - Act I: Clear introduction and inciting incident
   - Act II: Rising action and gentle problem solving
   - Act III: Satisfying climax and resolution, establishing a "new normal"
7. **Includes emojis appropriately** to make the story fun and child-friendly
8. **No scary or violent content**
9. **Has a wholesome lesson or emotional takeaway**

Strict scoring rules:
- 9–10: Masterful bedtime story; meets ALL criteria
- 7–8: Good but noticeable weaknesses (you MUST list them)
- 4–6: Major issues in plot, tone, clarity, or emotional arc
- 0–3: Inappropriate, confusing, or violates bedtime tone requirements

Return ONLY valid JSON in this exact format:

{{
 "score": <number>,
 "feedback": "<1 sentence: tell the writer what to improve>"
}}
"#
    )
}
