//! Prompt text and templating.
//!
//! Templates use `{name}` placeholders. Rendering is a single left-to-right pass, so text
//! substituted into a template is never itself expanded.

use super::types::ExtractedField;

/// Persona sent as the system message on every chat request.
pub const SYSTEM_PERSONA: &str = "Your name is Jarvis";

/// Field extraction request; `{field}` and `{text}` are substituted.
pub const EXTRACTION_TEMPLATE: &str =
    "Retrieve the {field} of this text. If you cannot retrieve it then return an empty string: {text}";

/// Link extraction asks for a plain string explicitly.
pub const LINK_EXTRACTION_TEMPLATE: &str =
    "Retrieve the Link as a string of this text. If you cannot retrieve it then return an empty string: {text}";

/// Short brief of a topic.
pub const BRIEF_TEMPLATE: &str =
    "Generate a brief of the topic {topic} in 70 words maximum.\nUtilize the sources you know.";

/// Search text used to pull sources for the final answer.
pub const CRITICAL_QUERY_TEMPLATE: &str =
    "Can you retrieve a critical perspective about the topic {topic}?";

/// Final instruction; `{topic}`, `{query}` and `{sources}` are substituted.
pub const RESOLUTION_TEMPLATE: &str = "You are a critical assistant that will analyze the following topic {topic}.
Answer the query using only the sources provided below in a critical and unique perspective.
Answer ONLY with the facts listed in the list of sources below.
Based on your research and insights, write a Spiky POV about any subtopic in 1-2 sentences.
Ensure it is distinct, thought-provoking, and applicable by being relevant and practical to the field. The Spiky POV should challenge traditional perspectives and provide a fresh take on the topic.
Do not generate answers that don't use the sources below.
Query: {query}
Sources:
{sources}";

/// Substitute `{name}` placeholders from `params`; unknown placeholders are left as written.
pub fn render(template: &str, params: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replacement {
            Some((value, close)) => {
                output.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// User prompt asking the model for one field of `text`.
pub fn extraction_prompt(field: ExtractedField, text: &str) -> String {
    match field {
        ExtractedField::Link => render(LINK_EXTRACTION_TEMPLATE, &[("text", text)]),
        other => render(
            EXTRACTION_TEMPLATE,
            &[("field", other.label()), ("text", text)],
        ),
    }
}

/// User prompt for the topic brief.
pub fn brief_prompt(topic: &str) -> String {
    render(BRIEF_TEMPLATE, &[("topic", topic)])
}

/// Search text for critical sources on `topic`.
pub fn critical_query(topic: &str) -> String {
    render(CRITICAL_QUERY_TEMPLATE, &[("topic", topic)])
}

/// User prompt for the final resolution.
pub fn resolution_prompt(topic: &str, query: &str, sources: &str) -> String {
    render(
        RESOLUTION_TEMPLATE,
        &[("topic", topic), ("query", query), ("sources", sources)],
    )
}
