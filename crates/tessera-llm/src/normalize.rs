//! Message content reshaping for the resolved upstream model

use crate::capabilities::ModelCapabilities;
use crate::protocol::{ChatMessage, Content, ContentPart};

/// Reshape every message's content to what `model` accepts
///
/// Models on the structured-content list get plain text wrapped into a
/// single `text` part; every other model gets structured content flattened
/// to newline-joined text, dropping non-text parts. Order and roles are
/// preserved.
pub fn normalize_messages(model: &str, messages: Vec<ChatMessage>, capabilities: &ModelCapabilities) -> Vec<ChatMessage> {
    let structured = capabilities.requires_structured_content(model);

    messages
        .into_iter()
        .map(|message| ChatMessage {
            role: message.role,
            content: if structured {
                into_parts(message.content)
            } else {
                into_text(message.content)
            },
        })
        .collect()
}

fn into_parts(content: Content) -> Content {
    match content {
        Content::Text(text) => Content::Parts(vec![ContentPart::text(text)]),
        parts @ Content::Parts(_) => parts,
    }
}

fn into_text(content: Content) -> Content {
    match content {
        text @ Content::Text(_) => text,
        Content::Parts(parts) => Content::Text(
            parts
                .iter()
                .filter_map(ContentPart::as_text)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}
