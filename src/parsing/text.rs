//! Chat text cleaning.
//!
//! The chat text column holds the message runs as JSON objects joined by
//! commas, without the surrounding brackets:
//!
//! ```text
//! {"text":"Hello "},{"emojiId":"UCkszU/abc"},{"text":"world"}
//! ```
//!
//! Only the `text` fields are kept.

use serde::Deserialize;
use thiserror::Error;

/// One run of a chat message. Emoji and sticker runs have no `text`.
#[derive(Debug, Deserialize)]
struct Fragment {
    #[serde(default)]
    text: Option<String>,
}

/// Chat text that is not a sequence of fragment objects.
#[derive(Debug, Error)]
#[error("chat text is not a fragment sequence: {source}")]
pub struct TextError {
    #[source]
    source: serde_json::Error,
}

/// Concatenates the `text` of every fragment in `raw`, in order.
///
/// # Example
///
/// ```rust
/// use chatmerge::parsing::clean_chat_text;
///
/// let text = clean_chat_text(r#"{"text":"Hello "},{"emojiId":"x"},{"text":"world"}"#).unwrap();
/// assert_eq!(text, "Hello world");
/// ```
pub fn clean_chat_text(raw: &str) -> Result<String, TextError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let wrapped = format!("[{trimmed}]");
    let fragments: Vec<Fragment> =
        serde_json::from_str(&wrapped).map_err(|source| TextError { source })?;

    Ok(fragments.into_iter().filter_map(|f| f.text).collect())
}

/// Encodes `text` as a single fragment, the inverse of [`clean_chat_text`].
pub fn encode_fragment(text: &str) -> String {
    serde_json::json!({ "text": text }).to_string()
}
