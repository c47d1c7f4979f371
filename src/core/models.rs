//! Core data models: raw CSV rows, video keys, chat entries, aggregates.
//!
//! The serialized shape of [`VideoAggregate`] is the crate's primary output:
//!
//! ```json
//! {
//!   "date": "2024/01/01 09:00:00.000",
//!   "videoId": "dQw4w9WgXcQ",
//!   "chat": [
//!     {"chatId": "c1", "channelId": "UC1", "timeStamp": "2024/01/01 09:00:00.000",
//!      "chat": ["text", "hello"], "type": "chat", "superchat": []}
//!   ],
//!   "channelData": null
//! }
//! ```

use std::borrow::Borrow;
use std::fmt;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Length of a well-formed YouTube video id.
pub const VIDEO_ID_LEN: usize = 11;

/// Returns `true` if `value` looks like a real video id.
///
/// Takeout exports occasionally shift columns so that the video id column
/// holds something else and the id lands in the chat text column. Only an
/// exact 11-character value is trusted.
pub fn is_plausible_video_id(value: &str) -> bool {
    value.chars().count() == VIDEO_ID_LEN
}

/// One record of a chat CSV, restricted to the six columns the pipeline uses.
///
/// Every field is kept as a string. An empty price cell is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub video_id_field: String,
    pub chat_id: String,
    pub timestamp_raw: String,
    pub chat_text_raw: String,
    pub channel_id: String,
    pub price: Option<String>,
}

impl RawRow {
    /// Builds a row from cells in canonical column order.
    ///
    /// Missing trailing cells are treated as empty.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |i: usize| cells.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default();
        let price = cell(5);
        Self {
            video_id_field: cell(0),
            chat_id: cell(1),
            timestamp_raw: cell(2),
            chat_text_raw: cell(3),
            channel_id: cell(4),
            price: if price.trim().is_empty() { None } else { Some(price) },
        }
    }

    /// Returns the cells in canonical column order, `None` price as empty.
    pub fn to_cells(&self) -> [&str; 6] {
        [
            &self.video_id_field,
            &self.chat_id,
            &self.timestamp_raw,
            &self.chat_text_raw,
            &self.channel_id,
            self.price.as_deref().unwrap_or(""),
        ]
    }

    /// Returns `true` if every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.to_cells().iter().all(|c| c.trim().is_empty())
    }

    /// Derives the grouping key for this row.
    pub fn video_key(&self) -> VideoKey {
        if is_plausible_video_id(&self.video_id_field) {
            VideoKey::new(self.video_id_field.clone())
        } else {
            VideoKey::new(self.chat_text_raw.clone())
        }
    }
}

/// Identifier grouping chat rows to one video, also the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoKey(String);

impl VideoKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for VideoKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VideoKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Kind of a chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatKind {
    /// A plain message
    Chat,
    /// A monetary event
    SuperChat,
}

/// Chat text payload, serialized as the tagged pair `["text", <text>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatText(pub String);

impl ChatText {
    pub const TAG: &'static str = "text";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for ChatText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(Self::TAG)?;
        tuple.serialize_element(&self.0)?;
        tuple.end()
    }
}

/// Price and originating video id field of a monetary event.
///
/// Both values are kept verbatim from the CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperChat {
    pub price: String,
    pub video_id_field: String,
}

/// Serializes `None` as `[]` and `Some` as `[price, videoIdField]`.
fn serialize_superchat<S: Serializer>(
    value: &Option<SuperChat>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(sc) => {
            let mut tuple = serializer.serialize_tuple(2)?;
            tuple.serialize_element(&sc.price)?;
            tuple.serialize_element(&sc.video_id_field)?;
            tuple.end()
        }
        None => serializer.serialize_tuple(0)?.end(),
    }
}

/// One classified, timestamp-normalized chat event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub chat_id: String,
    pub channel_id: String,
    pub time_stamp: String,
    pub chat: ChatText,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(serialize_with = "serialize_superchat")]
    pub superchat: Option<SuperChat>,
}

impl ChatEntry {
    pub fn is_super_chat(&self) -> bool {
        self.kind == ChatKind::SuperChat
    }
}

/// Per-video record: ordered chat entries plus optional channel metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAggregate {
    /// Normalized timestamp of the first chat seen for this video
    pub date: String,
    pub video_id: VideoKey,
    pub chat: Vec<ChatEntry>,
    pub channel_data: Option<Value>,
}

impl VideoAggregate {
    pub fn new(video_id: VideoKey, date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            video_id,
            chat: Vec::new(),
            channel_data: None,
        }
    }

    pub fn super_chat_count(&self) -> usize {
        self.chat.iter().filter(|c| c.is_super_chat()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_video_id() {
        assert!(is_plausible_video_id("dQw4w9WgXcQ"));
        assert!(!is_plausible_video_id("dQw4w9WgXc"));
        assert!(!is_plausible_video_id("dQw4w9WgXcQQ"));
        assert!(!is_plausible_video_id(""));
    }

    #[test]
    fn test_plausible_video_id_counts_chars() {
        // 11 characters, more than 11 bytes
        assert!(is_plausible_video_id("あいうえおかきくけこさ"));
    }

    #[test]
    fn test_video_key_uses_id_field() {
        let row = RawRow::from_cells(&["dQw4w9WgXcQ", "c1", "", "text", "UC1", ""]);
        assert_eq!(row.video_key().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_video_key_falls_back_to_text_column() {
        let row = RawRow::from_cells(&["JPY", "c1", "", "abcdefghijk", "UC1", "500"]);
        assert_eq!(row.video_key().as_str(), "abcdefghijk");
    }

    #[test]
    fn test_from_cells_empty_price_is_none() {
        let row = RawRow::from_cells(&["v", "c", "t", "x", "ch", "  "]);
        assert_eq!(row.price, None);

        let short = RawRow::from_cells(&["v", "c"]);
        assert_eq!(short.price, None);
        assert!(short.chat_text_raw.is_empty());
    }

    #[test]
    fn test_is_blank() {
        assert!(RawRow::from_cells(&["", " ", "", "", "", ""]).is_blank());
        assert!(!RawRow::from_cells(&["", "", "", "", "", "1"]).is_blank());
    }

    #[test]
    fn test_chat_entry_serialization() {
        let entry = ChatEntry {
            chat_id: "c1".into(),
            channel_id: "UC1".into(),
            time_stamp: "2024/01/01 09:00:00.000".into(),
            chat: ChatText("hi".into()),
            kind: ChatKind::Chat,
            superchat: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"chatId":"c1","channelId":"UC1","timeStamp":"2024/01/01 09:00:00.000","chat":["text","hi"],"type":"chat","superchat":[]}"#
        );
    }

    #[test]
    fn test_super_chat_serialization() {
        let entry = ChatEntry {
            chat_id: "c2".into(),
            channel_id: "UC2".into(),
            time_stamp: "t".into(),
            chat: ChatText::default(),
            kind: ChatKind::SuperChat,
            superchat: Some(SuperChat {
                price: "5".into(),
                video_id_field: "JPY".into(),
            }),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "superChat");
        assert_eq!(value["superchat"], serde_json::json!(["5", "JPY"]));
        assert_eq!(value["chat"], serde_json::json!(["text", ""]));
    }

    #[test]
    fn test_aggregate_serialization_keys() {
        let agg = VideoAggregate::new(VideoKey::new("dQw4w9WgXcQ"), "d");
        let value = serde_json::to_value(&agg).unwrap();
        assert_eq!(value["videoId"], "dQw4w9WgXcQ");
        assert_eq!(value["date"], "d");
        assert!(value["chat"].as_array().unwrap().is_empty());
        assert!(value["channelData"].is_null());
    }
}
