//! Row classification and grouping by video.
//!
//! [`group_rows`] walks the merged table once, in order, and builds a
//! [`VideoIndex`]: one [`VideoAggregate`] per [`VideoKey`], each holding its
//! chat entries in CSV encounter order.
//!
//! # Classification
//!
//! | Price cell | Kind | Text | `superchat` |
//! |------------|------|------|-------------|
//! | empty, `0`, negative, non-numeric | `chat` | cleaned | `[]` |
//! | number > 0 | `superChat` | empty | `[price, videoIdField]` |

use std::collections::HashMap;

use tracing::debug;

use crate::core::diagnostics::Diagnostic;
use crate::core::models::{ChatEntry, ChatKind, ChatText, RawRow, SuperChat, VideoAggregate, VideoKey};
use crate::parsing::{Normalizer, clean_chat_text};
use crate::progress::{Progress, ProgressCallback, Stage};

/// Run-owned arena of aggregates, indexed by key.
///
/// Aggregates are stored in first-seen order; that order is also the order
/// keys are scheduled for enrichment and the order of the JSON output.
#[derive(Debug, Clone, Default)]
pub struct VideoIndex {
    videos: Vec<VideoAggregate>,
    positions: HashMap<VideoKey, usize>,
}

impl VideoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&VideoAggregate> {
        self.positions.get(key).map(|&i| &self.videos[i])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut VideoAggregate> {
        self.positions.get(key).map(|&i| &mut self.videos[i])
    }

    /// Returns the aggregate for `key`, creating it with `date` if absent.
    ///
    /// The second value is `true` when the aggregate was created.
    pub fn get_or_create(&mut self, key: &VideoKey, date: &str) -> (&mut VideoAggregate, bool) {
        if let Some(&i) = self.positions.get(key) {
            return (&mut self.videos[i], false);
        }
        let i = self.videos.len();
        self.videos.push(VideoAggregate::new(key.clone(), date));
        self.positions.insert(key.clone(), i);
        (&mut self.videos[i], true)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &VideoKey> {
        self.videos.iter().map(|v| &v.video_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VideoAggregate> {
        self.videos.iter()
    }

    pub fn as_slice(&self) -> &[VideoAggregate] {
        &self.videos
    }

    /// Consumes the index, yielding aggregates in first-seen order.
    pub fn into_videos(self) -> Vec<VideoAggregate> {
        self.videos
    }

    /// Total number of chat entries across all aggregates.
    pub fn chat_count(&self) -> usize {
        self.videos.iter().map(|v| v.chat.len()).sum()
    }
}

/// Counters for one grouping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub rows_seen: usize,
    pub rows_grouped: usize,
    pub rows_skipped: usize,
    pub super_chats: usize,
    /// Chat texts that failed to parse and were kept as empty text
    pub unreadable_texts: usize,
}

/// Output of [`group_rows`].
#[derive(Debug, Default)]
pub struct Grouping {
    pub videos: VideoIndex,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: GroupStats,
}

/// Returns the price if it marks a monetary event.
///
/// A price counts when it parses as a finite number greater than zero.
pub fn classify_price(price: Option<&str>) -> Option<&str> {
    let price = price?;
    let value: f64 = price.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(price)
}

/// Builds the chat entry for a row whose timestamp already normalized.
///
/// Returns the entry and whether its text failed to parse.
pub fn classify_row(row: &RawRow, time_stamp: String) -> (ChatEntry, bool) {
    let (kind, chat, superchat, unreadable) = match classify_price(row.price.as_deref()) {
        Some(price) => (
            ChatKind::SuperChat,
            ChatText::default(),
            Some(SuperChat {
                price: price.to_string(),
                video_id_field: row.video_id_field.clone(),
            }),
            false,
        ),
        None => match clean_chat_text(&row.chat_text_raw) {
            Ok(text) => (ChatKind::Chat, ChatText(text), None, false),
            Err(e) => {
                debug!(chat_id = %row.chat_id, error = %e, "unreadable chat text");
                (ChatKind::Chat, ChatText::default(), None, true)
            }
        },
    };

    let entry = ChatEntry {
        chat_id: row.chat_id.clone(),
        channel_id: row.channel_id.clone(),
        time_stamp,
        chat,
        kind,
        superchat,
    };
    (entry, unreadable)
}

/// Groups `rows` by video key, classifying each row.
///
/// Rows whose timestamp does not parse are skipped and reported; no
/// aggregate is created or touched for them.
pub fn group_rows(rows: &[RawRow], normalizer: &Normalizer, progress: &ProgressCallback) -> Grouping {
    let mut grouping = Grouping::default();
    let total = rows.len();

    for (index, row) in rows.iter().enumerate() {
        grouping.stats.rows_seen += 1;

        let time_stamp = match normalizer.normalize(&row.timestamp_raw) {
            Ok(ts) => ts,
            Err(e) => {
                grouping.stats.rows_skipped += 1;
                grouping.diagnostics.push(Diagnostic::InvalidTimestamp {
                    row: index,
                    value: row.timestamp_raw.clone(),
                    reason: e.reason,
                });
                progress(Progress::new(Stage::Rows, index + 1, Some(total)));
                continue;
            }
        };

        let key = row.video_key();
        let (entry, unreadable) = classify_row(row, time_stamp);
        if entry.is_super_chat() {
            grouping.stats.super_chats += 1;
        }
        if unreadable {
            grouping.stats.unreadable_texts += 1;
        }

        let (aggregate, created) = grouping.videos.get_or_create(&key, &entry.time_stamp);
        if created {
            debug!(video = %key, "new video");
        }
        aggregate.chat.push(entry);
        grouping.stats.rows_grouped += 1;

        progress(Progress::new(Stage::Rows, index + 1, Some(total)));
    }

    grouping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::no_progress;

    fn row(video: &str, chat_id: &str, ts: &str, text: &str, price: &str) -> RawRow {
        RawRow::from_cells(&[video, chat_id, ts, text, "UC1", price])
    }

    fn group(rows: &[RawRow]) -> Grouping {
        group_rows(rows, &Normalizer::default(), &no_progress())
    }

    // =========================================================================
    // classify_price
    // =========================================================================

    #[test]
    fn test_classify_price_boundary() {
        assert_eq!(classify_price(None), None);
        assert_eq!(classify_price(Some("")), None);
        assert_eq!(classify_price(Some("0")), None);
        assert_eq!(classify_price(Some("-5")), None);
        assert_eq!(classify_price(Some("abc")), None);
        assert_eq!(classify_price(Some("1")), Some("1"));
        assert_eq!(classify_price(Some("500000000")), Some("500000000"));
        assert_eq!(classify_price(Some("0.5")), Some("0.5"));
    }

    #[test]
    fn test_classify_price_non_finite() {
        assert_eq!(classify_price(Some("inf")), None);
        assert_eq!(classify_price(Some("Infinity")), None);
        assert_eq!(classify_price(Some("1e400")), None);
        assert_eq!(classify_price(Some("NaN")), None);
    }

    // =========================================================================
    // group_rows
    // =========================================================================

    #[test]
    fn test_chat_and_super_chat() {
        let rows = vec![
            row("dQw4w9WgXcQ", "c1", "2024-01-01T00:00:00Z", r#"{"text":"hi"}"#, ""),
            row("dQw4w9WgXcQ", "c2", "2024-01-01T00:00:05Z", r#"{"text":"money"}"#, "1"),
        ];
        let grouping = group(&rows);
        let video = grouping.videos.get("dQw4w9WgXcQ").unwrap();

        assert_eq!(video.chat.len(), 2);
        assert_eq!(video.chat[0].kind, ChatKind::Chat);
        assert_eq!(video.chat[0].chat.as_str(), "hi");
        assert_eq!(video.chat[1].kind, ChatKind::SuperChat);
        // Monetary events carry no text
        assert_eq!(video.chat[1].chat.as_str(), "");
        let sc = video.chat[1].superchat.as_ref().unwrap();
        assert_eq!(sc.price, "1");
        assert_eq!(sc.video_id_field, "dQw4w9WgXcQ");
        assert_eq!(grouping.stats.super_chats, 1);
    }

    #[test]
    fn test_date_is_first_chat() {
        let rows = vec![
            row("dQw4w9WgXcQ", "c1", "2024-01-01T00:00:05Z", "", ""),
            row("dQw4w9WgXcQ", "c2", "2024-01-01T00:00:00Z", "", ""),
        ];
        let grouping = group(&rows);
        assert_eq!(
            grouping.videos.get("dQw4w9WgXcQ").unwrap().date,
            "2024/01/01 09:00:05.000"
        );
    }

    #[test]
    fn test_invalid_timestamp_skips_row_only() {
        let rows = vec![
            row("dQw4w9WgXcQ", "c1", "bad", "", ""),
            row("aaaaaaaaaaa", "c2", "also bad", "", ""),
            row("dQw4w9WgXcQ", "c3", "2024-01-01T00:00:00Z", "", ""),
        ];
        let grouping = group(&rows);

        assert_eq!(grouping.videos.len(), 1);
        assert!(!grouping.videos.contains("aaaaaaaaaaa"));
        assert_eq!(grouping.stats.rows_skipped, 2);
        assert_eq!(grouping.stats.rows_grouped, 1);
        assert!(matches!(
            &grouping.diagnostics[0],
            Diagnostic::InvalidTimestamp { row: 0, .. }
        ));
        assert!(matches!(
            &grouping.diagnostics[1],
            Diagnostic::InvalidTimestamp { row: 1, .. }
        ));
    }

    #[test]
    fn test_unreadable_text_keeps_row() {
        let rows = vec![row("dQw4w9WgXcQ", "c1", "2024-01-01T00:00:00Z", "not json", "")];
        let grouping = group(&rows);

        let video = grouping.videos.get("dQw4w9WgXcQ").unwrap();
        assert_eq!(video.chat.len(), 1);
        assert_eq!(video.chat[0].chat.as_str(), "");
        assert_eq!(grouping.stats.unreadable_texts, 1);
        assert!(grouping.diagnostics.is_empty());
    }

    #[test]
    fn test_shifted_row_keys_on_text_column() {
        let rows = vec![row("JPY", "c1", "2024-01-01T00:00:00Z", "bbbbbbbbbbb", "700")];
        let grouping = group(&rows);

        let video = grouping.videos.get("bbbbbbbbbbb").unwrap();
        let sc = video.chat[0].superchat.as_ref().unwrap();
        assert_eq!(sc.video_id_field, "JPY");
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let rows = vec![
            row("ccccccccccc", "1", "2024-01-01T00:00:00Z", "", ""),
            row("aaaaaaaaaaa", "2", "2024-01-01T00:00:00Z", "", ""),
            row("ccccccccccc", "3", "2024-01-01T00:00:00Z", "", ""),
            row("bbbbbbbbbbb", "4", "2024-01-01T00:00:00Z", "", ""),
        ];
        let grouping = group(&rows);
        let keys: Vec<&str> = grouping.videos.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["ccccccccccc", "aaaaaaaaaaa", "bbbbbbbbbbb"]);

        let chat_ids: Vec<&str> = grouping
            .videos
            .get("ccccccccccc")
            .unwrap()
            .chat
            .iter()
            .map(|c| c.chat_id.as_str())
            .collect();
        assert_eq!(chat_ids, vec!["1", "3"]);
    }

    #[test]
    fn test_progress_reported_per_row() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let progress: ProgressCallback = Arc::new(move |p| {
            assert_eq!(p.stage, Stage::Rows);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let rows = vec![
            row("dQw4w9WgXcQ", "c1", "2024-01-01T00:00:00Z", "", ""),
            row("dQw4w9WgXcQ", "c2", "bad", "", ""),
        ];
        group_rows(&rows, &Normalizer::default(), &progress);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_input() {
        let grouping = group(&[]);
        assert!(grouping.videos.is_empty());
        assert_eq!(grouping.stats, GroupStats::default());
    }
}
