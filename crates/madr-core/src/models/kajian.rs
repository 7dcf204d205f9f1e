use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::envelope::null_as_empty;

/// A lecture video synced from the mosque's YouTube channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kajian {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: String,
    pub youtube_url: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A video straight from the channel feed, not yet stored as a `Kajian`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeVideo {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub channel_title: String,
}

impl YoutubeVideo {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Body of the public recent-videos feed. Not wrapped in the usual envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecentVideos {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<YoutubeVideo>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub synced: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_response() {
        let resp: SyncResponse =
            serde_json::from_str(r#"{"message":"synced","synced":4}"#).expect("valid");
        assert_eq!(resp.synced, 4);
    }

    #[test]
    fn test_parse_recent_videos() {
        let json = r#"{"data":[{"video_id":"abc123","title":"Tafsir Al-Kahfi","description":"","published_at":"2026-03-01T12:00:00Z","thumbnail_url":"https://i.ytimg.com/vi/abc123/hqdefault.jpg","channel_title":"Masjid"}],"total":1}"#;
        let feed: RecentVideos = serde_json::from_str(json).expect("valid feed");
        assert_eq!(feed.total, 1);
        assert_eq!(feed.data[0].watch_url(), "https://www.youtube.com/watch?v=abc123");
    }
}
