// ==========================================
// PLAYLIST ITEM
// ==========================================
// One playable entry from playlist.json.
//
// Example entries:
// ```json
// { "id": "v1", "type": "file", "title": "Intro", "url": "https://cdn/x/intro.mp4", "tags": ["demo"] }
// { "id": "v2", "type": "hls", "title": "Live", "url": "https://cdn/live/index.m3u8" }
// { "id": "y1", "type": "youtube", "title": "Talk", "youtubeId": "dQw4w9WgXcQ" }
// ```
//
// The `type` field picks the MediaKind variant. The kind decides which tab
// the item shows up in and which player surface plays it.

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};

use crate::playlist::resolver::Identified;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaKind {
    /// Plain video file served over HTTP or from disk
    File { url: String },
    /// HLS stream (.m3u8)
    Hls { url: String },
    #[serde(rename = "youtube")]
    YouTube {
        #[serde(rename = "youtubeId")]
        youtube_id: String,
    },
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::File { .. } => "FILE",
            MediaKind::Hls { .. } => "HLS",
            MediaKind::YouTube { .. } => "YOUTUBE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumb: Option<String>,
}

// Hand-written playlists use numeric ids too; 1 and "1" are the same item
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

// Tags lists in the wild contain nulls, drop them instead of rejecting the item
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

impl Identified for PlaylistItem {
    fn id(&self) -> &str {
        &self.id
    }
}

impl PlaylistItem {
    pub fn is_youtube(&self) -> bool {
        matches!(self.kind, MediaKind::YouTube { .. })
    }

    /// Direct media URL for file/hls items
    pub fn media_url(&self) -> Option<&str> {
        match &self.kind {
            MediaKind::File { url } | MediaKind::Hls { url } => Some(url),
            MediaKind::YouTube { .. } => None,
        }
    }

    pub fn youtube_id(&self) -> Option<&str> {
        match &self.kind {
            MediaKind::YouTube { youtube_id } => Some(youtube_id),
            _ => None,
        }
    }

    /// Something a browser can open: the watch page or the media URL itself
    pub fn browser_url(&self) -> String {
        match &self.kind {
            MediaKind::File { url } | MediaKind::Hls { url } => url.clone(),
            MediaKind::YouTube { youtube_id } => youtube_watch_url(youtube_id),
        }
    }

    // ==========================================
    // THUMBNAILS
    // ==========================================
    // Resolution order:
    // 1. explicit "thumb" field
    // 2. youtube: the hqdefault image from img.youtube.com
    // 3. file/hls: <origin>/thumbs/<file name without extension>.jpg
    //
    // Returns None when the media URL can't be parsed.
    pub fn thumbnail(&self) -> Option<String> {
        if let Some(thumb) = &self.thumb {
            return Some(thumb.clone());
        }
        match &self.kind {
            MediaKind::YouTube { youtube_id } => Some(youtube_thumb_url(youtube_id)),
            MediaKind::File { url } | MediaKind::Hls { url } => guess_thumb_from_url(url),
        }
    }
}

pub fn youtube_watch_url(youtube_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", youtube_id)
}

pub fn youtube_thumb_url(youtube_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", youtube_id)
}

pub fn guess_thumb_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }

    let file = parsed.path().rsplit('/').next().unwrap_or("");
    let base = match file.rfind('.') {
        Some(dot) if dot + 1 < file.len() => &file[..dot],
        _ => file,
    };

    Some(format!("{}/thumbs/{}.jpg", origin.ascii_serialization(), base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_media_kind() {
        let json = r#"[
            {"id": "v1", "type": "file", "title": "Intro", "url": "https://cdn.example.com/v/intro.mp4", "tags": ["demo", null]},
            {"id": "v2", "type": "hls", "title": "Live", "url": "https://cdn.example.com/live/index.m3u8"},
            {"id": "y1", "type": "youtube", "title": "Talk", "youtubeId": "abc123"}
        ]"#;
        let items: Vec<PlaylistItem> = serde_json::from_str(json).unwrap();

        assert_eq!(items[0].media_url(), Some("https://cdn.example.com/v/intro.mp4"));
        assert_eq!(items[0].tags, vec!["demo".to_string()]);
        assert!(matches!(items[1].kind, MediaKind::Hls { .. }));
        assert!(items[2].is_youtube());
        assert_eq!(items[2].youtube_id(), Some("abc123"));
        assert!(items[2].tags.is_empty());
    }

    #[test]
    fn youtube_item_without_video_id_is_rejected() {
        let json = r#"{"id": "y1", "type": "youtube", "title": "Talk"}"#;
        assert!(serde_json::from_str::<PlaylistItem>(json).is_err());
    }

    #[test]
    fn thumbnail_prefers_explicit_field() {
        let json = r#"{"id": "y1", "type": "youtube", "youtubeId": "abc", "thumb": "https://x/t.png"}"#;
        let item: PlaylistItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.thumbnail().as_deref(), Some("https://x/t.png"));
    }

    #[test]
    fn thumbnail_for_youtube_uses_hqdefault() {
        let json = r#"{"id": "y1", "type": "youtube", "youtubeId": "abc"}"#;
        let item: PlaylistItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.thumbnail().as_deref(),
            Some("https://img.youtube.com/vi/abc/hqdefault.jpg")
        );
    }

    #[test]
    fn thumbnail_guess_strips_extension_and_keeps_origin() {
        assert_eq!(
            guess_thumb_from_url("https://cdn.example.com:8443/media/clip.final.mp4?x=1").as_deref(),
            Some("https://cdn.example.com:8443/thumbs/clip.final.jpg")
        );
        assert_eq!(
            guess_thumb_from_url("http://host/live/index.m3u8").as_deref(),
            Some("http://host/thumbs/index.jpg")
        );
    }

    #[test]
    fn thumbnail_guess_fails_on_relative_url() {
        assert_eq!(guess_thumb_from_url("videos/clip.mp4"), None);
    }
}
