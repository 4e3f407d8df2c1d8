// Library view over the loaded playlist: tab filter + search box

use crate::playlist::item::{MediaKind, PlaylistItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// file + hls items
    #[default]
    Video,
    YouTube,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Video, Tab::YouTube];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Video => "Videos",
            Tab::YouTube => "YouTube",
        }
    }

    pub fn toggled(self) -> Tab {
        match self {
            Tab::Video => Tab::YouTube,
            Tab::YouTube => Tab::Video,
        }
    }

    pub fn contains(self, item: &PlaylistItem) -> bool {
        match (self, &item.kind) {
            (Tab::YouTube, MediaKind::YouTube { .. }) => true,
            (Tab::Video, MediaKind::File { .. } | MediaKind::Hls { .. }) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Library {
    items: Vec<PlaylistItem>,
}

impl Library {
    pub fn new(items: Vec<PlaylistItem>) -> Self {
        Library { items }
    }

    pub fn replace(&mut self, items: Vec<PlaylistItem>) {
        self.items = items;
    }

    pub fn all(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ==========================================
    // visible()
    // ==========================================
    // Items shown for a tab and search query, in playlist order.
    // The query is trimmed and compared case-insensitively against the title
    // and every tag. This list is also what auto-next walks through, so
    // "next" means next among what the user can see.
    pub fn visible(&self, tab: Tab, query: &str) -> Vec<PlaylistItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| tab.contains(item))
            .filter(|item| matches_query(item, &needle))
            .cloned()
            .collect()
    }
}

fn matches_query(item: &PlaylistItem, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.title.to_lowercase().contains(needle)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// The selected item if it's visible, otherwise the first visible one
pub fn current<'a>(visible: &'a [PlaylistItem], current_id: Option<&str>) -> Option<&'a PlaylistItem> {
    current_id
        .and_then(|id| visible.iter().find(|item| item.id == id))
        .or_else(|| visible.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, kind: MediaKind, tags: &[&str]) -> PlaylistItem {
        PlaylistItem {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            thumb: None,
        }
    }

    fn library() -> Library {
        Library::new(vec![
            item("v1", "Morning Run", MediaKind::File { url: "https://x/1.mp4".into() }, &["Sport"]),
            item("y1", "Keynote", MediaKind::YouTube { youtube_id: "k".into() }, &["talk"]),
            item("v2", "Harbor Cam", MediaKind::Hls { url: "https://x/2.m3u8".into() }, &["live", "CAM"]),
            item("y2", "Cooking Live", MediaKind::YouTube { youtube_id: "c".into() }, &[]),
        ])
    }

    fn ids(items: &[PlaylistItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn tabs_split_by_media_kind() {
        let lib = library();
        assert_eq!(ids(&lib.visible(Tab::Video, "")), vec!["v1", "v2"]);
        assert_eq!(ids(&lib.visible(Tab::YouTube, "")), vec!["y1", "y2"]);
    }

    #[test]
    fn search_matches_title_and_tags_case_insensitively() {
        let lib = library();
        assert_eq!(ids(&lib.visible(Tab::Video, "  cam ")), vec!["v2"]);
        assert_eq!(ids(&lib.visible(Tab::Video, "SPORT")), vec!["v1"]);
        assert_eq!(ids(&lib.visible(Tab::YouTube, "live")), vec!["y2"]);
        assert!(lib.visible(Tab::YouTube, "nothing").is_empty());
    }

    #[test]
    fn current_falls_back_to_first_visible() {
        let lib = library();
        let videos = lib.visible(Tab::Video, "");
        assert_eq!(current(&videos, Some("v2")).map(|i| i.id.as_str()), Some("v2"));
        // selected id lives on the other tab
        assert_eq!(current(&videos, Some("y1")).map(|i| i.id.as_str()), Some("v1"));
        assert_eq!(current(&videos, None).map(|i| i.id.as_str()), Some("v1"));
        assert!(current(&[], Some("v1")).is_none());
    }
}
