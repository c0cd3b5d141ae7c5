use super::MediaKind;
use serde::{Deserialize, Serialize};

/// Filter value meaning "do not filter on this field".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderLayout {
    /// `type/year/venue/event/file`
    #[default]
    Nested,
    /// `type/year/venue-event/file`
    Packed,
}

impl FolderLayout {
    /// Number of folder levels between the root and the media files.
    pub fn folder_depth(self) -> usize {
        match self {
            FolderLayout::Nested => 4,
            FolderLayout::Packed => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaFilter {
    pub search: Option<String>,
    pub year: Option<String>,
    pub venue: Option<String>,
}

impl MediaFilter {
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }

    pub fn year_filter(&self) -> Option<&str> {
        active(self.year.as_deref())
    }

    pub fn venue_filter(&self) -> Option<&str> {
        active(self.venue.as_deref())
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub years: Vec<YearNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearNode {
    pub year: String,
    pub media_types: Vec<MediaTypeGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTypeGroup {
    pub kind: MediaKind,
    pub slug: String,
    pub type_name: String,
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: String,
    pub name: String,
    pub venue: String,
    pub event_name: String,
    pub label: String,
}
