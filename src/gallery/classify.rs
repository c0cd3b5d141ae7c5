//! Maps type-folder names and virtual paths to media kinds and year/venue/event labels.
//!
//! Both the per-file classifier and the hierarchy builder go through
//! [`KindMatch::from_folder_name`] and [`venue_and_event`], so a record and the
//! hierarchy entry for the folder it lives in always agree.

use super::{FolderLayout, GalleryError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const UNKNOWN: &str = "unknown";

const IMAGE_ALIASES: &[&str] = &["slike", "foto", "photo", "picture", "image"];
const AUDIO_ALIASES: &[&str] = &["muzika", "glazba", "music", "audio"];
const VIDEO_ALIASES: &[&str] = &["video", "film"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Image, MediaKind::Audio, MediaKind::Video];

    /// Route segment used by the pages: `photos`, `music`, `videos`.
    pub fn slug(self) -> &'static str {
        match self {
            MediaKind::Image => "photos",
            MediaKind::Audio => "music",
            MediaKind::Video => "videos",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MediaKind::Image => "Fotografije",
            MediaKind::Audio => "Glazba",
            MediaKind::Video => "Videozapisi",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        MediaKind::ALL
            .into_iter()
            .find(|kind| lower == kind.slug() || lower == kind.as_str())
            .ok_or_else(|| GalleryError::UnknownMediaKind(s.to_string()))
    }
}

/// How a media kind was decided. The two fallbacks are kept apart so callers can
/// tell a recognised folder from a swallowed typo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindMatch {
    Matched(MediaKind),
    /// A type folder was present but matched none of the known names; treated as video.
    Unrecognized,
    /// No path information at all; treated as an image.
    Missing,
}

impl KindMatch {
    pub fn from_folder_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        if lower.is_empty() {
            return KindMatch::Unrecognized;
        }

        let matches = |aliases: &[&str]| aliases.iter().any(|alias| lower.contains(alias));
        if matches(IMAGE_ALIASES) {
            KindMatch::Matched(MediaKind::Image)
        } else if matches(AUDIO_ALIASES) {
            KindMatch::Matched(MediaKind::Audio)
        } else if matches(VIDEO_ALIASES) {
            KindMatch::Matched(MediaKind::Video)
        } else {
            KindMatch::Unrecognized
        }
    }

    pub fn kind(self) -> MediaKind {
        match self {
            KindMatch::Matched(kind) => kind,
            KindMatch::Unrecognized => MediaKind::Video,
            KindMatch::Missing => MediaKind::Image,
        }
    }

    pub fn is_fallback(self) -> bool {
        !matches!(self, KindMatch::Matched(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub kind: KindMatch,
    pub year: String,
    pub venue: String,
    pub event: String,
}

impl PathInfo {
    pub fn missing() -> Self {
        Self {
            kind: KindMatch::Missing,
            year: UNKNOWN.to_string(),
            venue: UNKNOWN.to_string(),
            event: UNKNOWN.to_string(),
        }
    }

    /// `venue|event`
    pub fn event_info(&self) -> String {
        format!("{}|{}", self.venue, self.event)
    }
}

/// Trimmed label, or the sentinel when nothing is left.
pub fn label_or_unknown(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Splits a packed `Venue-Event_words` folder name on its first hyphen.
pub fn split_event_folder(name: &str) -> (String, String) {
    match name.split_once('-') {
        Some((venue, event)) => (label_or_unknown(venue), label_or_unknown(event)),
        None => (label_or_unknown(name), UNKNOWN.to_string()),
    }
}

/// Venue and event for the folders found below a year folder.
/// `folders` is `[venue, event]` for the nested layout and `[venue-event]` for the packed one;
/// missing entries become the sentinel.
pub fn venue_and_event(layout: FolderLayout, folders: &[&str]) -> (String, String) {
    match layout {
        FolderLayout::Nested => (
            label_or_unknown(folders.first().copied().unwrap_or_default()),
            label_or_unknown(folders.get(1).copied().unwrap_or_default()),
        ),
        FolderLayout::Packed => match folders.first() {
            Some(folder) => split_event_folder(folder),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        },
    }
}

/// Classifies `/<type>/<year>/<venue>/<event>/<file>` (nested) or
/// `/<type>/<year>/<venue-event>/<file>` (packed). The last segment is always the
/// file name; folders missing before it become the sentinel. Never fails.
pub fn classify(path: &str, layout: FolderLayout) -> PathInfo {
    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();
    let folders = segments.split_last().map(|(_, folders)| folders).unwrap_or_default();

    let Some((type_folder, below_type)) = folders.split_first() else {
        return PathInfo::missing();
    };

    let kind = KindMatch::from_folder_name(type_folder);
    let year = label_or_unknown(below_type.first().copied().unwrap_or_default());
    let (venue, event) = venue_and_event(layout, below_type.get(1..).unwrap_or_default());

    PathInfo {
        kind,
        year,
        venue,
        event,
    }
}

/// Display form of an event folder name: underscores and hyphens become spaces.
pub fn event_label(event: &str) -> String {
    event.replace(['_', '-'], " ")
}
