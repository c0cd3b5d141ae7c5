use super::{
    EventEntry, FolderLayout, Hierarchy, MediaFilter, MediaKind, MediaRecord, MediaTypeGroup,
    YearNode,
    classify::{KindMatch, UNKNOWN, event_label, label_or_unknown, venue_and_event},
    walker::WalkedFolder,
};
use std::collections::BTreeSet;

/// Newest first. Stable, so equal timestamps keep walk order.
fn sort_newest_first(records: &mut [MediaRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub fn by_kind(records: Vec<MediaRecord>, kind: MediaKind) -> Vec<MediaRecord> {
    let mut matching: Vec<_> = records.into_iter().filter(|r| r.kind == kind).collect();
    sort_newest_first(&mut matching);
    matching
}

/// Case-insensitive substring match on title or virtual path.
pub fn search(records: Vec<MediaRecord>, term: &str, kind: Option<MediaKind>) -> Vec<MediaRecord> {
    let term = term.to_lowercase();
    let mut matching: Vec<_> = records
        .into_iter()
        .filter(|r| kind.is_none_or(|kind| r.kind == kind))
        .filter(|r| r.matches_term(&term))
        .collect();
    sort_newest_first(&mut matching);
    matching
}

/// Distinct years, descending.
pub fn available_years(records: &[MediaRecord]) -> Vec<String> {
    let years: BTreeSet<&str> = records.iter().map(|r| r.year.as_str()).collect();
    years.into_iter().rev().map(str::to_string).collect()
}

/// Distinct venues other than the sentinel, ascending.
pub fn available_venues(records: &[MediaRecord]) -> Vec<String> {
    let venues: BTreeSet<&str> = records
        .iter()
        .map(|r| r.venue.as_str())
        .filter(|venue| *venue != UNKNOWN)
        .collect();
    venues.into_iter().map(str::to_string).collect()
}

/// Exact-match year and venue narrowing of an already fetched base set.
pub fn apply_filter(records: Vec<MediaRecord>, filter: &MediaFilter) -> Vec<MediaRecord> {
    let year = filter.year_filter();
    let venue = filter.venue_filter();
    records
        .into_iter()
        .filter(|r| year.is_none_or(|year| r.year == year))
        .filter(|r| venue.is_none_or(|venue| r.venue == venue))
        .collect()
}

/// Year -> kind -> event tree from the event folders of one walk.
pub fn build_hierarchy(folders: &[WalkedFolder], layout: FolderLayout) -> Hierarchy {
    let mut years: Vec<YearNode> = Vec::new();

    for folder in folders {
        let trail: Vec<&str> = folder.trail.iter().map(String::as_str).collect();
        let Some((type_folder, rest)) = trail.split_first() else {
            continue;
        };

        let kind = KindMatch::from_folder_name(type_folder).kind();
        let year = label_or_unknown(rest.first().copied().unwrap_or_default());
        let (venue, event_name) = venue_and_event(layout, rest.get(1..).unwrap_or_default());

        let year_index = match years.iter().position(|node| node.year == year) {
            Some(index) => index,
            None => {
                years.push(YearNode {
                    year,
                    media_types: Vec::new(),
                });
                years.len() - 1
            }
        };
        let media_types = &mut years[year_index].media_types;

        let group_index = match media_types.iter().position(|group| group.kind == kind) {
            Some(index) => index,
            None => {
                media_types.push(MediaTypeGroup {
                    kind,
                    slug: kind.slug().to_string(),
                    type_name: kind.display_name().to_string(),
                    events: Vec::new(),
                });
                media_types.len() - 1
            }
        };

        media_types[group_index].events.push(EventEntry {
            id: folder.id.clone(),
            name: trail.last().copied().unwrap_or_default().to_string(),
            label: event_label(&event_name),
            venue,
            event_name,
        });
    }

    years.sort_by(|a, b| b.year.cmp(&a.year));
    for year in &mut years {
        year.media_types.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        for group in &mut year.media_types {
            group.events.sort_by(|a, b| a.venue.cmp(&b.venue));
        }
    }

    Hierarchy { years }
}
