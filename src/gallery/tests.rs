use super::*;
use crate::GalleryConfig;
use crate::store::{MemoryStore, RemoteEntry};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

const ROOT: &str = "root";

fn at(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn file(id: &str, name: &str, mime: &str, created: chrono::DateTime<Utc>) -> RemoteEntry {
    RemoteEntry::file(id, name, mime).with_created_at(created)
}

fn archive() -> MemoryStore {
    MemoryStore::new()
        .with_file_at(
            ROOT,
            &["Slike", "1999", "Pula", "Ljetni_festival"],
            file("p1", "photo1.jpg", "image/jpeg", at(1999, 7, 1)),
        )
        .with_file_at(
            ROOT,
            &["Slike", "2004", "Žminj", "Bartulja"],
            file("p2", "kolo.jpg", "image/jpeg", at(2004, 8, 24)),
        )
        .with_file_at(
            ROOT,
            &["Slike", "2004", "Pula", "Smotra"],
            file("p3", "nastup.jpg", "image/jpeg", at(2004, 9, 2)),
        )
        .with_file_at(
            ROOT,
            &["Muzika", "1999", "Pula", "Ljetni_festival"],
            file("m1", "sopele.mp3", "audio/mpeg", at(1999, 7, 2)),
        )
        .with_file_at(
            ROOT,
            &["Video", "2010", "Rovinj", "Koncert"],
            file("v1", "koncert.mp4", "video/mp4", at(2010, 5, 5)),
        )
}

fn gallery_over(store: MemoryStore) -> Gallery {
    Gallery::new(GalleryConfig::default(), Arc::new(store), ROOT)
}

fn ids(records: &[MediaRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_single_file_scenario() {
    let gallery = gallery_over(MemoryStore::new().with_file_at(
        ROOT,
        &["Slike", "1999", "Pula", "Ljetni_festival"],
        file("p1", "photo1.jpg", "image/jpeg", at(1999, 7, 1)),
    ));

    let records = gallery.media_by_kind(MediaKind::Image).await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.kind, MediaKind::Image);
    assert_eq!(record.year, "1999");
    assert_eq!(record.venue, "Pula");
    assert_eq!(record.event, "Ljetni_festival");
    assert_eq!(record.title, "photo1");

    let hierarchy = gallery.hierarchy().await;
    let event = &hierarchy.years[0].media_types[0].events[0];
    assert_eq!(event.venue, record.venue);
    assert_eq!(event.event_name, record.event);
    assert_eq!(event.label, "Ljetni festival");
}

#[tokio::test]
async fn test_by_kind_sorts_newest_first() {
    let gallery = gallery_over(archive());

    let images = gallery.media_by_kind(MediaKind::Image).await;
    assert_eq!(ids(&images), vec!["p3", "p2", "p1"]);

    let audio = gallery.media_by_kind(MediaKind::Audio).await;
    assert_eq!(ids(&audio), vec!["m1"]);
}

#[tokio::test]
async fn test_equal_timestamps_keep_walk_order() {
    let same = at(2001, 1, 1);
    let gallery = gallery_over(
        MemoryStore::new()
            .with_file_at(ROOT, &["Slike", "2001", "A", "E"], file("a", "a.jpg", "image/jpeg", same))
            .with_file_at(ROOT, &["Slike", "2001", "A", "E"], file("b", "b.jpg", "image/jpeg", same))
            .with_file_at(ROOT, &["Slike", "2001", "A", "E"], file("c", "c.jpg", "image/jpeg", same)),
    );

    let images = gallery.media_by_kind(MediaKind::Image).await;
    assert_eq!(ids(&images), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_search_matches_title_or_path() {
    let gallery = gallery_over(archive());

    let by_title = gallery.search("KOLO", None).await;
    assert_eq!(ids(&by_title), vec!["p2"]);

    let by_path = gallery.search("pula", None).await;
    assert_eq!(ids(&by_path), vec!["p3", "m1", "p1"]);

    let by_path_and_kind = gallery.search("pula", Some(MediaKind::Audio)).await;
    assert_eq!(ids(&by_path_and_kind), vec!["m1"]);

    assert!(gallery.search("nowhere", None).await.is_empty());
}

#[tokio::test]
async fn test_years_and_venues_are_sorted_and_distinct() {
    let gallery = gallery_over(
        archive().with_file_at(
            ROOT,
            &["Slike", "2004"],
            file("stray", "stray.jpg", "image/jpeg", at(2004, 1, 1)),
        ),
    );

    assert_eq!(gallery.available_years().await, vec!["2010", "2004", "1999"]);
    assert_eq!(gallery.available_venues().await, vec!["Pula", "Rovinj", "Žminj"]);
}

#[test]
fn test_facets_of_no_records_are_empty() {
    assert!(queries::available_years(&[]).is_empty());
    assert!(queries::available_venues(&[]).is_empty());
}

#[test]
fn test_unknown_venue_is_not_offered() {
    let entry = RemoteEntry::file("x", "loose.jpg", "image/jpeg");
    let record = MediaRecord::build(&entry, FolderLayout::Nested);
    assert_eq!(record.venue, UNKNOWN);

    assert!(queries::available_venues(&[record.clone()]).is_empty());
    assert_eq!(queries::available_years(&[record]), vec![UNKNOWN]);
}

#[tokio::test]
async fn test_combined_filter() {
    let gallery = gallery_over(archive());
    let all_images = gallery.media_by_kind(MediaKind::Image).await;

    let unchanged = MediaFilter {
        search: None,
        year: Some(ALL.to_string()),
        venue: Some(ALL.to_string()),
    };
    assert_eq!(
        gallery.filtered_media(MediaKind::Image, &unchanged).await,
        all_images
    );

    let pula = MediaFilter {
        search: None,
        year: Some(ALL.to_string()),
        venue: Some("Pula".to_string()),
    };
    assert_eq!(
        ids(&gallery.filtered_media(MediaKind::Image, &pula).await),
        vec!["p3", "p1"]
    );

    let pula_2004 = MediaFilter {
        year: Some("2004".to_string()),
        ..pula.clone()
    };
    assert_eq!(
        ids(&gallery.filtered_media(MediaKind::Image, &pula_2004).await),
        vec!["p3"]
    );

    let searched = MediaFilter {
        search: Some("festival".to_string()),
        ..unchanged.clone()
    };
    assert_eq!(
        ids(&gallery.filtered_media(MediaKind::Image, &searched).await),
        vec!["p1"]
    );

    // Venue matching is exact, not a substring or case-insensitive match
    let lowercase = MediaFilter {
        venue: Some("pula".to_string()),
        ..Default::default()
    };
    assert!(
        gallery
            .filtered_media(MediaKind::Image, &lowercase)
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_queries_are_idempotent() {
    let gallery = gallery_over(archive());

    assert_eq!(
        gallery.media_by_kind(MediaKind::Image).await,
        gallery.media_by_kind(MediaKind::Image).await
    );
    assert_eq!(gallery.search("pula", None).await, gallery.search("pula", None).await);
    assert_eq!(gallery.available_years().await, gallery.available_years().await);
    assert_eq!(gallery.hierarchy().await, gallery.hierarchy().await);
}

#[tokio::test]
async fn test_each_query_walks_afresh() {
    let store = Arc::new(archive());
    let gallery = Gallery::new(GalleryConfig::default(), store.clone(), ROOT);

    gallery.available_years().await;
    let first = store.list_calls();
    gallery.available_years().await;
    assert_eq!(store.list_calls(), first * 2);
}

#[tokio::test]
async fn test_root_failure_empties_every_query() {
    let gallery = gallery_over(archive().fail_on(ROOT));

    assert!(gallery.media_by_kind(MediaKind::Image).await.is_empty());
    assert!(gallery.search("pula", None).await.is_empty());
    assert!(gallery.available_years().await.is_empty());
    assert!(gallery.available_venues().await.is_empty());
    assert!(gallery.hierarchy().await.years.is_empty());
    assert!(
        gallery
            .filtered_media(MediaKind::Image, &MediaFilter::default())
            .await
            .is_empty()
    );
    assert!(gallery.try_records().await.is_err());
}

#[tokio::test]
async fn test_descendant_failure_is_all_or_nothing() {
    let gallery = gallery_over(archive().fail_on("root/Video/2010/Rovinj"));

    assert!(gallery.media_by_kind(MediaKind::Image).await.is_empty());
    assert!(matches!(
        gallery.try_records().await,
        Err(GalleryError::Store(_))
    ));
}

#[tokio::test]
async fn test_unavailable_gallery_is_empty() {
    let gallery = Gallery::unavailable(GalleryConfig::default());

    assert!(!gallery.is_available());
    assert!(gallery.store_name().is_none());
    assert!(gallery.media_by_kind(MediaKind::Video).await.is_empty());
    assert!(gallery.available_venues().await.is_empty());
    assert_eq!(gallery.hierarchy().await, Hierarchy::default());
    assert!(matches!(
        gallery.try_records().await,
        Err(GalleryError::Unavailable)
    ));
}

#[tokio::test]
async fn test_from_config_without_credentials_is_unavailable() {
    let mut config = crate::Config::default();
    config.store.api_key = Some("   ".to_string());
    config.store.root_folder_id = Some(String::new());

    // Only trusts the outcome when the environment does not supply credentials
    if config.store.resolved_root_folder_id().is_none() {
        let gallery = Gallery::from_config(&config).await;
        assert!(!gallery.is_available());
    }
}

#[tokio::test]
async fn test_hierarchy_sorting() {
    let gallery = gallery_over(archive());
    let hierarchy = gallery.hierarchy().await;

    let years: Vec<_> = hierarchy.years.iter().map(|y| y.year.as_str()).collect();
    assert_eq!(years, vec!["2010", "2004", "1999"]);

    let year_1999 = &hierarchy.years[2];
    let type_names: Vec<_> = year_1999
        .media_types
        .iter()
        .map(|g| g.type_name.as_str())
        .collect();
    assert_eq!(type_names, vec!["Fotografije", "Glazba"]);

    let year_2004 = &hierarchy.years[1];
    assert_eq!(year_2004.media_types.len(), 1);
    let venues: Vec<_> = year_2004.media_types[0]
        .events
        .iter()
        .map(|e| e.venue.as_str())
        .collect();
    assert_eq!(venues, vec!["Pula", "Žminj"]);
    assert_eq!(year_2004.media_types[0].slug, "photos");
}

#[tokio::test]
async fn test_same_event_different_kinds_are_separate_groups() {
    let gallery = gallery_over(archive());
    let hierarchy = gallery.hierarchy().await;

    let year_1999 = hierarchy
        .years
        .iter()
        .find(|y| y.year == "1999")
        .unwrap();
    assert_eq!(year_1999.media_types.len(), 2);
    for group in &year_1999.media_types {
        assert_eq!(group.events.len(), 1);
        assert_eq!(group.events[0].venue, "Pula");
        assert_eq!(group.events[0].event_name, "Ljetni_festival");
    }
    assert_ne!(year_1999.media_types[0].kind, year_1999.media_types[1].kind);
}

#[tokio::test]
async fn test_hierarchy_and_records_agree_on_packed_names() {
    let config = GalleryConfig {
        layout: FolderLayout::Packed,
        ..Default::default()
    };
    let store = MemoryStore::new().with_file_at(
        ROOT,
        &["Fotografije", "2023", "Pula-Ljetni_festival-folklora"],
        file("p1", "image.jpg", "image/jpeg", at(2023, 6, 1)),
    );
    let gallery = Gallery::new(config, Arc::new(store), ROOT);

    let record = gallery.media_by_kind(MediaKind::Image).await.remove(0);
    let hierarchy = gallery.hierarchy().await;
    let event = &hierarchy.years[0].media_types[0].events[0];

    assert_eq!(record.venue, "Pula");
    assert_eq!(record.event, "Ljetni_festival-folklora");
    assert_eq!(event.venue, record.venue);
    assert_eq!(event.event_name, record.event);
    assert_eq!(event.name, "Pula-Ljetni_festival-folklora");
    assert_eq!(event.label, "Ljetni festival folklora");
}

#[tokio::test]
async fn test_unrecognized_type_folder_lands_in_video() {
    let gallery = gallery_over(MemoryStore::new().with_file_at(
        ROOT,
        &["Dokumenti", "2015", "Pula", "Sastanak"],
        file("d1", "scan.jpg", "image/jpeg", at(2015, 3, 3)),
    ));

    let videos = gallery.media_by_kind(MediaKind::Video).await;
    assert_eq!(ids(&videos), vec!["d1"]);
    assert!(classify(&videos[0].path, FolderLayout::Nested).kind.is_fallback());

    let hierarchy = gallery.hierarchy().await;
    assert_eq!(hierarchy.years[0].media_types[0].kind, MediaKind::Video);
}
