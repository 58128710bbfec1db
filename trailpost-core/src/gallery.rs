//! Photo gallery grid, rendered from the persisted album cache.

use crate::dom::Dom;
use crate::source::{fetch_json, ContentSource};
use trailpost_render::{render_fragments, AlbumCardTemplate};
use trailpost_types::Album;

pub const GALLERY_CONTAINER: &str = "gallery-grid";

/// Replace the gallery grid with one tile per album.
///
/// Returns the number of albums shown, or `None` when the page has no grid
/// or the album file could not be loaded (the static placeholders stay).
pub async fn render_gallery(
    dom: &mut Dom,
    source: &dyn ContentSource,
    albums_file: &str,
) -> Option<usize> {
    if !dom.contains_id(GALLERY_CONTAINER) {
        return None;
    }

    let albums: Vec<Album> = match fetch_json(source, albums_file).await {
        Ok(albums) => albums,
        Err(e) => {
            tracing::warn!("Error loading albums: {}", e);
            return None;
        }
    };

    let html = match render_fragments(albums.iter().map(AlbumCardTemplate::from)) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Error rendering albums: {}", e);
            return None;
        }
    };

    let mut grid = dom.element_mut(GALLERY_CONTAINER)?;
    grid.set_inner_html(&html);
    Some(albums.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSource;

    const PAGE: &str =
        r#"<html><body><div id="gallery-grid"><div class="masonry-item">placeholder</div></div></body></html>"#;

    #[tokio::test]
    async fn test_renders_album_tiles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join("data/albums.json"),
            r#"[
  {"id": "a", "title": "Winter Camp", "productUrl": "https://photos.example/a", "coverPhotoBaseUrl": "https://lh3.example/a", "mediaItemsCount": 12},
  {"id": "b", "title": "Court of Honor", "productUrl": "https://photos.example/b", "coverPhotoBaseUrl": "https://lh3.example/b=w400-h300"},
  {"id": "c", "title": "Hike", "productUrl": "https://photos.example/c"}
]"#,
        )
        .unwrap();

        let source = FsSource::new(dir.path());
        let mut dom = Dom::parse(PAGE);
        assert_eq!(
            render_gallery(&mut dom, &source, "data/albums.json").await,
            Some(3)
        );

        let grid = dom.element(GALLERY_CONTAINER).unwrap().inner_html();
        assert!(!grid.contains("placeholder</div>"));
        assert!(grid.contains("https://lh3.example/a=w600"));
        assert!(grid.contains("https://lh3.example/b=w400-h300"));
        assert!(grid.contains("assets/images/placeholder.jpg"));
        assert!(grid.contains("12 Items"));
        assert!(grid.contains("0 Items"));
    }

    #[tokio::test]
    async fn test_missing_file_keeps_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(dir.path());
        let mut dom = Dom::parse(PAGE);
        let before = dom.to_html();

        assert_eq!(render_gallery(&mut dom, &source, "data/albums.json").await, None);
        assert_eq!(dom.to_html(), before);
    }
}
