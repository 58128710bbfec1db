//! Cursor-driven walk over the album listing.

use crate::client::PhotosClient;
use crate::error::PhotosError;
use std::collections::HashSet;
use trailpost_types::Album;

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Sequence of album pages, fetched strictly one after another.
///
/// The cursor for page N+1 is only known once page N has been read, so
/// there is no prefetching. Not restartable.
pub struct AlbumPager<'a> {
    client: &'a PhotosClient,
    cursor: Cursor,
    seen: HashSet<String>,
    pages: usize,
}

impl<'a> AlbumPager<'a> {
    pub fn new(client: &'a PhotosClient) -> Self {
        Self {
            client,
            cursor: Cursor::Start,
            seen: HashSet::new(),
            pages: 0,
        }
    }

    /// Number of pages fetched so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page of normalized albums, or `None` once exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<Album>>, PhotosError> {
        let token = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };

        let page = self.client.list_albums(token.as_deref()).await?;
        self.pages += 1;

        if let Some(next) = page.cursor() {
            if !self.seen.insert(next.to_string()) {
                return Err(PhotosError::RepeatedCursor(next.to_string()));
            }
            self.cursor = Cursor::Next(next.to_string());
        }

        Ok(Some(page.albums.into_iter().map(Album::from).collect()))
    }

    /// Walk every page and concatenate the albums in listing order
    pub async fn collect_all(mut self) -> Result<Vec<Album>, PhotosError> {
        let mut albums = Vec::new();

        while let Some(page) = self.next_page().await? {
            tracing::debug!("Page {}: {} album(s)", self.pages(), page.len());
            albums.extend(page);
        }

        Ok(albums)
    }
}
