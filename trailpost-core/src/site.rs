//! Per-page dispatch: decides which renderers run for a template.
//!
//! Renderers are independent. Each one checks for its own containers and
//! a failure in one leaves the others untouched.

use crate::body::BodyRenderer;
use crate::calendar::CalendarClient;
use crate::collections::COLLECTIONS;
use crate::dom::Dom;
use crate::events::render_events;
use crate::gallery::render_gallery;
use crate::page::{PageOutcome, PageRenderer};
use crate::section::{load_section, section_document};
use crate::source::ContentSource;
use chrono::Local;
use std::sync::Arc;

pub const PAGE_TEMPLATE: &str = "page.html";
pub const PAGE_ID_PARAM: &str = "id";

/// The request a template is rendered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub page_id: Option<String>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            page_id: None,
        }
    }

    /// Build from a request path and its raw query string
    pub fn from_request(path: &str, query: Option<&str>) -> Self {
        let page_id = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(k, _)| k == PAGE_ID_PARAM)
                .map(|(_, v)| v.into_owned())
        });

        Self {
            path: path.to_string(),
            page_id,
        }
    }

    pub fn with_page_id(mut self, id: impl Into<String>) -> Self {
        self.page_id = Some(id.into());
        self
    }

    pub fn is_custom_page(&self) -> bool {
        self.path.ends_with(PAGE_TEMPLATE)
    }
}

pub struct SiteRenderer {
    site_name: String,
    source: Arc<dyn ContentSource>,
    body: BodyRenderer,
    calendar: Option<CalendarClient>,
    calendar_page: String,
    albums_file: String,
}

impl SiteRenderer {
    pub fn new(site_name: impl Into<String>, source: Arc<dyn ContentSource>) -> Self {
        Self {
            site_name: site_name.into(),
            source,
            body: BodyRenderer::detect(),
            calendar: None,
            calendar_page: String::from("calendar.html"),
            albums_file: String::from("data/albums.json"),
        }
    }

    pub fn with_body_renderer(mut self, body: BodyRenderer) -> Self {
        self.body = body;
        self
    }

    pub fn with_calendar(mut self, calendar: Option<CalendarClient>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_calendar_page(mut self, calendar_page: impl Into<String>) -> Self {
        self.calendar_page = calendar_page.into();
        self
    }

    pub fn with_albums_file(mut self, albums_file: impl Into<String>) -> Self {
        self.albums_file = albums_file.into();
        self
    }

    /// Bind all content for `route` into the template and serialize it
    pub async fn render(&self, route: &Route, template: &str) -> (String, PageOutcome) {
        let mut dom = Dom::parse(template);
        let outcome = self.render_dom(route, &mut dom).await;
        (dom.to_html(), outcome)
    }

    pub async fn render_dom(&self, route: &Route, dom: &mut Dom) -> PageOutcome {
        let source = self.source.as_ref();

        for collection in COLLECTIONS {
            if collection.is_wanted(dom) {
                collection.render(dom, source).await;
            }
        }

        render_gallery(dom, source, &self.albums_file).await;
        render_events(dom, self.calendar.as_ref(), &self.calendar_page, &Local::now()).await;

        let mut outcome = PageOutcome::Rendered;
        if route.is_custom_page() {
            let pages = PageRenderer::new(source, &self.body, &self.site_name);
            outcome = pages.render(dom, route.page_id.as_deref()).await;
        }

        if let Some(document) = section_document(&route.path) {
            load_section(dom, source, document).await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSource;

    #[test]
    fn test_route_from_request() {
        let route = Route::from_request("/page.html", Some("id=summer-camp&x=1"));
        assert!(route.is_custom_page());
        assert_eq!(route.page_id.as_deref(), Some("summer-camp"));

        let route = Route::from_request("/page.html", Some("id=court%20of%20honor"));
        assert_eq!(route.page_id.as_deref(), Some("court of honor"));

        let route = Route::from_request("/about.html", None);
        assert!(!route.is_custom_page());
        assert_eq!(route.page_id, None);
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("content/pages")).unwrap();
        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(
            root.join("content/home.md"),
            "---\nhero_title: Welcome to Troop 93\n---\n",
        )
        .unwrap();
        std::fs::write(
            root.join("content/pages/campout.md"),
            "---\ntitle: Campout\n---\nSee you there.",
        )
        .unwrap();
        std::fs::write(
            root.join("data/eagles.json"),
            r#"{"scouts": [{"name": "Chris Vo", "date_display": "Apr 2023", "class_year": "2023"}]}"#,
        )
        .unwrap();
        dir
    }

    fn renderer(dir: &tempfile::TempDir) -> SiteRenderer {
        SiteRenderer::new("Troop 93 Fullerton", Arc::new(FsSource::new(dir.path())))
            .with_body_renderer(BodyRenderer::LineBreaks)
    }

    #[tokio::test]
    async fn test_home_page_binds_section_and_collections() {
        let dir = fixture();
        let template = r#"<html><head><title>Home</title></head><body>
<h1 id="hero-title">placeholder</h1>
<div id="eagles-list"></div>
<div id="upcoming-events-container"></div>
</body></html>"#;

        let (html, outcome) = renderer(&dir)
            .render(&Route::new("/index.html"), template)
            .await;

        assert_eq!(outcome, PageOutcome::Rendered);
        assert!(html.contains("Welcome to Troop 93"));
        assert!(html.contains("Chris Vo"));
        assert!(html.contains("Please configure the Google Calendar API key"));
    }

    #[tokio::test]
    async fn test_custom_page_and_not_found() {
        let dir = fixture();
        let template = r#"<html><head><title>Page</title></head><body>
<h1 id="page-title"></h1><div id="page-body"></div>
</body></html>"#;
        let site = renderer(&dir);

        let route = Route::new("/page.html").with_page_id("campout");
        let (html, outcome) = site.render(&route, template).await;
        assert_eq!(outcome, PageOutcome::Rendered);
        assert!(html.contains("<title>Campout | Troop 93 Fullerton</title>"));
        assert!(html.contains("See you there."));

        let route = Route::new("/page.html").with_page_id("missing");
        let (html, outcome) = site.render(&route, template).await;
        assert_eq!(outcome, PageOutcome::NotFound);
        assert!(html.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn test_plain_page_is_untouched() {
        let dir = fixture();
        let template = r#"<!DOCTYPE html><html><head><title>Contact</title></head><body><p>Hi &amp; welcome</p><noscript><img src="pixel.gif"></noscript></body></html>"#;
        let (html, outcome) = renderer(&dir)
            .render(&Route::new("/contact.html"), template)
            .await;

        assert_eq!(outcome, PageOutcome::Rendered);
        assert_eq!(html, template);
    }
}
