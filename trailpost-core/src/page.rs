//! Custom pages: `page.html?id=<id>` renders `content/pages/<id>.md`.

use crate::body::BodyRenderer;
use crate::dom::Dom;
use crate::frontmatter::extract;
use crate::slug::is_page_id;
use crate::source::ContentSource;

pub const TITLE_ID: &str = "page-title";
pub const DESCRIPTION_ID: &str = "page-description";
pub const BODY_ID: &str = "page-body";

pub const NOT_FOUND_TITLE: &str = "Page Not Found";
pub const NOT_FOUND_BODY: &str = "The page you are looking for does not exist.";

/// Whether a page document was found and bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Rendered,
    NotFound,
}

/// Site-relative path of the document behind a page id
pub fn page_document_path(page_id: &str) -> String {
    format!("content/pages/{}.md", page_id)
}

pub struct PageRenderer<'a> {
    source: &'a dyn ContentSource,
    body: &'a BodyRenderer,
    site_name: &'a str,
}

impl<'a> PageRenderer<'a> {
    pub fn new(source: &'a dyn ContentSource, body: &'a BodyRenderer, site_name: &'a str) -> Self {
        Self {
            source,
            body,
            site_name,
        }
    }

    /// Bind the page document into `dom`. Failures become the Not Found state.
    pub async fn render(&self, dom: &mut Dom, page_id: Option<&str>) -> PageOutcome {
        let Some(page_id) = page_id.map(str::trim).filter(|id| !id.is_empty()) else {
            tracing::debug!("No page id given");
            set_text(dom, TITLE_ID, NOT_FOUND_TITLE);
            return PageOutcome::NotFound;
        };

        if !is_page_id(page_id) {
            tracing::warn!("Rejected page id {:?}", page_id);
            return not_found(dom);
        }

        let text = match self.source.fetch_text(&page_document_path(page_id)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Error loading page {:?}: {}", page_id, e);
                return not_found(dom);
            }
        };

        let doc = extract(&text);

        if let Some(header) = &doc.header {
            if let Some(title) = header.get_text("title").filter(|t| !t.is_empty()) {
                set_text(dom, TITLE_ID, &title);
                dom.set_title(&format!("{} | {}", title, self.site_name));
            }
            if let Some(description) = header.get_text("description").filter(|d| !d.is_empty()) {
                set_text(dom, DESCRIPTION_ID, &description);
            }
        }

        let html = self.body.render(doc.body);
        match dom.element_mut(BODY_ID) {
            Some(mut element) => element.set_inner_html(&html),
            None => tracing::debug!("Template has no #{}; body dropped", BODY_ID),
        }

        PageOutcome::Rendered
    }
}

fn set_text(dom: &mut Dom, id: &str, text: &str) {
    if let Some(mut element) = dom.element_mut(id) {
        element.set_text(text);
    }
}

fn not_found(dom: &mut Dom) -> PageOutcome {
    set_text(dom, TITLE_ID, NOT_FOUND_TITLE);
    set_text(dom, BODY_ID, NOT_FOUND_BODY);
    PageOutcome::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsSource;

    const TEMPLATE: &str = r#"<!DOCTYPE html><html><head><title>Troop 93</title></head><body>
<h1 id="page-title">Loading...</h1>
<p id="page-description"></p>
<article id="page-body"></article>
</body></html>"#;

    fn site_with(pages: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let pages_dir = dir.path().join("content/pages");
        std::fs::create_dir_all(&pages_dir).unwrap();
        for (id, text) in pages {
            std::fs::write(pages_dir.join(format!("{}.md", id)), text).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_renders_title_description_and_body() {
        let dir = site_with(&[(
            "summer-camp",
            "---\ntitle: Summer Camp\ndescription: A week at Camp Whitsett\n---\nPack **light**.\n",
        )]);
        let source = FsSource::new(dir.path());
        let body = BodyRenderer::LineBreaks;
        let renderer = PageRenderer::new(&source, &body, "Troop 93 Fullerton");

        let mut dom = Dom::parse(TEMPLATE);
        let outcome = renderer.render(&mut dom, Some("summer-camp")).await;

        assert_eq!(outcome, PageOutcome::Rendered);
        assert_eq!(dom.element(TITLE_ID).unwrap().text(), "Summer Camp");
        assert_eq!(
            dom.element(DESCRIPTION_ID).unwrap().text(),
            "A week at Camp Whitsett"
        );
        assert_eq!(dom.title().as_deref(), Some("Summer Camp | Troop 93 Fullerton"));
        assert_eq!(
            dom.element(BODY_ID).unwrap().inner_html(),
            "Pack **light**.<br>"
        );
    }

    #[cfg(feature = "markdown")]
    #[tokio::test]
    async fn test_markdown_body() {
        let dir = site_with(&[("gear", "---\ntitle: Gear\n---\n## Tents\n\nBring one.\n")]);
        let source = FsSource::new(dir.path());
        let body = BodyRenderer::detect();
        let renderer = PageRenderer::new(&source, &body, "Troop 93 Fullerton");

        let mut dom = Dom::parse(TEMPLATE);
        renderer.render(&mut dom, Some("gear")).await;

        let html = dom.element(BODY_ID).unwrap().inner_html();
        assert!(html.contains(r#"<h2 id="tents">Tents</h2>"#));
        assert!(html.contains("<p>Bring one.</p>"));
    }

    #[tokio::test]
    async fn test_nonexistent_page_is_not_found() {
        let dir = site_with(&[]);
        let source = FsSource::new(dir.path());
        let body = BodyRenderer::LineBreaks;
        let renderer = PageRenderer::new(&source, &body, "Troop 93 Fullerton");

        let mut dom = Dom::parse(TEMPLATE);
        let outcome = renderer.render(&mut dom, Some("no-such-page")).await;

        assert_eq!(outcome, PageOutcome::NotFound);
        assert_eq!(dom.element(TITLE_ID).unwrap().text(), NOT_FOUND_TITLE);
        assert_eq!(dom.element(BODY_ID).unwrap().text(), NOT_FOUND_BODY);
        assert_eq!(dom.title().as_deref(), Some("Troop 93"));
    }

    #[tokio::test]
    async fn test_missing_id_only_sets_title() {
        let dir = site_with(&[]);
        let source = FsSource::new(dir.path());
        let body = BodyRenderer::LineBreaks;
        let renderer = PageRenderer::new(&source, &body, "Troop 93 Fullerton");

        let mut dom = Dom::parse(TEMPLATE);
        assert_eq!(renderer.render(&mut dom, None).await, PageOutcome::NotFound);
        assert_eq!(dom.element(TITLE_ID).unwrap().text(), NOT_FOUND_TITLE);
        assert_eq!(dom.element(BODY_ID).unwrap().inner_html(), "");
    }

    #[tokio::test]
    async fn test_traversal_id_is_not_found() {
        let dir = site_with(&[]);
        let source = FsSource::new(dir.path());
        let body = BodyRenderer::LineBreaks;
        let renderer = PageRenderer::new(&source, &body, "Troop 93 Fullerton");

        let mut dom = Dom::parse(TEMPLATE);
        let outcome = renderer.render(&mut dom, Some("../../trailpost")).await;
        assert_eq!(outcome, PageOutcome::NotFound);
        assert_eq!(dom.element(TITLE_ID).unwrap().text(), NOT_FOUND_TITLE);
    }

    #[tokio::test]
    async fn test_malformed_header_shows_whole_text() {
        let text = "---\ntitle: [unclosed\n---\nBody\n";
        let dir = site_with(&[("broken", text)]);
        let source = FsSource::new(dir.path());
        let body = BodyRenderer::LineBreaks;
        let renderer = PageRenderer::new(&source, &body, "Troop 93 Fullerton");

        let mut dom = Dom::parse(TEMPLATE);
        let outcome = renderer.render(&mut dom, Some("broken")).await;

        assert_eq!(outcome, PageOutcome::Rendered);
        assert_eq!(dom.element(TITLE_ID).unwrap().text(), "Loading...");
        assert_eq!(
            dom.element(BODY_ID).unwrap().text(),
            text.replace('\n', "")
        );
    }
}
