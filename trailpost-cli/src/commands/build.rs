//! Build command implementation.

use super::{load_config, site_renderer};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use trailpost_core::page::PageOutcome;
use trailpost_core::site::PAGE_TEMPLATE;
use trailpost_core::{Route, Secrets, SiteRenderer};
use walkdir::WalkDir;

const PAGES_DIR: &str = "content/pages";

/// Render the site into the output directory
pub async fn build_site(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let site_dir = config.site_dir();
    let output_dir = config.output_dir();

    if !site_dir.is_dir() {
        bail!("Site directory {:?} does not exist", site_dir);
    }

    tracing::info!("Building site: {}", config.site.name);
    let renderer = site_renderer(&config, &Secrets::from_env())?;

    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;
    let output_dir = output_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {:?}", output_dir))?;

    let mut rendered = 0;
    let mut copied = 0;
    let mut page_template = None;

    for entry in WalkDir::new(&site_dir)
        .into_iter()
        .filter_entry(|e| !is_within(e.path(), &output_dir))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let rel = entry
            .path()
            .strip_prefix(&site_dir)
            .context("Walked outside the site directory")?;
        let target = output_dir.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        if !is_html(rel) {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
            copied += 1;
            continue;
        }

        let template = fs::read_to_string(entry.path())
            .with_context(|| format!("Failed to read template {:?}", entry.path()))?;
        let route = Route::new(route_path(rel));
        if route.is_custom_page() {
            page_template = Some((template.clone(), rel.to_path_buf()));
        }

        let (html, _) = renderer.render(&route, &template).await;
        fs::write(&target, html).with_context(|| format!("Failed to write {:?}", target))?;
        rendered += 1;
    }

    if let Some((template, rel)) = page_template {
        rendered += render_custom_pages(&renderer, &site_dir, &output_dir, &rel, &template).await?;
    }

    tracing::info!(
        "Rendered {} page(s), copied {} file(s) to {:?}",
        rendered,
        copied,
        output_dir
    );
    Ok(())
}

/// One output file per page document: `page.html?id=camp` becomes `page-camp.html`
async fn render_custom_pages(
    renderer: &SiteRenderer,
    site_dir: &Path,
    output_dir: &Path,
    template_rel: &Path,
    template: &str,
) -> Result<usize> {
    let pages_dir = site_dir.join(PAGES_DIR);
    if !pages_dir.is_dir() {
        return Ok(0);
    }

    let mut rendered = 0;
    for entry in WalkDir::new(&pages_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let route = Route::new(route_path(template_rel)).with_page_id(id);
        let (html, outcome) = renderer.render(&route, template).await;
        if outcome == PageOutcome::NotFound {
            tracing::warn!("Skipping page {:?}: not renderable", id);
            continue;
        }

        let target = custom_page_target(output_dir, template_rel, id);
        fs::write(&target, html).with_context(|| format!("Failed to write {:?}", target))?;
        tracing::debug!("Rendered page {} -> {:?}", id, target);
        rendered += 1;
    }

    Ok(rendered)
}

fn custom_page_target(output_dir: &Path, template_rel: &Path, id: &str) -> PathBuf {
    let stem = template_rel
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    let dir = template_rel.parent().unwrap_or(Path::new(""));
    output_dir.join(dir).join(format!("{}-{}.html", stem, id))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

fn is_within(path: &Path, dir: &Path) -> bool {
    path.canonicalize()
        .map(|p| p.starts_with(dir))
        .unwrap_or(false)
}

/// Request path a template would be served at
fn route_path(rel: &Path) -> String {
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", parts.join("/"))
}
