//! Static HTML report writer.

use std::path::Path;

use askama::Template;
use minify_html::Cfg;
use tracing::{debug, info};

use crate::error::{ReportError, Result};

/// Render a page, optionally minified.
pub fn render_html<T: Template>(page: &T, minify: bool) -> Result<String> {
    let html = page.render()?;
    if !minify {
        return Ok(html);
    }
    let minified = minify_html::minify(html.as_bytes(), &minify_config());
    debug!(
        original = html.len(),
        minified = minified.len(),
        "minified report"
    );
    Ok(String::from_utf8_lossy(&minified).into_owned())
}

/// Render and write a page to `path`, creating parent directories.
pub fn write_report<T: Template>(page: &T, path: &Path, minify: bool) -> Result<usize> {
    let html = render_html(page, minify)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, &html).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = html.len(), "report written");
    Ok(html.len())
}

fn minify_config() -> Cfg {
    let mut cfg = Cfg::new();
    cfg.do_not_minify_doctype = true;
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.minify_css = true;
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::ErrorPage;
    use tempfile::tempdir;

    #[test]
    fn minified_output_is_smaller() {
        let page = ErrorPage::new("Heading", "Body text");
        let plain = render_html(&page, false).unwrap();
        let small = render_html(&page, true).unwrap();
        assert!(small.len() < plain.len());
        assert!(small.contains("Body text"));
    }

    #[test]
    fn writes_into_new_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");
        let written = write_report(&ErrorPage::new("a", "b"), &path, false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.len(), written);
        assert!(content.starts_with("<!DOCTYPE html>"));
    }
}
