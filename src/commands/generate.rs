//! Generate static article output

use anyhow::Result;
use std::fs;

use crate::content::{to_html, MarkdownRenderer};
use crate::server::RenderedArticle;
use crate::Site;

/// Output directory under `public_dir`
pub const OUTPUT_DIR: &str = "articles";

/// Write `index.json` plus a JSON element tree and an HTML fragment per article
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let service = site.service();
    let components = site.config.component_map()?;
    let renderer = MarkdownRenderer::new();
    let output_dir = site.public_dir.join(OUTPUT_DIR);
    fs::create_dir_all(&output_dir)?;

    let previews = service.list_previews()?;
    fs::write(
        output_dir.join("index.json"),
        serde_json::to_string_pretty(&previews)?,
    )?;

    let mut written = 0;
    for slug in service.slugs()? {
        let article = match service.get_full(&slug) {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", slug, e);
                continue;
            }
        };

        let elements = renderer.render(&article.body, &components);
        fs::write(output_dir.join(format!("{}.html", slug)), to_html(&elements))?;

        let rendered = RenderedArticle {
            slug: article.slug.to_string(),
            title: article.title,
            date: article.date,
            elements,
        };
        fs::write(
            output_dir.join(format!("{}.json", slug)),
            serde_json::to_string_pretty(&rendered)?,
        )?;

        tracing::debug!("Generated: {}", slug);
        written += 1;
    }

    tracing::info!(
        "Generated {} articles in {:.2}s",
        written,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ArticleInput;
    use tempfile::TempDir;

    #[test]
    fn test_generate_writes_index_and_pages() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let service = site.service();
        service
            .create("a", ArticleInput::new("A", "2024-01-01", "Hello *there*"))
            .unwrap();
        service
            .create("b", ArticleInput::new("B", "2024-03-01", "Second"))
            .unwrap();
        fs::write(site.content_dir.join("broken.mdx"), "no frontmatter").unwrap();

        site.generate().unwrap();

        let out = site.public_dir.join(OUTPUT_DIR);
        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("index.json")).unwrap()).unwrap();
        let slugs: Vec<_> = index
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(slugs, vec!["b", "a"]);

        let html = fs::read_to_string(out.join("a.html")).unwrap();
        assert_eq!(html, "<p>Hello <em>there</em></p>");

        let page: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("a.json")).unwrap()).unwrap();
        assert_eq!(page["title"], "A");
        assert_eq!(page["elements"][0]["name"], "p");

        assert!(!out.join("broken.json").exists());
    }
}
