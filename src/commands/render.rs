//! Render an article body through the component map

use anyhow::{bail, Result};

use crate::content::{to_html, Element, MarkdownRenderer};
use crate::Site;

/// Element tree for the article `slug`, using the configured components
pub fn render_article(site: &Site, slug: &str) -> Result<Vec<Element>> {
    let article = site.service().get_full(slug)?;
    let components = site.config.component_map()?;
    Ok(MarkdownRenderer::new().render(&article.body, &components))
}

/// Print the rendered article as `json` or `html`
pub fn run(site: &Site, slug: &str, format: &str) -> Result<()> {
    let elements = render_article(site, slug)?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&elements)?),
        "html" => println!("{}", to_html(&elements)),
        _ => bail!("Unknown format: {}. Available: json, html", format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ArticleInput;
    use tempfile::TempDir;

    #[test]
    fn test_render_uses_configured_components() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(crate::CONFIG_FILE),
            "components:\n  heading2: SectionTitle\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        site.service()
            .create("doc", ArticleInput::new("Doc", "2024-01-01", "## Part\n\ntext"))
            .unwrap();

        let elements = render_article(&site, "doc").unwrap();
        match &elements[0] {
            Element::Component { name, .. } => assert_eq!(name, "SectionTitle"),
            other => panic!("unexpected element {:?}", other),
        }
        assert!(run(&site, "doc", "yaml").is_err());
    }
}
