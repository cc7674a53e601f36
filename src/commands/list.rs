//! List articles

use anyhow::Result;

use crate::Site;

/// Print every article, newest first
pub fn run(site: &Site, excerpts: bool) -> Result<()> {
    let service = site.service();

    if excerpts {
        let previews = service.list_previews()?;
        println!("Articles ({}):", previews.len());
        for preview in previews {
            println!(
                "  {} - {} [{}]",
                preview.summary.date, preview.summary.title, preview.summary.slug
            );
            println!("      {}", preview.excerpt.replace('\n', " "));
        }
    } else {
        let summaries = service.list_summaries()?;
        println!("Articles ({}):", summaries.len());
        for summary in summaries {
            println!("  {} - {} [{}]", summary.date, summary.title, summary.slug);
        }
    }

    Ok(())
}
