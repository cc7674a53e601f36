//! Print one article

use anyhow::Result;

use crate::Site;

/// Print an article's metadata and raw body
pub fn run(site: &Site, slug: &str) -> Result<()> {
    let article = site.service().get_full(slug)?;

    println!("Title: {}", article.title);
    println!("Date:  {}", article.date);
    for (key, value) in &article.extra {
        println!("{}: {}", key, serde_yaml::to_string(value)?.trim_end());
    }
    println!();
    print!("{}", article.body);

    Ok(())
}
