//! Delete an article

use anyhow::Result;

use crate::Site;

pub fn run(site: &Site, slug: &str) -> Result<()> {
    site.service().remove(slug)?;
    println!("Deleted: {}", slug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ArticleInput;
    use tempfile::TempDir;

    #[test]
    fn test_delete_then_missing() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        site.service()
            .create("gone", ArticleInput::new("Gone", "2024-01-01", "bye"))
            .unwrap();

        run(&site, "gone").unwrap();
        assert!(run(&site, "gone").is_err());
    }
}
