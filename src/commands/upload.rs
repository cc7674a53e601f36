//! Store a local image in the upload directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::assets::AssetRef;
use crate::Site;

/// Copy `file` into the asset root and print its public URL
pub fn run(site: &Site, file: &Path) -> Result<AssetRef> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let asset = site.assets().ingest(&file_name, &bytes)?;
    println!("{}", asset.url);

    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_local_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let image = dir.path().join("diagram.svg");
        fs::write(&image, "<svg/>").unwrap();

        let asset = run(&site, &image).unwrap();
        assert!(asset.url.starts_with("/uploads/"));
        assert!(asset.url.ends_with(".svg"));
        assert!(site.upload_dir.join(&asset.name).exists());
    }
}
