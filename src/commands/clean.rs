//! Clean the generated article output

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove `<public>/articles`; uploaded assets are left alone
pub fn run(site: &Site) -> Result<()> {
    let output_dir = site.public_dir.join(super::generate::OUTPUT_DIR);
    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)?;
        tracing::info!("Deleted: {:?}", output_dir);
    }

    Ok(())
}
