//! `ercsift registry`: export the bundled catalog, verify config files.

use std::path::Path;

use anyhow::{Context, Result};
use ercsift_core::{catalog, config, RegistryError};

pub fn export(output: Option<&Path>) -> Result<()> {
    let registry = catalog::registry().context("build bundled catalog")?;
    match output {
        Some(path) => {
            config::write_file(&registry, path)
                .with_context(|| format!("write registry '{}'", path.display()))?;
            println!("Exported {} standards → {}", registry.len(), path.display());
        }
        None => println!("{}", config::to_json(&registry)?),
    }
    Ok(())
}

/// Load `path`, then check that exporting it reproduces an equal registry.
pub fn verify(path: &Path) -> Result<()> {
    let registry = config::load_file(path)
        .with_context(|| format!("load registry '{}'", path.display()))?;
    let reloaded = config::from_json(&config::to_json(&registry)?)?;
    if reloaded != registry {
        return Err(RegistryError::config("registry does not survive an export/load round trip").into());
    }

    println!("✓ {}: {} standards", path.display(), registry.len());
    for def in &registry {
        println!(
            "  {:<10} {:>2} selectors  {:>2} events",
            def.name(),
            def.selectors().len(),
            def.topics().count()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_catalog_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        export(Some(&path)).unwrap();
        verify(&path).unwrap();
    }

    #[test]
    fn tampered_selector_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        export(Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap().replace("a9059cbb", "deadbeef");
        std::fs::write(&path, text).unwrap();
        let err = verify(&path).unwrap_err();
        assert!(err.chain().any(|e| e.downcast_ref::<RegistryError>().is_some()));
    }
}
