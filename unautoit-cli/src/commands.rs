pub mod extract;
pub mod extract_all;
pub mod list;

use anyhow::Context;
use std::path::Path;
use unautoit::Catalog;
use unautoit::Decompiler;

/// Read and parse a compiled binary.
///
/// A missing input is rejected before anything else is done.
pub fn load_catalog<D>(decompiler: &D, input: &Path) -> anyhow::Result<Catalog>
where
    D: Decompiler,
{
    anyhow::ensure!(input.exists(), "\"{}\" does not exist", input.display());

    let bytes =
        std::fs::read(input).with_context(|| format!("failed to read \"{}\"", input.display()))?;
    let catalog = Catalog::load(decompiler, &bytes)
        .with_context(|| format!("failed to parse \"{}\"", input.display()))?;

    tracing::debug!(
        "loaded {} resources from \"{}\"",
        catalog.len(),
        input.display()
    );

    Ok(catalog)
}
