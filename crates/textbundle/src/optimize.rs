//! Pruning of unreferenced assets.

use crate::{BundleResult, BundleStore};

/// Remove every asset whose relative path does not occur in the primary content.
///
/// References are found by plain substring search of the content text for
/// `assets/<name>`, so a reference written with a different encoding (for
/// example percent-escaped) does not keep its asset alive.
///
/// Assets are removed one at a time in path order. If a removal fails the
/// error is returned and the assets removed so far stay removed.
///
/// Returns the relative paths of the removed assets.
pub fn optimize<S: BundleStore + ?Sized>(store: &mut S) -> BundleResult<Vec<String>> {
    let content = store.read_content()?;
    let text = content.text();

    let mut unused: Vec<_> = store
        .read_assets()?
        .into_iter()
        .filter(|asset| !text.contains(asset.path()))
        .collect();
    unused.sort_by(|a, b| a.path().cmp(b.path()));

    let mut removed = Vec::with_capacity(unused.len());
    for asset in &unused {
        store.remove_asset(asset)?;
        removed.push(asset.path().to_string());
    }

    tracing::info!(
        "Optimized {}: removed {} unused asset(s)",
        store.root().display(),
        removed.len()
    );
    Ok(removed)
}
