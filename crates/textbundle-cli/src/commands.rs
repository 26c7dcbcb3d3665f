//! Implementations of the `textbundle` subcommands.
//!
//! Each command opens the store it needs, performs one operation and closes
//! the store again so archive changes reach the disk.

use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use textbundle::{
    ArchiveBundle, ArchiveOptions, Asset, Bundle, BundleContent, BundleError, BundleStore,
    ContentType, DirectoryBundle,
};

fn open_existing(path: &Path, options: &ArchiveOptions) -> Result<Bundle> {
    if !path.exists() {
        bail!("Bundle not found: {}", path.display());
    }
    Bundle::open_with(path, options.clone())
        .with_context(|| format!("Failed to open: {}", path.display()))
}

fn open_or_create(path: &Path, options: &ArchiveOptions) -> Result<Bundle> {
    Bundle::open_with(path, options.clone())
        .with_context(|| format!("Failed to open: {}", path.display()))
}

/// Human readable summary of a bundle.
pub fn describe(bundle: &Bundle) -> Result<String> {
    let mut out = String::new();

    let backend = if bundle.is_directory() {
        "directory"
    } else {
        "archive"
    };
    writeln!(out, "Bundle: {}", bundle.root().display())?;
    writeln!(out, "Backend: {backend}")?;
    if let Bundle::Archive(pack) = bundle {
        let inner_root = match pack.inner_root() {
            "" => "(archive root)",
            other => other,
        };
        writeln!(out, "Inner root: {inner_root}")?;
    }

    let metadata = bundle.read_metadata().context("Failed to read metadata")?;
    writeln!(out, "\nMetadata:\n{}", metadata.to_json()?)?;

    match bundle.read_content() {
        Ok(content) => writeln!(
            out,
            "\nContent: {} ({} bytes)",
            content.content_type(),
            content.bytes().len()
        )?,
        Err(BundleError::MissingFile(_)) => writeln!(out, "\nContent: (none)")?,
        Err(e) => return Err(e).context("Failed to read content"),
    }

    let mut assets: Vec<Asset> = bundle
        .read_assets()
        .context("Failed to list assets")?
        .into_iter()
        .collect();
    assets.sort_by(|a, b| a.path().cmp(b.path()));

    writeln!(out, "\nAssets ({}):", assets.len())?;
    for asset in &assets {
        let size = asset
            .read_content()
            .with_context(|| format!("Failed to read asset: {}", asset.path()))?
            .len();
        writeln!(out, "  {} ({size} bytes)", asset.path())?;
    }

    Ok(out)
}

/// Print a summary of a bundle.
pub fn info(path: &Path, options: &ArchiveOptions) -> Result<()> {
    let bundle = open_existing(path, options)?;
    print!("{}", describe(&bundle)?);
    bundle.close().context("Failed to close bundle")?;
    Ok(())
}

/// Pack a bundle directory into an archive.
pub fn pack(dir: &Path, archive: &Path, options: &ArchiveOptions) -> Result<()> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }
    if !DirectoryBundle::is_bundle_dir(dir) {
        tracing::warn!("{} has no info.json", dir.display());
    }

    let bundle = DirectoryBundle::open(dir)
        .with_context(|| format!("Failed to open: {}", dir.display()))?;
    bundle
        .pack_to_with(archive, options)
        .with_context(|| format!("Failed to pack into: {}", archive.display()))?;
    bundle.close()?;

    println!("Packed: {}", archive.display());
    Ok(())
}

/// Unpack an archive into a bundle directory.
pub fn unpack(archive: &Path, dir: &Path, options: &ArchiveOptions) -> Result<()> {
    if !archive.is_file() {
        bail!("Archive not found: {}", archive.display());
    }

    let pack = ArchiveBundle::open_with(archive, options.clone())
        .with_context(|| format!("Failed to open: {}", archive.display()))?;
    pack.unpack_to(dir)
        .with_context(|| format!("Failed to unpack into: {}", dir.display()))?;
    pack.close().context("Failed to close archive")?;

    println!("Unpacked: {}", dir.display());
    Ok(())
}

/// Remove unreferenced assets; returns the removed paths.
pub fn optimize(path: &Path, options: &ArchiveOptions) -> Result<Vec<String>> {
    let mut bundle = open_existing(path, options)?;
    let removed = bundle
        .optimize()
        .with_context(|| format!("Failed to optimize: {}", path.display()))?;
    bundle.close().context("Failed to close bundle")?;

    if removed.is_empty() {
        println!("No unused assets");
    }
    for asset in &removed {
        println!("Removed: {asset}");
    }
    Ok(removed)
}

/// Copy a file into the bundle's assets.
///
/// The asset is named after the file unless `name` is given.
pub fn add_asset(
    path: &Path,
    file: &Path,
    name: Option<&str>,
    options: &ArchiveOptions,
) -> Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("No file name in: {}", file.display()))?,
    };
    let asset = Asset::from_file(&name, file)
        .with_context(|| format!("Failed to read: {}", file.display()))?;

    let mut bundle = open_or_create(path, options)?;
    bundle
        .write_asset(&asset)
        .with_context(|| format!("Failed to add asset: {name}"))?;
    bundle.close().context("Failed to close bundle")?;

    println!("Added: {}", asset.path());
    Ok(())
}

/// Remove an asset by its name under `assets/`.
pub fn remove_asset(path: &Path, name: &str, options: &ArchiveOptions) -> Result<()> {
    let asset = Asset::new(name, Vec::new());

    let mut bundle = open_existing(path, options)?;
    let present = bundle
        .read_assets()
        .context("Failed to list assets")?
        .contains(&asset);
    bundle
        .remove_asset(&asset)
        .with_context(|| format!("Failed to remove asset: {name}"))?;
    bundle.close().context("Failed to close bundle")?;

    if present {
        println!("Removed: {}", asset.path());
    } else {
        println!("Not present: {}", asset.path());
    }
    Ok(())
}

/// Replace the primary content with the contents of a markdown file.
pub fn write_content(path: &Path, file: &Path, options: &ArchiveOptions) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read: {}", file.display()))?;
    let content = BundleContent::new(ContentType::Markdown, bytes);

    let mut bundle = open_or_create(path, options)?;
    bundle
        .write_content(&content)
        .context("Failed to write content")?;
    bundle.close().context("Failed to close bundle")?;

    println!("Wrote: {}", content.file_name());
    Ok(())
}
