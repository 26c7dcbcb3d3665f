#![allow(non_snake_case)]

use super::*;
use crate::{BundleError, ContentType, DirectoryBundle};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, bytes) in files {
        if name.ends_with('/') {
            zip.add_directory(*name, SimpleFileOptions::default())
                .unwrap();
        } else {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }
    zip.finish().unwrap();
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

// Opening and inner root

#[test]
fn ArchiveBundle___open___new_archive___uses_named_inner_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.textpack");

    let pack = ArchiveBundle::open(&path).unwrap();

    assert_eq!(pack.inner_root(), "notes.textbundle");
    assert!(pack.has_pending_changes());
}

#[test]
fn ArchiveBundle___open___new_archive_without_extension___uses_random_name() {
    let temp_dir = TempDir::new().unwrap();

    let pack = ArchiveBundle::open(temp_dir.path().join("notes")).unwrap();

    let inner = pack.inner_root();
    assert!(inner.ends_with(".textbundle"));
    assert_ne!(inner, ".textbundle");
    assert_ne!(inner, "notes.textbundle");
}

#[test]
fn ArchiveBundle___open___hidden_file_name___uses_random_name() {
    let temp_dir = TempDir::new().unwrap();

    let pack = ArchiveBundle::open(temp_dir.path().join(".textpack")).unwrap();

    assert_ne!(pack.inner_root(), ".textbundle");
    assert!(pack.inner_root().ends_with(".textbundle"));
}

#[test]
fn ArchiveBundle___open___root_info_json___uses_archive_root() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("flat.textpack");
    write_zip(
        &path,
        &[
            ("info.json", br#"{"version":2}"#),
            ("text.markdown", b"flat"),
            ("other.textbundle/", b""),
        ],
    );

    let pack = ArchiveBundle::open(&path).unwrap();

    assert_eq!(pack.inner_root(), "");
    assert_eq!(pack.read_content().unwrap().text(), "flat");
    assert!(!pack.has_pending_changes());
}

#[test]
fn ArchiveBundle___open___differently_cased_info_json___is_not_the_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("upper.textpack");
    write_zip(
        &path,
        &[("INFO.JSON", br#"{"version":2,"creatorIdentifier":"x"}"#)],
    );

    let mut pack = ArchiveBundle::open(&path).unwrap();

    assert_eq!(pack.inner_root(), "upper.textbundle");
    assert_eq!(pack.read_metadata().unwrap(), Metadata::default());

    pack.write_content(&BundleContent::from_text(ContentType::Markdown, "x"))
        .unwrap();
    pack.close().unwrap();

    let names = archive_names(&path);
    assert!(names.contains(&"INFO.JSON".to_string()));
    assert!(!names.contains(&"info.json".to_string()));
    assert!(names.contains(&"upper.textbundle/info.json".to_string()));
}

#[test]
fn ArchiveBundle___open___single_bundle_directory___is_inner_root() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("any-name.textpack");
    write_zip(
        &path,
        &[
            ("Doc.TextBundle/info.json", br#"{"version":2}"#),
            ("Doc.TextBundle/text.markdown", b"nested"),
            ("__MACOSX/", b""),
        ],
    );

    let pack = ArchiveBundle::open(&path).unwrap();

    assert_eq!(pack.inner_root(), "Doc.TextBundle");
    assert_eq!(pack.read_content().unwrap().text(), "nested");
}

#[test]
fn ArchiveBundle___open___ambiguous_bundle_directories___falls_back_to_archive_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("two.textpack");
    write_zip(
        &path,
        &[
            ("a.textbundle/text.markdown", b"a"),
            ("b.textbundle/text.markdown", b"b"),
        ],
    );

    let mut pack = ArchiveBundle::open(&path).unwrap();

    assert_eq!(pack.inner_root(), "two.textbundle");
    assert!(!pack.has_pending_changes());
    assert!(matches!(
        pack.read_content(),
        Err(BundleError::MissingFile(_))
    ));

    pack.write_content(&BundleContent::from_text(ContentType::Markdown, "c"))
        .unwrap();
    pack.close().unwrap();

    let names = archive_names(&path);
    assert!(names.contains(&"a.textbundle/text.markdown".to_string()));
    assert!(names.contains(&"two.textbundle/text.markdown".to_string()));
}

#[test]
fn ArchiveBundle___open___directory_path___returns_error() {
    let temp_dir = TempDir::new().unwrap();

    let result = ArchiveBundle::open(temp_dir.path());

    assert!(matches!(result, Err(BundleError::InvalidArchive(_))));
}

#[test]
fn ArchiveBundle___open___not_a_zip___returns_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("junk.textpack");
    std::fs::write(&path, b"definitely not a zip archive").unwrap();

    let result = ArchiveBundle::open(&path);

    assert!(matches!(result, Err(BundleError::Zip(_))));
}

// Reading and writing

#[test]
fn ArchiveBundle___close___persists_content_metadata_and_assets() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.textpack");
    let metadata = Metadata {
        creator_identifier: Some("com.example.editor".to_string()),
        ..Metadata::default()
    };

    let mut pack = ArchiveBundle::open(&path).unwrap();
    pack.write_metadata(&metadata)
        .unwrap()
        .write_content(&BundleContent::from_text(ContentType::Markdown, "# Hi"))
        .unwrap()
        .write_asset(&Asset::new("img/a.png", vec![1, 2, 3]))
        .unwrap();
    pack.close().unwrap();

    let reopened = ArchiveBundle::open(&path).unwrap();
    assert_eq!(reopened.inner_root(), "notes.textbundle");
    assert_eq!(reopened.read_metadata().unwrap(), metadata);
    assert_eq!(reopened.read_content().unwrap().text(), "# Hi");
    let assets = reopened.read_assets().unwrap();
    assert_eq!(assets.len(), 1);
    let asset = assets.iter().next().unwrap();
    assert_eq!(asset.path(), "assets/img/a.png");
    assert_eq!(asset.read_content().unwrap(), &[1, 2, 3]);
}

#[test]
fn ArchiveBundle___write_asset___is_readable_before_close() {
    let temp_dir = TempDir::new().unwrap();
    let mut pack = ArchiveBundle::open(temp_dir.path().join("p.textpack")).unwrap();

    pack.write_asset(&Asset::new("a.bin", vec![7])).unwrap();

    let assets = pack.read_assets().unwrap();
    assert_eq!(assets.len(), 1);
    assert!(pack.read_metadata().is_ok());
    assert!(!temp_dir.path().join("p.textpack").exists());
}

#[test]
fn ArchiveBundle___write_asset___traversal___is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut pack = ArchiveBundle::open(temp_dir.path().join("p.textpack")).unwrap();

    let result = pack.write_asset(&Asset::new("../../../escape.bin", vec![1]));

    assert!(matches!(result, Err(BundleError::PathTraversal { .. })));
    assert!(pack.read_assets().unwrap().is_empty());
}

#[test]
fn ArchiveBundle___remove_asset___traversal___is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    write_zip(
        &path,
        &[
            ("p.textbundle/info.json", br#"{"version":2}"#),
            ("p.textbundle/text.markdown", b"body"),
        ],
    );
    let mut pack = ArchiveBundle::open(&path).unwrap();

    let result = pack.remove_asset(&Asset::new("../../p.textbundle/text.markdown", Vec::new()));

    assert!(matches!(result, Err(BundleError::PathTraversal { .. })));
    assert!(!pack.has_pending_changes());
    assert_eq!(pack.read_content().unwrap().text(), "body");
}

#[test]
fn ArchiveBundle___remove_asset___missing_asset___is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    write_zip(
        &path,
        &[
            ("info.json", br#"{"version":2}"#),
            ("assets/kept.bin", b"kept"),
        ],
    );
    let mut pack = ArchiveBundle::open(&path).unwrap();

    pack.remove_asset(&Asset::new("never-written.bin", Vec::new()))
        .unwrap();

    assert!(!pack.has_pending_changes());
    assert_eq!(pack.read_assets().unwrap().len(), 1);
}

#[test]
fn ArchiveBundle___remove_asset___drops_entry_on_close() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    let mut pack = ArchiveBundle::open(&path).unwrap();
    pack.write_asset(&Asset::new("a.bin", vec![1]))
        .unwrap()
        .write_asset(&Asset::new("b.bin", vec![2]))
        .unwrap();
    pack.close().unwrap();

    let mut pack = ArchiveBundle::open(&path).unwrap();
    pack.remove_asset(&Asset::new("a.bin", Vec::new())).unwrap();
    pack.close().unwrap();

    let names = archive_names(&path);
    assert!(!names.contains(&"p.textbundle/assets/a.bin".to_string()));
    assert!(names.contains(&"p.textbundle/assets/b.bin".to_string()));
}

#[test]
fn ArchiveBundle___archived_asset___survives_rewrite() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    write_zip(
        &path,
        &[
            ("info.json", br#"{"version":2}"#),
            ("assets/old.bin", b"old bytes"),
        ],
    );

    let mut pack = ArchiveBundle::open(&path).unwrap();
    pack.write_asset(&Asset::new("new.bin", b"new bytes".to_vec()))
        .unwrap();
    pack.close().unwrap();

    let reopened = ArchiveBundle::open(&path).unwrap();
    let mut assets: Vec<(String, Vec<u8>)> = reopened
        .read_assets()
        .unwrap()
        .iter()
        .map(|a| (a.path().to_string(), a.read_content().unwrap().to_vec()))
        .collect();
    assets.sort();
    assert_eq!(
        assets,
        vec![
            ("assets/new.bin".to_string(), b"new bytes".to_vec()),
            ("assets/old.bin".to_string(), b"old bytes".to_vec()),
        ]
    );
}

#[test]
fn ArchiveBundle___close___unchanged_archive___is_not_rewritten() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    write_zip(&path, &[("info.json", br#"{"version":2}"#)]);
    let before = std::fs::read(&path).unwrap();

    let pack = ArchiveBundle::open(&path).unwrap();
    pack.read_metadata().unwrap();
    pack.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn ArchiveBundle___drop___flushes_pending_changes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");

    {
        let mut pack = ArchiveBundle::open(&path).unwrap();
        pack.write_content(&BundleContent::from_text(ContentType::Markdown, "dropped"))
            .unwrap();
    }

    let reopened = ArchiveBundle::open(&path).unwrap();
    assert_eq!(reopened.read_content().unwrap().text(), "dropped");
}

// Unpacking

#[test]
fn ArchiveBundle___unpack_to___recreates_directory_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    let mut pack = ArchiveBundle::open(&path).unwrap();
    pack.write_content(&BundleContent::from_text(ContentType::Markdown, "body"))
        .unwrap()
        .write_asset(&Asset::new("deep/x.bin", vec![4, 2]))
        .unwrap();
    let target = temp_dir.path().join("out.textbundle");

    pack.unpack_to(&target).unwrap();

    assert!(DirectoryBundle::is_bundle_dir(&target));
    assert_eq!(std::fs::read(target.join("text.markdown")).unwrap(), b"body");
    assert_eq!(
        std::fs::read(target.join("assets/deep/x.bin")).unwrap(),
        vec![4, 2]
    );
    let unpacked = DirectoryBundle::open(&target).unwrap();
    assert_eq!(unpacked.read_content().unwrap().text(), "body");
}

#[test]
fn ArchiveBundle___unpack_to___skips_entries_outside_inner_root() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    write_zip(
        &path,
        &[
            ("p.textbundle/info.json", br#"{"version":2}"#),
            ("readme.txt", b"outside"),
        ],
    );
    let pack = ArchiveBundle::open(&path).unwrap();
    let target = temp_dir.path().join("out");

    pack.unpack_to(&target).unwrap();

    assert!(target.join("info.json").is_file());
    assert!(!target.join("readme.txt").exists());
}

// Options

#[test]
fn ArchiveBundle___open_with___stored_option___writes_uncompressed_entries() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("p.textpack");
    let options = ArchiveOptions {
        compression: crate::Compression::Stored,
        compression_level: None,
    };

    let mut pack = ArchiveBundle::open_with(&path, options.clone()).unwrap();
    assert_eq!(pack.options(), &options);
    pack.write_content(&BundleContent::from_text(ContentType::Markdown, "x"))
        .unwrap();
    pack.close().unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    let entry = archive.by_name("p.textbundle/text.markdown").unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
}

#[test]
fn derived_inner_name___uses_last_extension() {
    assert_eq!(
        derived_inner_name(Path::new("/tmp/my.notes.textpack")),
        "my.notes.textbundle"
    );
}
