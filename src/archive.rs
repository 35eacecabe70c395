use crate::context::Context;
use crate::result::Result;
use crate::utils;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Write `sources` into a new zip at `output_path`.
///
/// Directory sources keep their path relative to `root`; single files are
/// stored under their base name at the archive root. Returns the number of
/// entries written. On failure the partially written archive is removed.
pub fn create_zip(
    ctx: &Context,
    root: &Path,
    sources: &[PathBuf],
    output_path: &Path,
) -> Result<usize> {
    let file = File::create(output_path)?;
    let mut zip = ZipWriter::new(file);

    let entries = match write_entries(ctx, &mut zip, root, sources) {
        Ok(entries) => entries,
        Err(e) => {
            drop(zip);
            utils::remove_file_if_exists(output_path)?;
            return Err(e);
        }
    };

    if let Err(e) = zip.finish() {
        utils::remove_file_if_exists(output_path)?;
        return Err(e.into());
    }
    Ok(entries)
}

fn write_entries(
    ctx: &Context,
    zip: &mut ZipWriter<File>,
    root: &Path,
    sources: &[PathBuf],
) -> Result<usize> {
    // Fixed timestamps keep repeated builds byte-identical.
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut entries = 0;
    for source in sources {
        if source.is_dir() {
            let walkdir = WalkDir::new(source).min_depth(1).sort_by_file_name();
            for entry in walkdir {
                let entry = entry?;
                let path = entry.path();
                let name = match path.strip_prefix(root) {
                    Ok(relative) => utils::archive_entry_name(relative),
                    Err(_) => continue,
                };

                // `is_dir` follows symlinks; linked directories become directory entries.
                if path.is_dir() {
                    zip.add_directory(name, options)?;
                } else {
                    add_file(ctx, zip, path, name, options)?;
                }
                entries += 1;
            }
        } else if let Some(base_name) = source.file_name() {
            let name = base_name.to_string_lossy().to_string();
            add_file(ctx, zip, source, name, options)?;
            entries += 1;
        }
    }

    Ok(entries)
}

fn add_file(
    ctx: &Context,
    zip: &mut ZipWriter<File>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<()> {
    if ctx.verbose {
        cliclack::log::remark(format!("Adding {}", name))?;
    }

    zip.start_file(name, options)?;
    let mut f = File::open(path)?;
    io::copy(&mut f, zip)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_directory_and_file_layout() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("src/main");
        write(&root, "data/foo/bar.json", "{\"bar\":1}");
        write(&root, "data/foo/nested/baz.json", "{}");
        write(&root, "extra/pack.png", "png");

        let ctx = Context::new(dir.path().to_path_buf(), None, false);
        let output = dir.path().join("out.zip");
        let sources: Vec<PathBuf> = vec![root.join("data"), root.join("extra/pack.png")];

        let count = create_zip(&ctx, &root, &sources, &output).unwrap();

        let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "data/foo/",
                "data/foo/bar.json",
                "data/foo/nested/",
                "data/foo/nested/baz.json",
                "pack.png",
            ]
        );
        assert_eq!(count, names.len());

        let mut content = String::new();
        archive
            .by_name("data/foo/bar.json")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{\"bar\":1}");
    }

    #[test]
    fn test_empty_sources_produce_empty_archive() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None, false);
        let output = dir.path().join("empty.zip");

        let count = create_zip(&ctx, dir.path(), &[], &output).unwrap();

        assert_eq!(count, 0);
        let archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_stored_as_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("src/main");
        write(&root, "shared/loot.json", "{}");
        write(&root, "data/mortar/recipe.json", "{}");
        std::os::unix::fs::symlink("../shared", root.join("data/linked")).unwrap();

        let ctx = Context::new(dir.path().to_path_buf(), None, false);
        let output = dir.path().join("linked.zip");

        create_zip(&ctx, &root, &[root.join("data")], &output).unwrap();

        let archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["data/linked/", "data/mortar/", "data/mortar/recipe.json"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_leaves_no_archive() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("src/main");
        write(&root, "data/mortar/recipe.json", "{}");
        std::os::unix::fs::symlink("missing.json", root.join("data/dangling.json")).unwrap();

        let ctx = Context::new(dir.path().to_path_buf(), None, false);
        let output = dir.path().join("broken.zip");

        assert!(create_zip(&ctx, &root, &[root.join("data")], &output).is_err());
        assert!(!output.exists());
    }
}
