//! Archive Module
//!
//! Template container handling: variant selection by row count, a per-run
//! extraction cache, and repacking the populated section back into an HWPX
//! zip. Every part other than `Contents/section0.xml` is carried through
//! untouched.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::HwpxGenError;

/// The one XML part the resolver rewrites.
pub(crate) const SECTION_PART: &str = "Contents/section0.xml";

/// Largest row count any template variant supports.
pub(crate) const ROW_COUNT_CEILING: usize = 5;

/// Template file name for a row count: `template-tax-3.hwpx`.
pub(crate) fn template_file_name(row_count: usize) -> String {
    format!("template-tax-{row_count}.hwpx")
}

/// Per-run template store.
///
/// Each variant is extracted at most once, lazily, under a run-scoped
/// temporary root; renders copy the cached tree into a working directory of
/// their own, so parallel files never write into a shared tree. The
/// temporary root (and with it any leftover working copy) is removed when
/// the store drops.
pub(crate) struct TemplateStore {
    templates_dir: PathBuf,
    extract_root: TempDir,
    extracted: Mutex<HashMap<usize, PathBuf>>,
}

impl TemplateStore {
    pub fn new(templates_dir: &Path) -> Result<Self, HwpxGenError> {
        Ok(TemplateStore {
            templates_dir: templates_dir.to_path_buf(),
            extract_root: TempDir::new()?,
            extracted: Mutex::new(HashMap::new()),
        })
    }

    /// Section text of the variant for `row_count`, extracting the container
    /// on first use.
    pub fn section_text(&self, row_count: usize) -> Result<String, HwpxGenError> {
        let dir = self.extracted_dir(row_count)?;
        Ok(fs::read_to_string(dir.join(SECTION_PART))?)
    }

    /// Write a populated document: copy the extracted variant into a fresh
    /// working directory, overwrite the section part, replace any stale
    /// output artifact, zip, and drop the working directory.
    pub fn render(
        &self,
        row_count: usize,
        section_xml: &str,
        output_path: &Path,
    ) -> Result<(), HwpxGenError> {
        let source_dir = self.extracted_dir(row_count)?;

        let work_name = format!(
            "work-{}",
            output_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
        );
        let work_dir = self.extract_root.path().join(work_name);
        if work_dir.exists() {
            fs::remove_dir_all(&work_dir)?;
        }
        copy_tree(&source_dir, &work_dir)?;
        fs::write(work_dir.join(SECTION_PART), section_xml)?;

        if output_path.exists() {
            fs::remove_file(output_path).map_err(|e| HwpxGenError::OutputConflict {
                path: output_path.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        zip_tree(&work_dir, output_path)?;
        fs::remove_dir_all(&work_dir)?;
        Ok(())
    }

    fn extracted_dir(&self, row_count: usize) -> Result<PathBuf, HwpxGenError> {
        let mut extracted = self.extracted.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(dir) = extracted.get(&row_count) {
            return Ok(dir.clone());
        }

        let template_path = self.templates_dir.join(template_file_name(row_count));
        if !template_path.is_file() {
            return Err(HwpxGenError::Template(format!(
                "template '{}' not found",
                template_path.display()
            )));
        }

        let file = File::open(&template_path)?;
        let mut archive = ZipArchive::new(file)?;
        let dest = self
            .extract_root
            .path()
            .join(format!("template-tax-{row_count}"));
        archive.extract(&dest)?;

        extracted.insert(row_count, dest.clone());
        Ok(dest)
    }
}

fn copy_tree(source: &Path, dest: &Path) -> Result<(), HwpxGenError> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Zip a directory tree. Entries are written in sorted order so repeated
/// runs produce identical archives for identical content.
fn zip_tree(dir: &Path, output_path: &Path) -> Result<(), HwpxGenError> {
    let file = File::create(output_path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries = Vec::new();
    collect_entries(dir, dir, &mut entries)?;
    entries.sort();

    for (name, path) in entries {
        if path.is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let bytes = fs::read(&path)?;
            writer.write_all(&bytes)?;
        }
    }
    writer.finish()?;
    Ok(())
}

fn collect_entries(
    root: &Path,
    dir: &Path,
    entries: &mut Vec<(String, PathBuf)>,
) -> Result<(), HwpxGenError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|_| HwpxGenError::Config("entry outside archive root".to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if path.is_dir() {
            entries.push((name, path.clone()));
            collect_entries(root, &path, entries)?;
        } else {
            entries.push((name, path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn write_template(dir: &Path, row_count: usize, section: &str) {
        let path = dir.join(template_file_name(row_count));
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        writer.start_file("mimetype", options).unwrap();
        writer
            .write_all(b"application/hwp+zip")
            .unwrap();
        writer.start_file("version.xml", options).unwrap();
        writer.write_all(b"<version/>").unwrap();
        writer.start_file(SECTION_PART, options).unwrap();
        writer.write_all(section.as_bytes()).unwrap();
        writer.finish().unwrap();
    }

    fn read_part(path: &Path, name: &str) -> String {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_template_file_name() {
        assert_eq!(template_file_name(3), "template-tax-3.hwpx");
    }

    #[test]
    fn test_render_replaces_only_section() {
        let templates = tempfile::tempdir().unwrap();
        write_template(templates.path(), 1, "<sec>%F2%</sec>");
        let store = TemplateStore::new(templates.path()).unwrap();

        assert_eq!(store.section_text(1).unwrap(), "<sec>%F2%</sec>");

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("notice.hwpx");
        store.render(1, "<sec>자동차세</sec>", &output).unwrap();

        assert_eq!(read_part(&output, SECTION_PART), "<sec>자동차세</sec>");
        assert_eq!(read_part(&output, "mimetype"), "application/hwp+zip");
        assert_eq!(read_part(&output, "version.xml"), "<version/>");
    }

    #[test]
    fn test_render_overwrites_stale_output() {
        let templates = tempfile::tempdir().unwrap();
        write_template(templates.path(), 0, "<sec>%A2%</sec>");
        let store = TemplateStore::new(templates.path()).unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("notice.hwpx");
        fs::write(&output, b"stale bytes").unwrap();

        store.render(0, "<sec>done</sec>", &output).unwrap();
        assert_eq!(read_part(&output, SECTION_PART), "<sec>done</sec>");
    }

    #[test]
    fn test_missing_template_is_template_error() {
        let templates = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(templates.path()).unwrap();
        let err = store.section_text(4).unwrap_err();
        match err {
            HwpxGenError::Template(msg) => assert!(msg.contains("template-tax-4.hwpx")),
            other => panic!("expected Template error, got {other:?}"),
        }
    }
}
