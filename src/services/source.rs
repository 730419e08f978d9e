//! Document sources and input discovery

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{ImportError, ImportResult};

/// Raw bytes of one fiscal document together with a name for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let bytes = fs::read(path).map_err(|source| ImportError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), bytes))
    }
}

/// Lists the `*.xml` files directly inside `dir`, sorted by file name.
///
/// The extension match is case-insensitive. Subdirectories are not visited.
pub fn discover_sources(dir: &Path) -> ImportResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ImportError::configuration(format!(
            "input directory '{}' was not found",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        ImportError::configuration(format!("cannot list '{}': {}", dir.display(), e))
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();

    log::info!("Found {} XML file(s) in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "<b/>").unwrap();
        fs::write(dir.path().join("a.XML"), "<a/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let files = discover_sources(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.XML", "b.xml"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_sources(&dir.path().join("XMLFiles")).unwrap_err();
        assert!(matches!(err, ImportError::Configuration(_)));
    }

    #[test]
    fn test_from_path_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentSource::from_path(&dir.path().join("missing.xml")).unwrap_err();
        assert!(matches!(err, ImportError::Unreadable { .. }));
    }
}
