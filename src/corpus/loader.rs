// file: src/corpus/loader.rs
// description: Flat directory loading of text documents
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::models::Document;
use crate::utils::Validator;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Reads every regular file directly inside a directory.
///
/// Subdirectories are not descended into. Entries are visited in file name
/// order, so the position of a document (and therefore its index id) does
/// not depend on the platform's directory listing order.
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn load(root: &Path) -> Result<Vec<Document>> {
        info!("Loading documents from: {}", root.display());
        Validator::validate_directory(root)?;

        let mut documents = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                PipelineError::FileOperation {
                    path,
                    source: e.into(),
                }
            })?;

            if !entry.file_type().is_file() {
                debug!("Skipping non-file entry: {}", entry.path().display());
                continue;
            }

            let path = entry.path();
            let text = fs::read_to_string(path).map_err(|source| PipelineError::FileOperation {
                path: path.to_path_buf(),
                source,
            })?;

            let identifier = entry.file_name().to_string_lossy().to_string();
            debug!("Loaded {} ({} bytes)", identifier, text.len());
            documents.push(Document::new(identifier, text));
        }

        info!("Loaded {} documents", documents.len());
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "second").unwrap();
        fs::write(temp.path().join("a.md"), "# first\n").unwrap();
        fs::write(temp.path().join("notes"), "no extension").unwrap();

        let docs = DocumentLoader::load(temp.path()).unwrap();

        let names: Vec<&str> = docs.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.txt", "notes"]);
        assert_eq!(docs[0].text, "# first\n");
        assert_eq!(docs[2].text, "no extension");
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("top.txt"), "top").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/deep.txt"), "deep").unwrap();

        let docs = DocumentLoader::load(temp.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].identifier, "top.txt");
    }

    #[test]
    fn test_empty_directory_yields_no_documents() {
        let temp = TempDir::new().unwrap();
        assert!(DocumentLoader::load(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(matches!(
            DocumentLoader::load(&missing),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_file_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("binary.bin"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        match DocumentLoader::load(temp.path()) {
            Err(PipelineError::FileOperation { path, .. }) => {
                assert!(path.ends_with("binary.bin"));
            }
            other => panic!("expected file error, got {:?}", other),
        }
    }
}
