//! Input scanning for XML documents

use pedido_types::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported document extensions
const XML_EXTENSIONS: &[&str] = &["xml"];

/// Check if a path looks like an XML document
pub fn is_xml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| XML_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scan a directory recursively for XML documents
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    let mut documents: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_xml_file(path))
        .collect();

    // Sort by filename for consistent ordering
    documents.sort_by(|a, b| {
        a.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .cmp(b.file_name().and_then(|n| n.to_str()).unwrap_or(""))
    });

    Ok(documents)
}

/// Expand CLI inputs into the ordered list of files to process
///
/// Files are taken as given, whatever their extension. Directories expand to
/// their XML documents. A path that does not exist fails the whole batch.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(scan_directory(input)?);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(Error::FileNotFound(input.display().to_string()));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_xml_file() {
        assert!(is_xml_file(Path::new("pedido.xml")));
        assert!(is_xml_file(Path::new("PEDIDO.XML")));
        assert!(!is_xml_file(Path::new("pedido.csv")));
        assert!(!is_xml_file(Path::new("pedido")));
    }

    #[test]
    fn test_scan_directory_sorted_and_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("lote");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.xml"), "<R/>").unwrap();
        std::fs::write(nested.join("a.xml"), "<R/>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn test_collect_inputs() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("export.txt");
        std::fs::write(&explicit, "<R/>").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("p.xml"), "<R/>").unwrap();

        let files = collect_inputs(&[explicit.clone(), sub.clone()]).unwrap();
        assert_eq!(files, vec![explicit, sub.join("p.xml")]);

        let missing = collect_inputs(&[dir.path().join("nope.xml")]);
        assert!(matches!(missing, Err(Error::FileNotFound(_))));
    }
}
