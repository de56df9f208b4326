use std::io;
use std::path::{Path, PathBuf};

pub fn ensure_dirs(upload_dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(upload_dir.join("documents"))?;
    std::fs::create_dir_all(upload_dir.join("contracts"))?;
    std::fs::create_dir_all(upload_dir.join("pdfs"))?;
    Ok(())
}

/// Strip any path components and characters the file store should not see.
pub fn sanitize_filename(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(['.', '_']).is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Documents live under `documents/{tracking_code}/{requirement_code}/`.
pub fn document_path(
    upload_dir: &Path,
    tracking_code: &str,
    requirement_code: &str,
    filename: &str,
) -> PathBuf {
    upload_dir
        .join("documents")
        .join(tracking_code)
        .join(requirement_code)
        .join(sanitize_filename(filename))
}

pub fn contract_path(upload_dir: &Path, contract_number: &str, filename: &str) -> PathBuf {
    upload_dir
        .join("contracts")
        .join(sanitize_filename(contract_number))
        .join(sanitize_filename(filename))
}

pub fn application_pdf_path(upload_dir: &Path, tracking_code: &str) -> PathBuf {
    upload_dir.join("pdfs").join(format!("{tracking_code}.pdf"))
}

pub fn save_file(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\cert.pdf"), "cert.pdf");
        assert_eq!(sanitize_filename("tax clearance (2025).pdf"), "tax_clearance__2025_.pdf");
        assert_eq!(sanitize_filename("...."), "file");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn document_path_is_keyed_by_code_and_requirement() {
        let dir = PathBuf::from("/srv/uploads");
        let path = document_path(&dir, "GCX-2025-123456", "VAT_CERTIFICATE", "scan.pdf");
        assert_eq!(
            path,
            PathBuf::from("/srv/uploads/documents/GCX-2025-123456/VAT_CERTIFICATE/scan.pdf")
        );
    }

    #[test]
    fn save_file_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = document_path(dir.path(), "GCX-2025-000001", "VAT_CERTIFICATE", "scan.pdf");
        save_file(&path, b"%PDF-1.4").expect("write succeeds");
        assert_eq!(std::fs::read(&path).expect("read back"), b"%PDF-1.4");
    }
}
