//! Single-member archive extraction.
//!
//! Release archives bundle a binary alongside licenses and readmes; installs
//! want exactly one file. Members are matched by exact path or by file name,
//! so `lazygit` finds both `lazygit` and `lazygit_0.44.1/lazygit`.

use std::io::{Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Extract one named member from a gzip-compressed tarball.
pub fn extract_tar_gz_member(archive: &[u8], member: &str) -> Result<Vec<u8>> {
    let decoder = GzDecoder::new(Cursor::new(archive));
    let mut tar = tar::Archive::new(decoder);

    for entry in tar.entries().map_err(|e| Error::Archive(e.to_string()))? {
        let mut entry = entry.map_err(|e| Error::Archive(e.to_string()))?;
        let path = entry.path().map_err(|e| Error::Archive(e.to_string()))?;

        if matches_member(&path, member) {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            return Ok(bytes);
        }
    }

    Err(Error::MemberNotFound {
        name: member.to_string(),
    })
}

/// Extract one named member from a zip archive.
pub fn extract_zip_member(archive: &[u8], member: &str) -> Result<Vec<u8>> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))
        .map_err(|e| Error::Archive(e.to_string()))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| Error::Archive(e.to_string()))?;
        let name = entry.name().to_string();

        if matches_member(Path::new(&name), member) {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            return Ok(bytes);
        }
    }

    Err(Error::MemberNotFound {
        name: member.to_string(),
    })
}

fn matches_member(path: &Path, member: &str) -> bool {
    path == Path::new(member)
        || path.file_name().is_some_and(|f| f == member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn tar_gz_with(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        let tar_bytes = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn zip_with(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn tar_gz_extracts_exact_member() {
        let archive = tar_gz_with(&[("LICENSE", b"mit"), ("lazygit", b"\x7fELF")]);
        let bytes = extract_tar_gz_member(&archive, "lazygit").unwrap();
        assert_eq!(bytes, b"\x7fELF");
    }

    #[test]
    fn tar_gz_matches_nested_member_by_file_name() {
        let archive = tar_gz_with(&[("release/lazygit", b"\x7fELF")]);
        let bytes = extract_tar_gz_member(&archive, "lazygit").unwrap();
        assert_eq!(bytes, b"\x7fELF");
    }

    #[test]
    fn tar_gz_member_not_found() {
        let archive = tar_gz_with(&[("README.md", b"docs")]);
        let err = extract_tar_gz_member(&archive, "lazygit").unwrap_err();
        assert!(matches!(err, Error::MemberNotFound { .. }));
    }

    #[test]
    fn tar_gz_rejects_garbage() {
        assert!(extract_tar_gz_member(b"not an archive", "x").is_err());
    }

    #[test]
    fn zip_extracts_member() {
        let archive = zip_with(&[("win32yank.exe", b"MZ\x90"), ("README.md", b"docs")]);
        let bytes = extract_zip_member(&archive, "win32yank.exe").unwrap();
        assert_eq!(bytes, b"MZ\x90");
    }

    #[test]
    fn zip_member_not_found() {
        let archive = zip_with(&[("README.md", b"docs")]);
        let err = extract_zip_member(&archive, "win32yank.exe").unwrap_err();
        assert!(matches!(err, Error::MemberNotFound { .. }));
    }
}
