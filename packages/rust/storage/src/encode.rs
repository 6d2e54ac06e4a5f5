//! Byte-level encodings for the storage boundary: JSONL, gzip, object keys,
//! and the reversible URL-to-path escaping.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;

use docsweep_shared::{DocsweepError, Result};

// ---------------------------------------------------------------------------
// JSONL + gzip
// ---------------------------------------------------------------------------

/// Encode records as newline-delimited JSON, one record per line, no
/// trailing newline.
pub fn to_jsonl<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    let mut lines = Vec::with_capacity(records.len());
    for record in records {
        lines.push(
            serde_json::to_string(record).map_err(|e| DocsweepError::Storage(e.to_string()))?,
        );
    }
    Ok(lines.join("\n").into_bytes())
}

/// Gzip-compress a byte buffer.
pub fn gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .and_then(|()| encoder.finish())
        .map_err(|e| DocsweepError::Storage(format!("gzip failed: {e}")))
}

/// Decompress `path` next to itself, dropping the `.gz` suffix, and remove
/// the compressed original.
pub fn gunzip_file(path: &Path) -> Result<PathBuf> {
    let target = path.with_extension("");

    let mut decoder = GzDecoder::new(File::open(path).map_err(|e| DocsweepError::io(path, e))?);
    let mut contents = Vec::new();
    decoder
        .read_to_end(&mut contents)
        .map_err(|e| DocsweepError::io(path, e))?;

    std::fs::write(&target, &contents).map_err(|e| DocsweepError::io(&target, e))?;
    std::fs::remove_file(path).map_err(|e| DocsweepError::io(path, e))?;
    Ok(target)
}

/// Decompress every `*.gz` directly under `dir`. Not recursive; the run
/// layout keeps raw data at the top level and republished objects in
/// subdirectories.
pub fn gunzip_dir(dir: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(dir).map_err(|e| DocsweepError::io(dir, e))?;

    let mut count = 0;
    for entry in entries {
        let path = entry.map_err(|e| DocsweepError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "gz") {
            gunzip_file(&path)?;
            count += 1;
        }
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// Object keys
// ---------------------------------------------------------------------------

/// Key of the merged, gzip-compressed JSONL object for one run.
pub fn merged_key(prefix: &str, timestamp: &str) -> String {
    format!("{prefix}/{timestamp}/merged/filtered_rawdata_{timestamp}.jsonl.gz")
}

/// Key of one document's republished raw HTML.
pub fn document_key(prefix: &str, timestamp: &str, url: &str) -> String {
    format!(
        "{prefix}/{timestamp}/amazon-translate/en/{}",
        url_to_path(url)
    )
}

/// Escape a URL into a key-safe path segment. Reversed by [`path_to_url`].
pub fn url_to_path(url: &str) -> String {
    url.replace("://", "___").replace('.', "__").replace('/', "_")
}

/// Inverse of [`url_to_path`]: the replacements run in reverse order.
pub fn path_to_url(path: &str) -> String {
    path.replace("___", "://").replace("__", ".").replace('_', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        url: String,
        status: u16,
    }

    #[test]
    fn jsonl_is_one_record_per_line_without_trailing_newline() {
        let rows = vec![
            Row {
                url: "https://docs.aws.amazon.com/a".into(),
                status: 200,
            },
            Row {
                url: "https://docs.aws.amazon.com/b".into(),
                status: 200,
            },
        ];

        let bytes = to_jsonl(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!text.ends_with('\n'));
        assert!(text.starts_with("{\"url\""));
    }

    #[test]
    fn gzip_round_trips_through_gunzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rawdata_0001.jsonl.gz");
        std::fs::write(&path, gzip_bytes(b"{\"url\":\"x\"}").unwrap()).unwrap();

        let target = gunzip_file(&path).unwrap();
        assert_eq!(target, dir.path().join("rawdata_0001.jsonl"));
        assert_eq!(std::fs::read(&target).unwrap(), b"{\"url\":\"x\"}");
        assert!(!path.exists());
    }

    #[test]
    fn gunzip_dir_only_touches_top_level_archives() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rawdata_0001.jsonl.gz"),
            gzip_bytes(b"top").unwrap(),
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("merged")).unwrap();
        std::fs::write(
            dir.path().join("merged/filtered.jsonl.gz"),
            gzip_bytes(b"nested").unwrap(),
        )
        .unwrap();

        assert_eq!(gunzip_dir(dir.path()).unwrap(), 1);
        assert!(dir.path().join("rawdata_0001.jsonl").exists());
        assert!(dir.path().join("merged/filtered.jsonl.gz").exists());
    }

    #[test]
    fn key_layouts() {
        assert_eq!(
            merged_key("crawler/aws-docs", "20200627020018"),
            "crawler/aws-docs/20200627020018/merged/filtered_rawdata_20200627020018.jsonl.gz"
        );
        assert_eq!(
            document_key("crawler/aws-docs", "20200627020018", "https://docs.aws.amazon.com/s3/index.html"),
            "crawler/aws-docs/20200627020018/amazon-translate/en/https___docs__aws__amazon__com_s3_index__html"
        );
    }

    #[test]
    fn url_path_escaping_round_trips() {
        let urls = [
            "https://docs.aws.amazon.com/AmazonS3/latest/userguide/Welcome.html",
            "https://docs.aws.amazon.com/lambda/latest/dg/welcome.html",
            // Literal underscores decode to slashes, so the decoded URL
            // differs while the re-encoded path does not.
            "https://docs.aws.amazon.com/ja_jp/s3/index.html",
            "http://docs.aws.amazon.com/index.html",
        ];

        for url in urls {
            let path = url_to_path(url);
            assert_eq!(url_to_path(&path_to_url(&path)), path, "{url}");
            assert!(!path.contains('/'));
            assert!(!path.contains("://"));
        }
    }
}
