//! Ingestion path: re-reads a previous run's raw dumps from object storage
//! and republishes them for the downstream translation stage.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use docsweep_normalize::parse_page;
use docsweep_shared::{DocsweepError, FetchRecord, IngestDoc, IngestSettings, Result, filter};
use docsweep_storage::{ObjectStore, document_key, gunzip_dir, gzip_bytes, merged_key, to_jsonl};

/// Summary of one ingest run.
#[derive(Debug)]
pub struct IngestReport {
    /// Raw dump files read after decompression.
    pub files_read: usize,
    /// Fetch records seen across all dump files, malformed lines included.
    pub records_read: usize,
    /// Records that survived filtering and parsing.
    pub documents_kept: usize,
    /// Per-document HTML objects successfully uploaded.
    pub documents_uploaded: usize,
    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

/// Republish a previous run's raw dumps: download, decompress, filter, then
/// upload one merged dump plus one HTML object per surviving document.
///
/// A failed download aborts the run, as does the merged upload; per-document
/// upload failures only lose that document.
#[instrument(skip_all, fields(timestamp = %settings.timestamp))]
pub async fn run_ingest<S: ObjectStore>(
    settings: &IngestSettings,
    store: &S,
) -> Result<IngestReport> {
    let start = Instant::now();

    info!(
        bucket = %settings.bucket,
        prefix = %settings.prefix,
        work_dir = %settings.work_dir.display(),
        "starting ingest run"
    );

    // --- Phase 1: Download + decompress ---
    let input_prefix = settings.input_prefix();
    if !store
        .download_prefix(&settings.bucket, &input_prefix, &settings.work_dir)
        .await
    {
        return Err(DocsweepError::Storage(format!(
            "download of s3://{}/{} failed",
            settings.bucket, input_prefix
        )));
    }

    let input_dir = settings.work_dir.join(&input_prefix);
    let archives = gunzip_dir(&input_dir)?;
    info!(archives, dir = %input_dir.display(), "raw dumps decompressed");

    // --- Phase 2: Read + filter ---
    let (files_read, records_read, docs) = read_documents(&input_dir)?;
    info!(
        files = files_read,
        records = records_read,
        kept = docs.len(),
        "raw dumps filtered"
    );

    // --- Phase 3: Republish ---
    let bytes = gzip_bytes(&to_jsonl(&docs)?)?;
    let key = merged_key(&settings.prefix, &settings.timestamp);
    store.upload_merged(&settings.bucket, &key, bytes).await?;

    let mut documents_uploaded = 0;
    for doc in &docs {
        let key = document_key(&settings.prefix, &settings.timestamp, &doc.url);
        let body = doc.raw_html.clone().into_bytes();
        match store.upload_document(&settings.bucket, &key, body).await {
            Ok(()) => documents_uploaded += 1,
            Err(e) => warn!(key = %key, error = %e, "document upload failed, skipping"),
        }
    }

    let report = IngestReport {
        files_read,
        records_read,
        documents_kept: docs.len(),
        documents_uploaded,
        elapsed: start.elapsed(),
    };

    info!(
        kept = report.documents_kept,
        uploaded = report.documents_uploaded,
        elapsed_ms = report.elapsed.as_millis(),
        "ingest run complete"
    );

    Ok(report)
}

/// Read every `*.jsonl` dump in `dir` and convert surviving lines into
/// translation-ready documents. Returns (files, lines, documents).
fn read_documents(dir: &Path) -> Result<(usize, usize, Vec<IngestDoc>)> {
    let entries = std::fs::read_dir(dir).map_err(|e| DocsweepError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DocsweepError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = 0;
    let mut docs = Vec::new();

    for path in &paths {
        debug!(file = %path.display(), "reading dump");
        let contents = std::fs::read_to_string(path).map_err(|e| DocsweepError::io(path, e))?;

        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            records += 1;
            let record: FetchRecord = match serde_json::from_str(line) {
                Ok(record) => record,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping malformed line");
                    continue;
                }
            };
            if let Some(doc) = to_ingest_doc(&record) {
                docs.push(doc);
            }
        }
    }

    Ok((paths.len(), records, docs))
}

/// Convert one raw fetch record into a translation-ready document, or drop
/// it: non-200 status, unwanted content, and unparsable HTML all drop.
fn to_ingest_doc(record: &FetchRecord) -> Option<IngestDoc> {
    if record.status != Some(200) {
        debug!(url = %record.url, "dropping non-200 record");
        return None;
    }
    if let Some(marker) = filter::content_marker(&record.url) {
        debug!(url = %record.url, marker, "dropping unwanted content");
        return None;
    }
    let Some(html) = record.html.as_deref() else {
        warn!(url = %record.url, "dropping record with no html body");
        return None;
    };

    let page = match parse_page(html) {
        Ok(page) => page,
        Err(e) => {
            warn!(url = %record.url, error = %e, "skipping unparsable page");
            return None;
        }
    };

    Some(IngestDoc {
        url: record.url.clone(),
        product: page.product,
        guide: page.guide,
        title: page.title,
        content: page.content,
        raw_html: html.to_string(),
        last_modified: record.last_modified.clone(),
        crawled_at: record.crawled_at.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testutil::MemoryStore;
    use docsweep_storage::{gunzip_file, url_to_path};

    const PAGE: &str = "<html><head><meta name=\"product\" content=\"Amazon S3\">\
         <title>What is S3?</title></head><body><p>An object store.</p></body></html>";

    fn success_record(url: &str, html: &str) -> FetchRecord {
        FetchRecord {
            crawled_at: "2020-06-27T02:00:18+00:00".to_string(),
            url: url.to_string(),
            status: Some(200),
            last_modified: Some("2020-06-27T02:00:18".to_string()),
            etag: Some("\"33a64df5\"".to_string()),
            html: Some(html.to_string()),
            url_ja: url.replace(".com/", ".com/ja_jp/"),
            status_ja: Some(200),
            last_modified_ja: Some("2020-06-27T02:00:18".to_string()),
            etag_ja: Some("\"33a64df5\"".to_string()),
            html_ja: Some(html.to_string()),
            message: None,
        }
    }

    fn seeded_dump(prefix_ts: &str, lines: &[String]) -> (String, Vec<u8>) {
        let body = gzip_bytes(lines.join("\n").as_bytes()).unwrap();
        (format!("{prefix_ts}/rawdata_0000.jsonl.gz"), body)
    }

    fn unpack_merged(bytes: &[u8]) -> Vec<IngestDoc> {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("merged.jsonl.gz");
        std::fs::write(&archive, bytes).unwrap();
        let plain = gunzip_file(&archive).unwrap();
        std::fs::read_to_string(plain)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn ingest_republishes_surviving_records() {
        let keep = "https://docs.aws.amazon.com/s3/userguide/intro.html";
        let lines = vec![
            serde_json::to_string(&success_record(keep, PAGE)).unwrap(),
            serde_json::to_string(&success_record(
                "https://docs.aws.amazon.com/s3/APIReference/op.html",
                PAGE,
            ))
            .unwrap(),
            serde_json::to_string(&FetchRecord::failure(
                "https://docs.aws.amazon.com/s3/gone.html",
                "https://docs.aws.amazon.com/ja_jp/s3/gone.html",
                "2020-06-27T02:00:18+00:00",
                "HTTP 404",
            ))
            .unwrap(),
            "not json at all".to_string(),
        ];

        let work_dir = tempfile::tempdir().unwrap();
        let settings = IngestSettings::new(
            "dump-bucket",
            "crawler/aws-docs",
            "20200627020018",
            work_dir.path(),
        )
        .unwrap();

        let store = MemoryStore {
            seeded: vec![seeded_dump("crawler/aws-docs/20200627020018", &lines)],
            ..Default::default()
        };

        let report = run_ingest(&settings, &store).await.unwrap();

        assert_eq!(report.files_read, 1);
        assert_eq!(report.records_read, 4);
        assert_eq!(report.documents_kept, 1);
        assert_eq!(report.documents_uploaded, 1);

        let merged = store.merged.lock().unwrap();
        assert_eq!(merged.len(), 1);
        let (bucket, key, bytes) = &merged[0];
        assert_eq!(bucket, "dump-bucket");
        assert_eq!(
            key,
            "crawler/aws-docs/20200627020018/merged/filtered_rawdata_20200627020018.jsonl.gz"
        );

        let docs = unpack_merged(bytes);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, keep);
        assert_eq!(docs[0].title, "What is S3?");
        assert_eq!(docs[0].product.as_deref(), Some("Amazon S3"));
        assert_eq!(docs[0].content, "An object store.");
        assert_eq!(docs[0].raw_html, PAGE);

        let documents = store.documents.lock().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(
            documents[0].1,
            format!(
                "crawler/aws-docs/20200627020018/amazon-translate/en/{}",
                url_to_path(keep)
            )
        );
        assert_eq!(documents[0].2, PAGE.as_bytes());
    }

    #[tokio::test]
    async fn failed_download_aborts_the_run() {
        let work_dir = tempfile::tempdir().unwrap();
        let settings = IngestSettings::new(
            "dump-bucket",
            "crawler/aws-docs",
            "20200627020018",
            work_dir.path(),
        )
        .unwrap();

        let store = MemoryStore {
            fail_download: true,
            ..Default::default()
        };

        let result = run_ingest(&settings, &store).await;
        assert!(result.is_err());
        assert!(store.merged.lock().unwrap().is_empty());
    }
}
