//! Integration test: log records emitted by a batch (one ERROR per failure,
//! one INFO `{url}: size={n}` per success, nothing else at INFO and above).

mod common;

use common::http_server::{self, body_for};
use hostgrab_core::batch::run_batch;
use hostgrab_core::fetcher::FetchOptions;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn info_subscriber(log: &CapturedLog) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(log.clone())
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_ansi(false)
        .finish()
}

#[test]
fn batch_logs_one_error_per_failure_and_one_info_per_success() {
    let base = http_server::start();
    let good = format!("{}/page", base);
    let urls = vec![good.clone(), "not a url".to_string()];

    let log = CapturedLog::default();
    let subscriber = info_subscriber(&log);

    let dir = tempdir().unwrap();
    let out = dir.path().join("results");
    let summary = tracing::subscriber::with_default(subscriber, || {
        run_batch(&urls, FetchOptions::default(), &out).unwrap()
    });
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let lines = log.lines();
    let errors: Vec<&String> = lines.iter().filter(|l| l.contains("ERROR")).collect();
    let infos: Vec<&String> = lines.iter().filter(|l| l.contains("INFO")).collect();
    assert_eq!(errors.len(), 1, "log: {:#?}", lines);
    assert!(errors[0].contains("not a url: invalid URL"), "{}", errors[0]);
    assert_eq!(infos.len(), 1, "log: {:#?}", lines);
    let expected = format!("{}: size={}", good, body_for("/page").len());
    assert!(infos[0].contains(&expected), "{}", infos[0]);
    assert_eq!(lines.len(), 2, "no other records at INFO and above: {:#?}", lines);

    let entries: Vec<_> = std::fs::read_dir(&out).unwrap().flatten().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn write_failure_logs_url_and_target_path() {
    let base = http_server::start();
    let url = format!("{}/page", base);

    let dir = tempdir().unwrap();
    let out = dir.path().join("results");
    // A non-empty directory where the output file belongs makes the write fail.
    let blocked = out.join("127.0.0.1");
    std::fs::create_dir_all(&blocked).unwrap();
    std::fs::write(blocked.join("keep"), b"x").unwrap();

    let log = CapturedLog::default();
    let summary = tracing::subscriber::with_default(info_subscriber(&log), || {
        run_batch(&[url.clone()], FetchOptions::default(), &out).unwrap()
    });
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.write_errors, 1);

    let lines = log.lines();
    let errors: Vec<&String> = lines.iter().filter(|l| l.contains("ERROR")).collect();
    assert_eq!(errors.len(), 1, "log: {:#?}", lines);
    let expected = format!("{}: failed to write {}: ", url, blocked.display());
    assert!(errors[0].contains(&expected), "{}", errors[0]);
}
