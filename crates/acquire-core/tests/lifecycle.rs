use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use acquire_core::sync::drive;
use acquire_core::{Backend, Error, ErrorCode, Handle, Progress, Result, Status, Step};
use tempfile::tempdir;

/// Writes `lines` lines to a file, one per poll, removing it on cancel.
struct LineWriter {
    path: PathBuf,
    file: Option<File>,
    remaining: u32,
}

impl LineWriter {
    fn open(path: PathBuf, lines: u32, progress: &mut Progress) -> Result<Box<dyn Backend>> {
        let file = File::create(&path)
            .map_err(|e| Error::new(ErrorCode::FileOpenFailed, e.to_string()))?;
        progress.set_total(Some(u64::from(lines) * 6));
        Ok(Box::new(Self {
            path,
            file: Some(file),
            remaining: lines,
        }))
    }
}

impl Backend for LineWriter {
    fn name(&self) -> &'static str {
        "line-writer"
    }

    fn poll(&mut self, progress: &mut Progress) -> Result<Step> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::new(ErrorCode::Unknown, "writer closed"))?;
        file.write_all(b"line!\n")
            .map_err(|e| Error::new(ErrorCode::FileWriteFailed, e.to_string()))?;
        progress.advance(6);
        self.remaining -= 1;
        if self.remaining == 0 {
            self.file = None;
            return Ok(Step::Done);
        }
        Ok(Step::Pending)
    }

    fn cancel(&mut self) {
        self.file = None;
        let _ = std::fs::remove_file(&self.path);
    }
}

#[test]
fn full_run_writes_every_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let mut handle = Handle::new();
    handle
        .start(|progress| LineWriter::open(path.clone(), 3, progress))
        .unwrap();
    assert_eq!(handle.total_size(), 18);

    let mut last = handle.bytes_processed();
    while handle.poll() == Status::InProgress {
        assert!(handle.bytes_processed() > last);
        last = handle.bytes_processed();
    }

    assert_eq!(handle.status(), Status::Complete);
    assert_eq!(handle.bytes_processed(), handle.total_size());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "line!\n".repeat(3));
}

#[test]
fn cancellation_closes_and_removes_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.txt");

    let mut handle = Handle::new();
    handle
        .start(|progress| LineWriter::open(path.clone(), 100, progress))
        .unwrap();
    handle.poll();
    handle.poll();
    assert!(path.exists());

    handle.cancel();
    let err = drive(&mut handle).unwrap_err();

    assert_eq!(err.code(), ErrorCode::Cancelled);
    assert_eq!(handle.error_code(), ErrorCode::Cancelled);
    assert!(!path.exists());
}

#[test]
fn independent_handles_do_not_share_progress() {
    let dir = tempdir().unwrap();
    let mut first = Handle::new();
    let mut second = Handle::new();

    first
        .start(|p| LineWriter::open(dir.path().join("a"), 2, p))
        .unwrap();
    drive(&mut first).unwrap();

    second
        .start(|p| LineWriter::open(dir.path().join("b"), 2, p))
        .unwrap();
    assert_eq!(second.bytes_processed(), 0);
    drive(&mut second).unwrap();

    assert_eq!(first.bytes_processed(), 12);
    assert_eq!(second.bytes_processed(), 12);
}

#[test]
fn handle_can_move_between_threads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("threaded.txt");
    let mut handle = Handle::new();
    handle
        .start(|p| LineWriter::open(path.clone(), 4, p))
        .unwrap();

    let handle = std::thread::spawn(move || {
        drive(&mut handle).unwrap();
        handle
    })
    .join()
    .unwrap();

    assert_eq!(handle.status(), Status::Complete);
}
