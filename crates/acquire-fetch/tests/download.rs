mod common;

use std::time::Duration;

use acquire_core::{ErrorCode, Handle, Status};
use acquire_fetch::{
    FetchBackend, FetchOptions, download_async_cancel, download_async_poll, download_async_start,
    download_sync, download_to_dir,
};
use acquire_verify::{ChecksumAlgorithm, digest_bytes, verify_sync};
use common::{Route, TestServer, refused_url};
use tempfile::tempdir;
use url::Url;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn poll_to_end(handle: &mut Handle) {
    while download_async_poll(handle) == Status::InProgress {}
}

fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn download_then_verify() {
    let body = payload(300 * 1024);
    let server = TestServer::start([("/pkg.bin", Route::Body(body.clone()))]);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("pkg.bin");

    let mut handle = Handle::new();
    download_sync(&mut handle, &server.url("/pkg.bin"), &dest, &FetchOptions::default()).unwrap();
    assert_eq!(handle.status(), Status::Complete);
    assert_eq!(handle.bytes_processed(), body.len() as i64);
    assert_eq!(handle.total_size(), body.len() as i64);

    let expected = digest_bytes(&body, ChecksumAlgorithm::Sha256).unwrap();
    let mut verify = Handle::new();
    verify_sync(&mut verify, &dest, &expected, ChecksumAlgorithm::Sha256).unwrap();
    assert_eq!(verify.status(), Status::Complete);
}

#[test]
fn progress_never_goes_backwards() {
    let body = payload(512 * 1024);
    let server = TestServer::start([("/big", Route::Body(body.clone()))]);
    let dir = tempdir().unwrap();
    let options = FetchOptions::default().poll_interval(Duration::from_secs(1));

    let mut handle = Handle::new();
    download_async_start(&mut handle, &server.url("/big"), dir.path().join("big"), &options)
        .unwrap();

    let mut last = 0;
    while download_async_poll(&mut handle) == Status::InProgress {
        assert!(handle.bytes_processed() >= last);
        last = handle.bytes_processed();
    }
    assert_eq!(handle.status(), Status::Complete, "{}", handle.error_message());
    assert_eq!(handle.bytes_processed(), body.len() as i64);
}

#[test]
fn interleaved_handles_are_independent() {
    let server = TestServer::start([
        ("/a", Route::Body(payload(100 * 1024))),
        ("/b", Route::Status(404)),
    ]);
    let dir = tempdir().unwrap();
    let options = FetchOptions::default();

    let mut a = Handle::new();
    let mut b = Handle::new();
    download_async_start(&mut a, &server.url("/a"), dir.path().join("a"), &options).unwrap();
    download_async_start(&mut b, &server.url("/b"), dir.path().join("b"), &options).unwrap();

    while !a.status().is_terminal() || !b.status().is_terminal() {
        download_async_poll(&mut a);
        download_async_poll(&mut b);
    }

    assert_eq!(a.status(), Status::Complete, "{}", a.error_message());
    assert_eq!(b.error_code(), ErrorCode::HttpFailure);
    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
}

#[test]
fn repeated_downloads_start_from_zero() {
    let body = payload(48 * 1024);
    let server = TestServer::start([("/same", Route::Body(body.clone()))]);
    let dir = tempdir().unwrap();
    let options = FetchOptions::default();

    for name in ["first", "second"] {
        let dest = dir.path().join(name);
        let mut handle = Handle::new();
        download_async_start(&mut handle, &server.url("/same"), &dest, &options).unwrap();
        assert_eq!(handle.bytes_processed(), 0);

        poll_to_end(&mut handle);
        assert_eq!(handle.status(), Status::Complete, "{}", handle.error_message());
        assert_eq!(handle.bytes_processed(), body.len() as i64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }
}

#[test]
fn blocking_backend_downloads() {
    let body = payload(64 * 1024 + 7);
    let server = TestServer::start([("/f", Route::Body(body.clone()))]);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("f");
    let options = FetchOptions::default().backend(FetchBackend::Blocking);

    let mut handle = Handle::new();
    download_async_start(&mut handle, &server.url("/f"), &dest, &options).unwrap();
    assert_eq!(download_async_poll(&mut handle), Status::Complete);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[test]
fn not_found_is_http_failure() {
    let server = TestServer::start([]);
    let dir = tempdir().unwrap();

    let mut handle = Handle::new();
    let err = download_sync(
        &mut handle,
        &server.url("/nope"),
        dir.path().join("nope"),
        &FetchOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::HttpFailure);
    assert_eq!(handle.error_code(), ErrorCode::HttpFailure);
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn refused_connection_is_network_failure() {
    let dir = tempdir().unwrap();

    let mut handle = Handle::new();
    let err = download_sync(
        &mut handle,
        &refused_url(),
        dir.path().join("file.bin"),
        &FetchOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NetworkFailure);
}

#[test]
fn cancel_mid_transfer_removes_output() {
    let server = TestServer::start([(
        "/slow",
        Route::Trickle {
            chunk: vec![b'x'; 1024],
            count: 200,
            delay: Duration::from_millis(20),
        },
    )]);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("slow");
    let options = FetchOptions::default().poll_interval(Duration::from_millis(10));

    let mut handle = Handle::new();
    download_async_start(&mut handle, &server.url("/slow"), &dest, &options).unwrap();
    while handle.bytes_processed() == 0 {
        assert_eq!(download_async_poll(&mut handle), Status::InProgress);
    }
    assert_eq!(handle.total_size(), 200 * 1024);

    download_async_cancel(&mut handle);
    assert_eq!(download_async_poll(&mut handle), Status::Error);
    assert_eq!(handle.error_code(), ErrorCode::Cancelled);
    assert!(!dest.exists());
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn file_urls_are_copied_in_chunks() {
    let src_dir = tempdir().unwrap();
    let source = src_dir.path().join("source.bin");
    let body = payload(10_000);
    std::fs::write(&source, &body).unwrap();
    let url = Url::from_file_path(&source).unwrap();

    let dir = tempdir().unwrap();
    let dest = dir.path().join("copy.bin");
    let options = FetchOptions::default().chunk_size(4096);

    let mut handle = Handle::new();
    download_async_start(&mut handle, url.as_str(), &dest, &options).unwrap();
    assert_eq!(handle.backend_name(), Some("local-file"));
    assert_eq!(handle.total_size(), 10_000);

    let mut polls = 0;
    while download_async_poll(&mut handle) == Status::InProgress {
        polls += 1;
    }
    assert_eq!(handle.status(), Status::Complete);
    assert_eq!(polls, 3);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[test]
fn missing_local_source_fails_to_open() {
    let dir = tempdir().unwrap();
    let url = Url::from_file_path(dir.path().join("absent.bin")).unwrap();

    let mut handle = Handle::new();
    let err = download_async_start(
        &mut handle,
        url.as_str(),
        dir.path().join("out.bin"),
        &FetchOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::FileOpenFailed);
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn download_to_dir_names_file_after_url() {
    let server = TestServer::start([("/dist/tool-1.0.tar.gz", Route::Body(b"tarball".to_vec()))]);
    let dir = tempdir().unwrap();
    let target = dir.path().join("downloads");

    let mut handle = Handle::new();
    let path = download_to_dir(
        &mut handle,
        &server.url("/dist/tool-1.0.tar.gz"),
        &target,
        &FetchOptions::default(),
    )
    .unwrap();
    acquire_core::sync::drive(&mut handle).unwrap();

    assert_eq!(path, target.join("tool-1.0.tar.gz"));
    assert_eq!(std::fs::read(&path).unwrap(), b"tarball");
}

#[test]
fn streaming_checksum_is_enforced() {
    let body = payload(2048);
    let server = TestServer::start([("/f", Route::Body(body.clone()))]);
    let dir = tempdir().unwrap();
    let good = digest_bytes(&body, ChecksumAlgorithm::Blake3).unwrap();

    let mut handle = Handle::new();
    let options = FetchOptions::default().checksum(ChecksumAlgorithm::Blake3, good);
    download_sync(&mut handle, &server.url("/f"), dir.path().join("ok"), &options).unwrap();

    let mut handle = Handle::new();
    let options = FetchOptions::default().checksum(ChecksumAlgorithm::Blake3, "0".repeat(64));
    let err = download_sync(&mut handle, &server.url("/f"), dir.path().join("bad"), &options)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ChecksumMismatch);
    assert!(!dir.path().join("bad").exists());
}
