use std::path::{Path, PathBuf};

use acquire::{
    ExtractOptions, FetchBackend, FetchOptions, Handle, download_to_dir, extract_async_start,
    sync, verify_async_start,
};
use anyhow::{Context, Result};
use tracing::info;

use super::args::Args;
use super::tracker::ProgressTracker;

/// Download, then optionally verify and unpack, as one pipeline.
pub fn run(args: &Args) -> Result<PathBuf> {
    let path = download(args)?;
    if let Some(expected) = &args.checksum {
        verify(args, &path, expected)?;
    }
    if let Some(dir) = &args.extract {
        extract(args, &path, dir)?;
    }
    Ok(path)
}

fn download(args: &Args) -> Result<PathBuf> {
    let backend = if args.blocking {
        FetchBackend::Blocking
    } else {
        FetchBackend::Auto
    };
    let options = FetchOptions::default().backend(backend);

    let mut handle = Handle::new();
    let mut tracker = ProgressTracker::new("download", args.quiet);
    let path = download_to_dir(&mut handle, &args.url, &args.output, &options)
        .with_context(|| format!("download of {} failed", args.url))?;
    track(&mut handle, &mut tracker).with_context(|| format!("download of {} failed", args.url))?;

    info!(url = %args.url, path = %path.display(), bytes = handle.bytes_processed(), "downloaded");
    Ok(path)
}

fn verify(args: &Args, path: &Path, expected: &str) -> Result<()> {
    let mut handle = Handle::new();
    let mut tracker = ProgressTracker::new("verify", args.quiet);
    verify_async_start(&mut handle, path, expected, args.algorithm)
        .and_then(|()| track(&mut handle, &mut tracker))
        .with_context(|| format!("{} check of {} failed", args.algorithm, path.display()))?;

    info!(algorithm = %args.algorithm, path = %path.display(), "checksum verified");
    Ok(())
}

fn extract(args: &Args, path: &Path, dir: &Path) -> Result<()> {
    let options = ExtractOptions::default().strip_components(args.strip_components);

    let mut handle = Handle::new();
    let mut tracker = ProgressTracker::new("extract", args.quiet);
    extract_async_start(&mut handle, path, dir, &options)
        .and_then(|()| track(&mut handle, &mut tracker))
        .with_context(|| format!("extracting {} failed", path.display()))?;

    info!(archive = %path.display(), dir = %dir.display(), "extracted");
    Ok(())
}

fn track(handle: &mut Handle, tracker: &mut ProgressTracker) -> acquire::Result<()> {
    let result = sync::drive_with(handle, |h| tracker.observe(h));
    match &result {
        Ok(()) => tracker.finish(),
        Err(_) => tracker.abandon(),
    }
    result
}
