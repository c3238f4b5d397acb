//! Download backends and the scheme dispatcher.
//!
//! - `streaming.rs` - HTTP, one body chunk per poll on the shared runtime
//! - `blocking.rs` - HTTP, whole transfer during start
//! - `local.rs` - `file://` copies

mod blocking;
mod local;
mod streaming;

use std::path::Path;
use std::sync::Arc;

use acquire_core::{Backend, Progress};
use tracing::debug;

use crate::client::HttpClient;
use crate::error::Result;
use crate::location::{Scheme, parse_url, scheme_of};
use crate::options::{FetchBackend, FetchOptions};
use crate::staging::StagedOutput;

use self::blocking::BlockingHttp;
use self::local::LocalFile;
use self::streaming::StreamingHttp;

/// Pick and construct the backend for `url`.
///
/// The URL is checked before anything touches the filesystem, so a bad URL
/// never creates directories or temporary files.
pub(crate) fn open(
    url: &str,
    destination: &Path,
    options: &FetchOptions,
    progress: &mut Progress,
) -> Result<Box<dyn Backend>> {
    let url = parse_url(url)?;
    let scheme = scheme_of(&url)?;
    let output = StagedOutput::create(destination, options)?;

    let backend: Box<dyn Backend> = match (scheme, options.backend) {
        (Scheme::File, _) => Box::new(LocalFile::start(&url, output, options.chunk_size, progress)?),
        (Scheme::Http, FetchBackend::Blocking) => {
            let client = http_client(options)?;
            Box::new(BlockingHttp::start(
                client.as_ref(),
                url,
                &options.headers,
                output,
                progress,
            )?)
        }
        (Scheme::Http, FetchBackend::Auto | FetchBackend::Streaming) => {
            let client = http_client(options)?;
            Box::new(StreamingHttp::start(
                client.as_ref(),
                url,
                &options.headers,
                output,
                options.poll_interval,
            )?)
        }
    };

    debug!(backend = backend.name(), "download backend selected");
    Ok(backend)
}

#[cfg(feature = "reqwest")]
fn http_client(options: &FetchOptions) -> Result<Arc<dyn HttpClient>> {
    match &options.client {
        Some(client) => Ok(Arc::clone(client)),
        None => Ok(Arc::new(crate::client::ReqwestClient::new(&options.user_agent)?)),
    }
}

#[cfg(not(feature = "reqwest"))]
fn http_client(options: &FetchOptions) -> Result<Arc<dyn HttpClient>> {
    options.client.clone().ok_or_else(|| {
        crate::error::FetchError::ClientInit("no HTTP client compiled in; supply one in FetchOptions".into())
    })
}
