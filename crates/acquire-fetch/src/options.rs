use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use acquire_verify::ChecksumAlgorithm;

use crate::client::HttpClient;

/// Default number of bytes moved per poll by chunked backends.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default upper bound on the time one streaming poll may spend.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Which HTTP backend serves `http`/`https` URLs.
///
/// `file` URLs always use the local copy backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchBackend {
    /// Streaming, resolved per platform. Currently the same as `Streaming`.
    #[default]
    Auto,

    /// Non-blocking: each poll moves at most one body chunk.
    Streaming,

    /// Degraded: the whole transfer runs inside `start`; the first poll
    /// only places the finished file.
    Blocking,
}

impl fmt::Display for FetchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchBackend::Auto => write!(f, "auto"),
            FetchBackend::Streaming => write!(f, "streaming"),
            FetchBackend::Blocking => write!(f, "blocking"),
        }
    }
}

/// Configuration for a download.
///
/// # Examples
///
/// ```
/// use acquire_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .poll_interval(Duration::from_millis(20))
///     .header("Authorization", "Bearer token");
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Backend used for HTTP URLs.
    ///
    /// Default: [`FetchBackend::Auto`]
    pub backend: FetchBackend,

    /// Bytes copied per poll by the local file backend, and the write
    /// buffer size of the staged output.
    ///
    /// Default: 64 KiB
    pub chunk_size: usize,

    /// Longest a single streaming poll may drive the network before
    /// returning `InProgress`.
    ///
    /// Default: 50ms
    pub poll_interval: Duration,

    /// Custom HTTP headers sent with the request.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// `User-Agent` sent by the built-in client.
    pub user_agent: String,

    /// Create missing parent directories of the destination.
    ///
    /// Default: true
    pub create_dirs: bool,

    /// Digest checked while bytes are written; a mismatch fails the
    /// download and leaves no destination file.
    ///
    /// Default: None
    pub checksum: Option<(ChecksumAlgorithm, String)>,

    /// Client used instead of the built-in reqwest client.
    ///
    /// Default: None
    pub client: Option<Arc<dyn HttpClient>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("backend", &self.backend)
            .field("chunk_size", &self.chunk_size)
            .field("poll_interval", &self.poll_interval)
            .field("headers", &self.headers)
            .field("user_agent", &self.user_agent)
            .field("create_dirs", &self.create_dirs)
            .field("checksum", &self.checksum)
            .field("client", &self.client.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            backend: FetchBackend::Auto,
            chunk_size: DEFAULT_CHUNK_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            headers: Arc::new([]),
            user_agent: concat!("acquire/", env!("CARGO_PKG_VERSION")).to_string(),
            create_dirs: true,
            checksum: None,
            client: None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn backend(mut self, backend: FetchBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the per-poll chunk size. Zero is raised to one byte.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Add a single custom HTTP header.
    ///
    /// # Examples
    ///
    /// ```
    /// use acquire_fetch::FetchOptions;
    ///
    /// let options = FetchOptions::default()
    ///     .header("Accept", "application/octet-stream");
    /// assert_eq!(options.headers.len(), 1);
    /// ```
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = headers.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Verify the downloaded bytes against `expected_hex` as they arrive.
    #[must_use]
    pub fn checksum(mut self, algorithm: ChecksumAlgorithm, expected_hex: impl Into<String>) -> Self {
        self.checksum = Some((algorithm, expected_hex.into()));
        self
    }

    /// Route HTTP requests through `client`.
    #[must_use]
    pub fn client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }
}
