use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use url::Url;

use crate::error::Result;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Response head plus a streaming body.
pub struct HttpResponse {
    pub status: u16,
    /// Value of `Content-Length`, if the server sent one.
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Asynchronous HTTP client abstraction.
///
/// The returned future owns everything it needs so a backend can keep it
/// across polls and drive it a slice at a time.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Issue a GET and resolve once the response head has arrived.
    ///
    /// Non-2xx responses resolve successfully; status handling is left to
    /// the caller.
    fn get(&self, url: &Url, headers: &[(String, String)]) -> BoxFuture<'static, Result<HttpResponse>>;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::error::Error as StdError;

    use futures_util::TryStreamExt;

    use super::*;
    use crate::error::FetchError;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a client sending `user_agent` with every request.
        pub fn new(user_agent: &str) -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .map_err(|e| FetchError::ClientInit(error_chain(&e)))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        fn get(
            &self,
            url: &Url,
            headers: &[(String, String)],
        ) -> BoxFuture<'static, Result<HttpResponse>> {
            let mut request = self.client.get(url.as_str());
            for (key, value) in headers {
                request = request.header(key, value);
            }

            Box::pin(async move {
                let response = request.send().await.map_err(map_reqwest_error)?;
                let status = response.status().as_u16();
                let content_length = response.content_length();
                let body = response.bytes_stream().map_err(map_reqwest_error);
                Ok::<_, FetchError>(HttpResponse {
                    status,
                    content_length,
                    body: Box::pin(body),
                })
            })
        }
    }

    /// Classify a reqwest failure into the fetch error taxonomy.
    pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
        let message = error_chain(&err);
        if err.is_builder() {
            FetchError::InvalidUrl(message)
        } else if err.is_timeout() {
            FetchError::Timeout
        } else if is_dns_failure(&err) {
            FetchError::HostNotFound(message)
        } else {
            FetchError::Network(message)
        }
    }

    fn is_dns_failure(err: &(dyn StdError + 'static)) -> bool {
        let mut current = Some(err);
        while let Some(e) = current {
            let text = e.to_string();
            if text.contains("dns error") || text.contains("failed to lookup address") {
                return true;
            }
            current = e.source();
        }
        false
    }

    /// `outer: inner: innermost`, since reqwest's Display omits causes.
    fn error_chain(err: &(dyn StdError + 'static)) -> String {
        let mut message = err.to_string();
        let mut current = err.source();
        while let Some(e) = current {
            message.push_str(": ");
            message.push_str(&e.to_string());
            current = e.source();
        }
        message
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
