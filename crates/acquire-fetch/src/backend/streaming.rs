use std::time::Duration;

use acquire_core::{Backend, Progress, SharedRuntime, Step};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, trace};
use url::Url;

use crate::client::{BoxFuture, BoxStream, HttpClient, HttpResponse};
use crate::error::{FetchError, Result};
use crate::staging::StagedOutput;

enum Transfer {
    /// Waiting for the response head.
    Requesting(BoxFuture<'static, Result<HttpResponse>>),
    /// Reading the body.
    Receiving(BoxStream<'static, Result<Bytes>>),
}

/// HTTP download driven a slice at a time on the shared runtime.
///
/// Each poll runs the runtime for at most `poll_interval`. A poll that sees
/// the response head keeps going and reads the first body chunk within the
/// same slice.
pub(crate) struct StreamingHttp {
    url: Url,
    transfer: Transfer,
    output: Option<StagedOutput>,
    poll_interval: Duration,
    // Dropped last: the transfer may own tasks of this runtime.
    runtime: SharedRuntime,
}

impl StreamingHttp {
    pub(crate) fn start(
        client: &dyn HttpClient,
        url: Url,
        headers: &[(String, String)],
        output: StagedOutput,
        poll_interval: Duration,
    ) -> Result<Self> {
        let runtime = SharedRuntime::acquire().map_err(FetchError::Runtime)?;
        let request = client.get(&url, headers);
        debug!(%url, dest = %output.destination().display(), "streaming download started");

        Ok(Self {
            url,
            transfer: Transfer::Requesting(request),
            output: Some(output),
            poll_interval,
            runtime,
        })
    }

    fn step(&mut self, progress: &mut Progress) -> Result<Step> {
        let Self {
            url,
            transfer,
            output,
            poll_interval,
            runtime,
        } = self;

        let step = runtime.block_on(async {
            let deadline = Instant::now() + *poll_interval;
            loop {
                match transfer {
                    Transfer::Requesting(request) => {
                        let Ok(response) = timeout_at(deadline, request).await else {
                            trace!(%url, "waiting for response");
                            return Ok::<_, FetchError>(Step::Pending);
                        };
                        let response = response?;
                        if !response.is_success() {
                            return Err(FetchError::HttpStatus {
                                status: response.status,
                                url: url.to_string(),
                            });
                        }
                        progress.set_total(response.content_length);
                        debug!(%url, status = response.status, total = ?response.content_length, "response received");
                        *transfer = Transfer::Receiving(response.body);
                    }
                    Transfer::Receiving(body) => {
                        return match timeout_at(deadline, body.next()).await {
                            Err(_) => Ok(Step::Pending),
                            Ok(Some(chunk)) => {
                                let chunk = chunk?;
                                if let Some(output) = output.as_mut() {
                                    output.write(&chunk)?;
                                }
                                progress.advance(chunk.len() as u64);
                                trace!(%url, bytes = chunk.len(), "chunk written");
                                Ok(Step::Pending)
                            }
                            Ok(None) => Ok(Step::Done),
                        };
                    }
                }
            }
        })?;

        if step == Step::Done {
            if let Some(output) = output.take() {
                output.commit()?;
            }
            // Servers that send no length still end with a known size.
            let done = progress.bytes_processed().max(0) as u64;
            progress.set_total(Some(done));
            debug!(url = %url, bytes = done, "streaming download complete");
        }
        Ok(step)
    }
}

impl Backend for StreamingHttp {
    fn name(&self) -> &'static str {
        "http-streaming"
    }

    fn poll(&mut self, progress: &mut Progress) -> acquire_core::Result<Step> {
        Ok(self.step(progress)?)
    }

    fn cancel(&mut self) {
        debug!(url = %self.url, "streaming download cancelled");
        self.output = None;
    }
}
