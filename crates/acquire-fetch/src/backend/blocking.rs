use acquire_core::{Backend, Progress, SharedRuntime, Step};
use futures_util::StreamExt;
use tracing::debug;
use url::Url;

use crate::client::HttpClient;
use crate::error::{FetchError, Result};
use crate::staging::StagedOutput;

/// Whole-transfer HTTP download.
///
/// The request and body run to completion inside [`BlockingHttp::start`];
/// polling only places the staged file. Cancelling after start discards the
/// result but cannot interrupt the transfer itself.
pub(crate) struct BlockingHttp {
    url: Url,
    output: Option<StagedOutput>,
}

impl BlockingHttp {
    pub(crate) fn start(
        client: &dyn HttpClient,
        url: Url,
        headers: &[(String, String)],
        mut output: StagedOutput,
        progress: &mut Progress,
    ) -> Result<Self> {
        debug!(%url, dest = %output.destination().display(), "blocking download started");
        let runtime = SharedRuntime::acquire().map_err(FetchError::Runtime)?;

        runtime.block_on(async {
            let response = client.get(&url, headers).await?;
            if !response.is_success() {
                return Err(FetchError::HttpStatus {
                    status: response.status,
                    url: url.to_string(),
                });
            }
            progress.set_total(response.content_length);

            let mut body = response.body;
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                output.write(&chunk)?;
                progress.advance(chunk.len() as u64);
            }
            Ok::<(), FetchError>(())
        })?;

        debug!(%url, bytes = output.written(), "blocking transfer finished");
        Ok(Self {
            url,
            output: Some(output),
        })
    }
}

impl Backend for BlockingHttp {
    fn name(&self) -> &'static str {
        "http-blocking"
    }

    fn poll(&mut self, progress: &mut Progress) -> acquire_core::Result<Step> {
        if let Some(output) = self.output.take() {
            let written = output.written();
            output.commit().map_err(acquire_core::Error::from)?;
            progress.set_total(Some(written));
        }
        Ok(Step::Done)
    }

    fn cancel(&mut self) {
        debug!(url = %self.url, "blocking download discarded");
        self.output = None;
    }

    fn blocks_in_start(&self) -> bool {
        true
    }
}
