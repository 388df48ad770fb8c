// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::{Error, Fetcher, Result};

/// HTTP fetcher options.
#[derive(Clone, PartialEq, Debug)]
pub struct FetchOptions {
    /// A whole request timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// A `User-Agent` header value.
    ///
    /// Default: `svg-to-png/<version>`
    pub user_agent: String,

    /// The largest accepted response body in bytes.
    ///
    /// Default: 32 MiB
    pub max_size: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            timeout: Duration::from_secs(30),
            user_agent: concat!("svg-to-png/", env!("CARGO_PKG_VERSION")).to_string(),
            max_size: 32 * 1024 * 1024,
        }
    }
}

/// A [`Fetcher`] that downloads files over HTTP(S).
///
/// A client is created per request, on the thread that performs it.
/// A blocking client owns a runtime that must not be dropped
/// inside an asynchronous context.
pub struct HttpFetcher {
    opt: FetchOptions,
}

impl HttpFetcher {
    /// Creates a new fetcher.
    pub fn new(opt: &FetchOptions) -> Self {
        HttpFetcher { opt: opt.clone() }
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.opt.timeout)
            .user_agent(self.opt.user_agent.clone())
            .build()
            .map_err(|e| Error::Fetch(e.to_string()))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &url::Url) -> Result<Vec<u8>> {
        let max_size = self.opt.max_size;
        let resp = self
            .client()?
            .get(url.as_str())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Fetch(e.to_string()))?;

        if let Some(len) = resp.content_length() {
            if len > max_size {
                return Err(Error::Fetch(format!(
                    "response is too big: {} > {} bytes",
                    len, max_size
                )));
            }
        }

        // Content-Length can be missing or wrong, so the body is capped as well.
        let mut data = Vec::new();
        resp.take(max_size + 1)
            .read_to_end(&mut data)
            .map_err(|e| Error::Fetch(e.to_string()))?;

        if data.len() as u64 > max_size {
            return Err(Error::Fetch(format!(
                "response is bigger than {} bytes",
                max_size
            )));
        }

        log::debug!("Fetched {} bytes from '{}'.", data.len(), url);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opt = FetchOptions::default();
        assert_eq!(opt.timeout, Duration::from_secs(30));
        assert!(opt.user_agent.starts_with("svg-to-png/"));
        assert_eq!(opt.max_size, 32 * 1024 * 1024);
    }

    #[tokio::test]
    async fn drop_inside_runtime() {
        let fetcher = HttpFetcher::new(&FetchOptions::default());
        drop(fetcher);
    }
}
