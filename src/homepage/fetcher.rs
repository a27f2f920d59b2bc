use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::error::Result;

pub struct HomepageFetcher {
    client: Client,
}

impl HomepageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client })
    }

    /// GET the page and return its body. Non-2xx responses are errors; the
    /// caller decides whether that degrades to an empty listing.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.as_str()).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch homepage: HTTP {}", response.status()).into());
        }

        let body = response.text().await?;
        tracing::debug!(bytes = body.len(), %url, "Fetched homepage");
        Ok(body)
    }
}
