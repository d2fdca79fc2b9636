use reqwest::Client;

/// Warms an image URL in the background, resolving with the same URL once
/// the fetch completes. Load failures are logged but never surfaced: callers
/// get the URL back either way and discover broken images elsewhere.
pub struct ImagePreloader {
    client: Client,
}

impl ImagePreloader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn preload(&self, url: &str) -> String {
        match self.client.get(url).send().await {
            Ok(response) => match response.bytes().await {
                Ok(bytes) => {
                    if let Err(e) = image::load_from_memory(&bytes) {
                        log::warn!("Preloaded {} but it did not decode as an image: {}", url, e);
                    } else {
                        log::debug!("Preloaded image {} ({} bytes)", url, bytes.len());
                    }
                }
                Err(e) => log::warn!("Failed to read preload body for {}: {}", url, e),
            },
            Err(e) => log::warn!("Failed to preload image {}: {}", url, e),
        }

        url.to_string()
    }
}

impl Default for ImagePreloader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preload_resolves_with_the_url_even_on_failure() {
        let preloader = ImagePreloader::new();
        // Nothing listens here; the fetch fails but the URL still comes back.
        let url = "http://127.0.0.1:9/missing.png";
        assert_eq!(preloader.preload(url).await, url);
    }
}
