use {
    async_trait::async_trait,
    relay_capture::{Error, MediaSource, Result},
    reqwest::Client,
    teloxide::{Bot, prelude::Requester},
    tracing::debug,
};

/// Resolves Telegram file ids and downloads their content.
#[derive(Clone)]
pub struct TelegramMediaSource {
    bot: Bot,
    client: Client,
}

impl TelegramMediaSource {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self::with_client(bot, Client::new())
    }

    #[must_use]
    pub fn with_client(bot: Bot, client: Client) -> Self {
        Self { bot, client }
    }
}

/// Telegram file URL format: `<api>/file/bot<token>/<file_path>`.
fn file_download_url(api_url: &str, token: &str, path: &str) -> String {
    format!(
        "{}/file/bot{token}/{}",
        api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
impl MediaSource for TelegramMediaSource {
    async fn resolve_url(&self, locator: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(locator)
            .await
            .map_err(|e| Error::external("failed to get file info", e))?;
        debug!(file_id = locator, path = %file.path, "resolved telegram file");
        Ok(file_download_url(
            self.bot.api_url().as_str(),
            self.bot.token(),
            &file.path,
        ))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::external("failed to download file", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::status("downloading file", status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::external("failed to read file body", e))?;
        Ok(bytes.to_vec())
    }
}
