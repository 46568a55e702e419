use std::future::Future;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct DiscordUser {
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ThreadInfo {
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: String,
    pub url: String,
}

/// The seam between the record cache and the dashboard backend. Production
/// code uses [`Client`]; tests inject fakes.
pub trait Backend: Clone + Send + Sync + 'static {
    fn fetch_user(&self, id: &str) -> impl Future<Output = anyhow::Result<DiscordUser>> + Send;
    fn fetch_thread(&self, id: &str) -> impl Future<Output = anyhow::Result<ThreadInfo>> + Send;
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    base: String,
}

impl Client {
    pub fn new(base: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()?;

        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }

        Ok(Self { client, base })
    }

    async fn get_response<T>(&self, ep: &str) -> anyhow::Result<T>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        let resp = self
            .client
            .get(format!("{}/{ep}", self.base))
            .send()
            .await?;

        let status = resp.status();
        anyhow::ensure!(status.is_success(), "'{ep}' answered with {status}");

        Ok(resp.json().await?)
    }
}

impl Backend for Client {
    fn fetch_user(&self, id: &str) -> impl Future<Output = anyhow::Result<DiscordUser>> + Send {
        let ep = format!("discord_user/{id}");
        async move { self.get_response(&ep).await }
    }

    fn fetch_thread(&self, id: &str) -> impl Future<Output = anyhow::Result<ThreadInfo>> + Send {
        let ep = format!("thread_info/{id}");
        async move { self.get_response(&ep).await }
    }
}

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
