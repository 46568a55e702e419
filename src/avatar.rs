use std::collections::{HashMap, HashSet};

use egui_extras::RetainedImage;
use tokio_stream::StreamExt as _;

use crate::Repaint;

/// Avatar bitmaps keyed by url. A miss queues a fetch and renders nothing
/// until the decoded image is polled in.
pub struct Cache {
    map: HashMap<String, RetainedImage>,
    loader: Loader,
}

impl Cache {
    pub fn new(loader: Loader) -> Self {
        Self {
            map: HashMap::default(),
            loader,
        }
    }

    pub fn get(&mut self, url: &str) -> Option<&RetainedImage> {
        match self.map.get(url) {
            Some(img) => Some(img),
            None => {
                self.loader.request(url);
                None
            }
        }
    }

    pub fn poll(&mut self) {
        for (url, img) in self.loader.produce.try_iter() {
            self.map.insert(url, img);
        }
    }
}

#[derive(Clone)]
pub struct Loader {
    submit: flume::Sender<String>,
    produce: flume::Receiver<(String, RetainedImage)>,
}

impl Loader {
    pub fn spawn(repaint: impl Repaint) -> Self {
        let (submit, submit_rx) = flume::unbounded::<String>();
        let (produce_tx, produce) = flume::unbounded();

        let _ = crate::runtime::spawn(async move {
            let mut seen = HashSet::new();
            let mut stream = submit_rx.into_stream();
            let client = reqwest::Client::new();

            while let Some(url) = stream.next().await {
                if !seen.insert(url.clone()) {
                    continue;
                }

                let client = client.clone();
                let tx = produce_tx.clone();
                let repaint = repaint.clone();

                tokio::spawn(async move {
                    let Some(data) = Self::fetch(client, &url).await else { return };

                    tokio::task::spawn_blocking(move || match Self::decode(&url, &data) {
                        Ok(img) => {
                            let _ = tx.send((url, img));
                            repaint.repaint();
                        }
                        Err(err) => eprintln!("cannot decode avatar {url}: {err}"),
                    });
                });
            }
        });

        Self { submit, produce }
    }

    pub fn request(&self, url: &str) {
        let _ = self.submit.send(url.to_string());
    }

    async fn fetch(client: reqwest::Client, url: &str) -> Option<Vec<u8>> {
        let resp = match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                eprintln!("cannot fetch avatar {url}: {}", resp.status());
                return None;
            }
            Err(err) => {
                eprintln!("cannot fetch avatar {url}: {err}");
                return None;
            }
        };

        resp.bytes().await.ok().map(|data| data.to_vec())
    }

    fn decode(name: &str, data: &[u8]) -> anyhow::Result<RetainedImage> {
        use image::ImageFormat;

        match image::guess_format(&data[..data.len().min(128)])? {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => {
                RetainedImage::from_image_bytes(name, data)
                    .map_err(|err| anyhow::anyhow!("cannot load '{name}': {err}"))
            }
            fmt => anyhow::bail!("unsupported format for '{name}': {fmt:?}"),
        }
    }
}
