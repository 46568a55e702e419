use std::{collections::HashSet, time::Duration};

use tokio_stream::StreamExt as _;

use crate::{
    api::{Backend, DiscordUser, ThreadInfo},
    cache::Cache,
    cards::Cards,
    Repaint,
};

pub const USER_GROUP_SIZE: usize = 5;
pub const GROUP_DELAY: Duration = Duration::from_millis(100);

pub enum Request {
    Users(Vec<String>),
    Threads(Vec<String>),
}

pub enum Fetched {
    User { id: String, user: DiscordUser },
    Thread { id: String, thread: ThreadInfo },
}

/// Hands fetch work to the background runtime and streams the fetched
/// records back to the UI thread, which applies them via [`poll`].
///
/// User ids pass through a loaded-set: once an id's load attempt has
/// settled it is never fetched again through here, even if the attempt
/// came back empty. Thread ids carry no such guard; repeat requests
/// re-patch and lean on the cache to skip the network.
///
/// [`poll`]: DataFetcher::poll
pub struct DataFetcher {
    submit: flume::Sender<Request>,
    produce: flume::Receiver<Fetched>,
}

impl DataFetcher {
    pub fn spawn<B: Backend>(cache: Cache<B>, repaint: impl Repaint) -> Self {
        let (submit, submit_rx) = flume::unbounded();
        let (produce_tx, produce) = flume::unbounded();

        let _ = crate::runtime::spawn(run(cache, submit_rx, produce_tx, repaint));

        Self { submit, produce }
    }

    pub fn request_users(&self, ids: Vec<String>) {
        let _ = self.submit.send(Request::Users(ids));
    }

    pub fn request_threads(&self, ids: Vec<String>) {
        let _ = self.submit.send(Request::Threads(ids));
    }

    pub fn poll(&self, cards: &mut Cards) {
        for fetched in self.produce.try_iter() {
            match fetched {
                Fetched::User { id, user } => cards.patch_user(&id, &user),
                Fetched::Thread { id, thread } => cards.patch_thread(&id, &thread),
            }
        }
    }
}

async fn run<B: Backend>(
    cache: Cache<B>,
    submit: flume::Receiver<Request>,
    produce: flume::Sender<Fetched>,
    repaint: impl Repaint,
) {
    let mut loaded = HashSet::new();
    let mut stream = submit.into_stream();

    while let Some(req) = stream.next().await {
        match req {
            Request::Users(ids) => {
                let pending = ids
                    .into_iter()
                    .filter(|id| !loaded.contains(id))
                    .collect::<Vec<_>>();

                load_users_in_groups(&cache, &pending, &produce, &repaint).await;
                loaded.extend(pending);
            }

            // no grouping and no loaded-set for threads
            Request::Threads(ids) => {
                for id in ids {
                    let (cache, tx, repaint) = (cache.clone(), produce.clone(), repaint.clone());
                    tokio::spawn(async move {
                        if let Some(thread) = cache.get_thread(&id).await {
                            let _ = tx.send_async(Fetched::Thread { id, thread }).await;
                            repaint.repaint();
                        }
                    });
                }
            }
        }
    }
}

/// One group at a time: every member is started together and awaited to
/// settlement before the next group is scheduled after [`GROUP_DELAY`].
async fn load_users_in_groups<B: Backend>(
    cache: &Cache<B>,
    ids: &[String],
    produce: &flume::Sender<Fetched>,
    repaint: &impl Repaint,
) {
    let mut groups = ids.chunks(USER_GROUP_SIZE).peekable();

    while let Some(group) = groups.next() {
        let handles = group
            .iter()
            .cloned()
            .map(|id| {
                let (cache, tx, repaint) = (cache.clone(), produce.clone(), repaint.clone());
                tokio::spawn(async move {
                    if let Some(user) = cache.get_user(&id).await {
                        let _ = tx.send_async(Fetched::User { id, user }).await;
                        repaint.repaint();
                    }
                })
            })
            .collect::<Vec<_>>();

        // a single failed member never aborts the group
        for handle in handles {
            let _ = handle.await;
        }

        if groups.peek().is_some() {
            tokio::time::sleep(GROUP_DELAY).await;
        }
    }
}
