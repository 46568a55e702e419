use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::api::{Backend, DiscordUser, ThreadInfo};

/// Page-lifetime record cache, one partition per entity kind. Entries are
/// inserted on the first successful fetch and never evicted. Failed fetches
/// are not cached, so a later lookup retries.
///
/// The partition lock is released before the fetch is awaited, so two
/// concurrent misses for the same id both hit the backend and the later
/// insert wins. Records are immutable for the session, which makes the
/// redundant fetch harmless.
pub struct Cache<B> {
    backend: B,
    users: Arc<Mutex<HashMap<String, DiscordUser>>>,
    threads: Arc<Mutex<HashMap<String, ThreadInfo>>>,
}

impl<B: Clone> Clone for Cache<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            users: Arc::clone(&self.users),
            threads: Arc::clone(&self.threads),
        }
    }
}

impl<B: Backend> Cache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            users: <_>::default(),
            threads: <_>::default(),
        }
    }

    pub async fn get_user(&self, id: &str) -> Option<DiscordUser> {
        if let Some(user) = self.users.lock().await.get(id) {
            return Some(user.clone());
        }

        match self.backend.fetch_user(id).await {
            Ok(user) => {
                self.users
                    .lock()
                    .await
                    .insert(id.to_string(), user.clone());
                Some(user)
            }
            Err(err) => {
                eprintln!("cannot fetch user {id}: {err}");
                None
            }
        }
    }

    pub async fn get_thread(&self, id: &str) -> Option<ThreadInfo> {
        if let Some(thread) = self.threads.lock().await.get(id) {
            return Some(thread.clone());
        }

        match self.backend.fetch_thread(id).await {
            Ok(thread) => {
                self.threads
                    .lock()
                    .await
                    .insert(id.to_string(), thread.clone());
                Some(thread)
            }
            Err(err) => {
                eprintln!("cannot fetch thread {id}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[derive(Clone)]
    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                calls: <_>::default(),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Backend for Counting {
        fn fetch_user(
            &self,
            id: &str,
        ) -> impl Future<Output = anyhow::Result<DiscordUser>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (fail, id) = (self.fail, id.to_string());
            async move {
                anyhow::ensure!(!fail, "backend down");
                Ok(DiscordUser {
                    username: format!("user{id}"),
                    display_name: None,
                    avatar_url: format!("https://cdn.example/{id}.png"),
                })
            }
        }

        fn fetch_thread(
            &self,
            id: &str,
        ) -> impl Future<Output = anyhow::Result<ThreadInfo>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (fail, id) = (self.fail, id.to_string());
            async move {
                anyhow::ensure!(!fail, "backend down");
                Ok(ThreadInfo {
                    name: Some(format!("thread {id}")),
                    created_at: "2024-01-01T00:00:00Z".to_string(),
                    url: format!("https://discord.com/channels/0/0/{id}"),
                })
            }
        }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_the_cache() {
        let backend = Counting::new(false);
        let cache = Cache::new(backend.clone());

        let first = cache.get_user("123").await.unwrap();
        assert_eq!(first.username, "user123");
        assert_eq!(backend.calls(), 1);

        let second = cache.get_user("123").await.unwrap();
        assert_eq!(second.username, "user123");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let backend = Counting::new(true);
        let cache = Cache::new(backend.clone());

        assert!(cache.get_user("123").await.is_none());
        assert!(cache.get_user("123").await.is_none());

        // both lookups went back to the backend
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn partitions_are_independent() {
        let backend = Counting::new(false);
        let cache = Cache::new(backend.clone());

        // a user and a thread sharing an id are distinct entries
        assert!(cache.get_user("7").await.is_some());
        assert!(cache.get_thread("7").await.is_some());
        assert_eq!(backend.calls(), 2);

        assert!(cache.get_thread("7").await.is_some());
        assert_eq!(backend.calls(), 2);
    }
}
