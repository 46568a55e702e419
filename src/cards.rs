use crate::api::{DiscordUser, ThreadInfo};

/// One rendered user entry. `search_terms` always carries the raw user id so
/// the search filter can match on it before any record has loaded.
#[derive(Debug)]
pub struct UserCard {
    pub user_id: String,
    pub search_terms: String,
    pub username: String,
    pub discriminator: String,
    pub avatar_url: Option<String>,
    pub avatar_alt: String,
    pub avg_rating: f64,
    pub total_reviews: u32,
    pub reviews_given: u32,
    pub visible: bool,
}

impl UserCard {
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            search_terms: user_id.clone(),
            username: "Loading…".to_string(),
            discriminator: String::new(),
            avatar_url: None,
            avatar_alt: String::new(),
            avg_rating: 0.0,
            total_reviews: 0,
            reviews_given: 0,
            visible: true,
            user_id,
        }
    }
}

#[derive(Debug)]
pub struct ThreadCard {
    pub thread_id: String,
    pub name: String,
    pub created: String,
    pub url: Option<String>,
    pub visible: bool,
}

impl ThreadCard {
    pub fn new(thread_id: impl Into<String>) -> Self {
        let thread_id = thread_id.into();
        Self {
            name: "Loading…".to_string(),
            created: String::new(),
            url: None,
            visible: true,
            thread_id,
        }
    }
}

/// The card store. Stand-in for the rendered page: loaders patch it, the
/// search filter toggles visibility on it, the UI draws whatever is in it.
#[derive(Default, Debug)]
pub struct Cards {
    pub users: Vec<UserCard>,
    pub threads: Vec<ThreadCard>,
}

impl Cards {
    /// Distinct user ids in discovery order.
    pub fn user_ids(&self) -> Vec<String> {
        Self::distinct(self.users.iter().map(|card| &card.user_id))
    }

    /// Distinct thread ids in discovery order.
    pub fn thread_ids(&self) -> Vec<String> {
        Self::distinct(self.threads.iter().map(|card| &card.thread_id))
    }

    fn distinct<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        ids.filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    /// Applies a fetched user record to every card tagged with `id`.
    pub fn patch_user(&mut self, id: &str, user: &DiscordUser) {
        for card in self.users.iter_mut().filter(|card| card.user_id == id) {
            card.avatar_url = Some(user.avatar_url.clone());
            card.avatar_alt = user.username.clone();

            card.username = user
                .display_name
                .clone()
                .unwrap_or_else(|| user.username.clone());

            card.discriminator = format!("@{}", user.username);
        }

        // make the fetched names searchable on cards that mention this id
        for card in self
            .users
            .iter_mut()
            .filter(|card| card.search_terms.contains(id))
        {
            card.search_terms.push(' ');
            card.search_terms.push_str(&user.username);
            if let Some(display_name) = &user.display_name {
                card.search_terms.push(' ');
                card.search_terms.push_str(display_name);
            }
        }
    }

    /// Applies a fetched thread record to every card tagged with `id`.
    pub fn patch_thread(&mut self, id: &str, thread: &ThreadInfo) {
        for card in self.threads.iter_mut().filter(|card| card.thread_id == id) {
            card.name = thread
                .name
                .clone()
                .unwrap_or_else(|| format!("Thread {id}"));

            card.created = format!("Created {}", crate::util::format_date(&thread.created_at));
            card.url = Some(thread.url.clone());
        }
    }
}
