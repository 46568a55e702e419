use std::path::Path;

use serde::Deserialize;

use crate::cards::{Cards, ThreadCard, UserCard};

/// Initial card data. The server that renders the web flavor of this
/// dashboard owns the equivalent markup; here a small JSON export stands in.
#[derive(Default, Debug, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<UserSeed>,
    #[serde(default)]
    pub threads: Vec<ThreadSeed>,
}

#[derive(Debug, Deserialize)]
pub struct UserSeed {
    pub user_id: String,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub reviews_given: u32,
    #[serde(default)]
    pub search_terms: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadSeed {
    pub thread_id: String,
}

impl Seed {
    pub fn load(path: impl AsRef<Path>) -> Self {
        std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .ok()
            .map(std::io::BufReader::new)
            .and_then(|mut fi| serde_json::from_reader(&mut fi).ok())
            .unwrap_or_default()
    }

    pub fn into_cards(self) -> Cards {
        let users = self
            .users
            .into_iter()
            .map(|seed| {
                let mut card = UserCard::new(seed.user_id);
                if !seed.search_terms.is_empty() {
                    card.search_terms = format!("{} {}", card.search_terms, seed.search_terms);
                }
                card.avg_rating = seed.avg_rating;
                card.total_reviews = seed.total_reviews;
                card.reviews_given = seed.reviews_given;
                card
            })
            .collect();

        let threads = self
            .threads
            .into_iter()
            .map(|seed| ThreadCard::new(seed.thread_id))
            .collect();

        Cards { users, threads }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_keep_the_raw_id_searchable() {
        let seed: Seed = serde_json::from_str(
            r#"{
                "users": [
                    { "user_id": "123", "avg_rating": 7.5, "total_reviews": 4, "search_terms": "alice" }
                ],
                "threads": [ { "thread_id": "9" } ]
            }"#,
        )
        .unwrap();

        let cards = seed.into_cards();
        assert_eq!(cards.users[0].search_terms, "123 alice");
        assert_eq!(cards.users[0].avg_rating, 7.5);
        assert_eq!(cards.threads[0].name, "Loading…");
    }

    #[test]
    fn a_missing_file_yields_an_empty_seed() {
        let seed = Seed::load("/does/not/exist.json");
        assert!(seed.users.is_empty());
        assert!(seed.threads.is_empty());
    }
}
