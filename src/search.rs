use std::time::{Duration, Instant};

use crate::{cards::UserCard, debounce::Debouncer};

pub const SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Debounced substring filter over the user cards. Edits feed the debouncer;
/// the frame loop polls it and a quiet 300ms later the filter runs. The
/// results label only exists once a pass has happened, like the counter the
/// page creates on first use.
pub struct SearchFilter {
    debounce: Debouncer<String>,
    results: Option<String>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            debounce: Debouncer::new(SEARCH_DELAY),
            results: None,
        }
    }
}

impl SearchFilter {
    pub fn edited(&mut self, query: &str, now: Instant) {
        self.debounce.call(query.to_string(), now);
    }

    pub fn poll(&mut self, now: Instant, cards: &mut [UserCard]) {
        if let Some(query) = self.debounce.poll(now) {
            let count = apply(&query, cards);
            self.results = Some(results_label(count));
        }
    }

    pub fn results(&self) -> Option<&str> {
        self.results.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }
}

/// Runs one filter pass, toggling card visibility. Returns the visible count.
pub fn apply(query: &str, cards: &mut [UserCard]) -> usize {
    let term = query.trim().to_lowercase();

    let mut visible = 0;
    for card in cards {
        card.visible = term.is_empty()
            || card.search_terms.to_lowercase().contains(&term)
            || card.username.to_lowercase().contains(&term)
            || card.user_id.to_lowercase().contains(&term);
        visible += usize::from(card.visible);
    }
    visible
}

pub fn results_label(count: usize) -> String {
    format!("{count} result{}", if count != 1 { "s" } else { "" })
}
