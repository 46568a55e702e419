use std::time::{Duration, Instant};

use eframe::NativeOptions;
use egui::{vec2, CentralPanel, ScrollArea, TextEdit, TopBottomPanel};

mod api;

mod avatar;

mod cache;
use cache::Cache;

mod cards;
use cards::Cards;

mod debounce;

mod fetcher;
use fetcher::DataFetcher;

mod repaint;
use repaint::Repaint;

mod runtime;

mod search;
use search::SearchFilter;

mod seed;
use seed::Seed;

mod theme;
use theme::{SystemTheme, ThemeWatcher};

mod tooltip;
use tooltip::Tooltip;

mod util;

const THEME_POLL_INTERVAL: Duration = Duration::from_secs(1);

struct Application {
    cards: Cards,
    fetcher: DataFetcher,
    avatars: avatar::Cache,
    search: SearchFilter,
    query: String,
    theme: ThemeWatcher,
    theme_signal: SystemTheme,
    theme_checked: Option<Instant>,
}

impl Application {
    fn new(cards: Cards, client: api::Client, repaint: egui::Context) -> Self {
        let fetcher = DataFetcher::spawn(Cache::new(client), repaint.clone());

        // kick off loading for everything the seed put on screen
        fetcher.request_users(cards.user_ids());
        fetcher.request_threads(cards.thread_ids());

        Self {
            avatars: avatar::Cache::new(avatar::Loader::spawn(repaint)),
            cards,
            fetcher,
            search: SearchFilter::default(),
            query: String::new(),
            theme: ThemeWatcher::default(),
            theme_signal: SystemTheme,
            theme_checked: None,
        }
    }

    fn poll_theme(&mut self, ctx: &egui::Context, now: Instant) {
        let due = self
            .theme_checked
            .map_or(true, |last| now - last >= THEME_POLL_INTERVAL);
        if !due {
            return;
        }

        self.theme.poll(&self.theme_signal, ctx);
        self.theme_checked = Some(now);
    }

    fn show_search(&mut self, ui: &mut egui::Ui, now: Instant) {
        let resp = ui.add(
            TextEdit::singleline(&mut self.query)
                .hint_text("Search users")
                .desired_width(f32::INFINITY),
        );
        if resp.changed() {
            self.search.edited(&self.query, now);
        }

        if let Some(results) = self.search.results() {
            ui.small(results);
        }
    }

    fn show_user_cards(&mut self, ui: &mut egui::Ui) {
        let Self { cards, avatars, .. } = self;

        for card in cards.users.iter().filter(|card| card.visible) {
            ui.horizontal(|ui| {
                match card.avatar_url.as_deref().and_then(|url| avatars.get(url)) {
                    Some(img) => {
                        img.show_size(ui, vec2(32.0, 32.0)).tooltip(&card.avatar_alt);
                    }
                    None => {
                        ui.add_sized(vec2(32.0, 32.0), egui::Spinner::new());
                    }
                }

                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.heading(&card.username);
                        ui.small(&card.discriminator);
                    });

                    ui.label(util::star_rating(card.avg_rating))
                        .tooltip(tooltip::RATING_TOOLTIP);

                    ui.horizontal(|ui| {
                        Self::stat_item(ui, "Reviews", card.total_reviews);
                        Self::stat_item(ui, "Reviews Given", card.reviews_given);
                    });
                });
            });
            ui.separator();
        }
    }

    fn stat_item(ui: &mut egui::Ui, label: &str, value: u32) {
        ui.vertical(|ui| {
            ui.strong(value.to_string());
            ui.small(label);
        })
        .response
        .tooltip(&tooltip::stat_tooltip(label));
    }

    fn show_thread_cards(&mut self, ui: &mut egui::Ui) {
        for card in self.cards.threads.iter().filter(|card| card.visible) {
            ui.vertical(|ui| {
                ui.strong(&card.name);
                if !card.created.is_empty() {
                    ui.small(&card.created);
                }
                if let Some(url) = &card.url {
                    ui.hyperlink_to("Open thread", url);
                }
            });
            ui.separator();
        }
    }
}

impl eframe::App for Application {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.poll_theme(ctx, now);
        self.fetcher.poll(&mut self.cards);
        self.avatars.poll();

        TopBottomPanel::top("search").show(ctx, |ui| {
            self.show_search(ui, now);
        });

        self.search.poll(now, &mut self.cards.users);
        if self.search.is_pending() {
            ctx.request_repaint_after(search::SEARCH_DELAY);
        }

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                self.show_user_cards(ui);

                if !self.cards.threads.is_empty() {
                    ui.heading("Threads");
                    ui.separator();
                    self.show_thread_cards(ui);
                }
            });
        });
    }
}

fn get_var(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("could not find key '{key}' in env"))
}

// the analog of the page-level error listeners: nothing recovers, but
// nothing dies silently either
fn install_panic_log() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("unhandled error: {info}");
        hook(info);
    }));
}

fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from([".dev.env", ".env"]);
    install_panic_log();

    let wait = runtime::start();

    let base = get_var("REVDECK_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
    let seed_path = get_var("REVDECK_SEED").unwrap_or_else(|_| "seed.json".to_string());

    let client = api::Client::new(base)?;
    let cards = Seed::load(seed_path).into_cards();

    eframe::run_native(
        "revdeck",
        NativeOptions::default(),
        Box::new(move |cc| Box::new(Application::new(cards, client, cc.egui_ctx.clone()))),
    );

    wait();
    Ok(())
}
