/// Where the dark-mode preference comes from. Injected so the watcher can be
/// exercised without a desktop environment.
pub trait DarkModeSignal {
    fn prefers_dark(&self) -> Option<bool>;
}

/// System preference via the OS hooks.
pub struct SystemTheme;

impl DarkModeSignal for SystemTheme {
    fn prefers_dark(&self) -> Option<bool> {
        match dark_light::detect() {
            dark_light::Mode::Dark => Some(true),
            dark_light::Mode::Light => Some(false),
            dark_light::Mode::Default => None,
        }
    }
}

/// Applies the preferred visuals on the first frame and flips them whenever
/// the preference changes for the rest of the process lifetime.
#[derive(Default)]
pub struct ThemeWatcher {
    applied: Option<bool>,
}

impl ThemeWatcher {
    pub fn poll(&mut self, signal: &impl DarkModeSignal, ctx: &egui::Context) {
        let Some(dark) = signal.prefers_dark() else { return };
        if self.applied == Some(dark) {
            return;
        }

        ctx.set_visuals(if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        self.applied = Some(dark);
    }
}
