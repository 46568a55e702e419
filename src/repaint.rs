/// Lets background tasks wake the UI when new data lands.
pub trait Repaint: Clone + Send + Sync + 'static {
    fn repaint(&self) {}
}

impl Repaint for egui::Context {
    fn repaint(&self) {
        self.request_repaint()
    }
}

// for tests and headless use
impl Repaint for () {}
