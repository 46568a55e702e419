/// Attaches a tooltip to whatever the UI toolkit hands back for an element.
pub trait Tooltip {
    fn tooltip(self, text: &str) -> Self;
}

impl Tooltip for egui::Response {
    fn tooltip(self, text: &str) -> Self {
        self.on_hover_text(text)
    }
}

pub const RATING_TOOLTIP: &str = "User rating based on reviews";

/// Derives a stat tooltip from the stat's own label.
pub fn stat_tooltip(label: &str) -> String {
    format!("Total {}", label.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_tooltips_come_from_the_label() {
        assert_eq!(stat_tooltip("Reviews"), "Total reviews");
        assert_eq!(stat_tooltip("Reviews Given"), "Total reviews given");
    }
}
