use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    OffsetDateTime,
};

const LOCALE_DATE: &[FormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

const DAY_MS: f64 = 86_400_000.0;

pub fn format_date(raw: &str) -> String {
    format_date_at(raw, OffsetDateTime::now_utc())
}

// relative for anything under a week, a plain date after that. unparsable
// input is passed through untouched
pub fn format_date_at(raw: &str, now: OffsetDateTime) -> String {
    if raw.is_empty() {
        return "Unknown".to_string();
    }

    let Ok(date) = OffsetDateTime::parse(raw, &Rfc3339) else {
        return raw.to_string();
    };

    let diff = (now - date).abs();
    let days = (diff.whole_milliseconds() as f64 / DAY_MS).ceil() as i64;

    match days {
        1 => "Yesterday".to_string(),
        n if n < 7 => format!("{n} days ago"),
        _ => date.format(LOCALE_DATE).unwrap_or_else(|_| raw.to_string()),
    }
}

pub fn star_rating(rating: f64) -> String {
    if rating == 0.0 {
        return "No rating".to_string();
    }

    // ratings are 0..=10, stars are out of 5
    let stars = rating / 2.0;
    let full = stars.floor() as usize;
    let half = usize::from(stars.fract() >= 0.5);
    let empty = 5usize.saturating_sub(full + half);

    let mut out = "⭐".repeat(full);
    if half == 1 {
        out.push('✨');
    }
    out.push_str(&"☆".repeat(empty));

    format!("{out} ({rating:.1}/10)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn now() -> OffsetDateTime {
        OffsetDateTime::parse("2024-06-15T12:00:00Z", &Rfc3339).unwrap()
    }

    #[test]
    fn yesterday() {
        assert_eq!(format_date_at("2024-06-14T12:00:00Z", now()), "Yesterday");
    }

    #[test]
    fn days_ago() {
        assert_eq!(format_date_at("2024-06-12T12:00:00Z", now()), "3 days ago");
    }

    #[test]
    fn older_dates_use_the_plain_form() {
        let raw = (now() - Duration::days(10)).format(&Rfc3339).unwrap();
        assert_eq!(format_date_at(&raw, now()), "6/5/2024");
    }

    #[test]
    fn unparsable_input_is_returned_unchanged() {
        assert_eq!(format_date_at("not a date", now()), "not a date");
    }

    #[test]
    fn empty_input() {
        assert_eq!(format_date_at("", now()), "Unknown");
    }

    #[test]
    fn zero_rating() {
        assert_eq!(star_rating(0.0), "No rating");
    }

    #[test]
    fn full_marks() {
        assert_eq!(star_rating(10.0), "⭐⭐⭐⭐⭐ (10.0/10)");
    }

    #[test]
    fn half_stars() {
        assert_eq!(star_rating(7.0), "⭐⭐⭐✨☆ (7.0/10)");
    }
}
