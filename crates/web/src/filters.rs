//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a 0-5 rating as filled and empty stars.
///
/// Non-numeric input renders as five empty stars.
///
/// Usage in templates: `{{ review.rating|stars }}`
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_bar(&rating.to_string()))
}

/// Formats an average rating with one decimal place.
///
/// Usage in templates: `{{ business.rating|one_decimal }}`
#[askama::filter_fn]
pub fn one_decimal(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let text = value.to_string();
    Ok(text
        .parse::<f64>()
        .map_or(text, |v| format!("{v:.1}")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
fn star_bar(value: &str) -> String {
    let filled = value
        .trim()
        .parse::<f64>()
        .map_or(0, |v| v.round().clamp(0.0, 5.0) as usize);
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_bar() {
        assert_eq!(star_bar("5"), "★★★★★");
        assert_eq!(star_bar("3"), "★★★☆☆");
        assert_eq!(star_bar("4.6"), "★★★★★");
        assert_eq!(star_bar("9"), "★★★★★");
        assert_eq!(star_bar("n/a"), "☆☆☆☆☆");
    }
}
