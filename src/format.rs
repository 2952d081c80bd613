//! Chat reply rendering (Telegram Markdown)

use crate::models::{Forecast, ForecastResult, climate_condition};

/// Labels of the day blocks, in order
pub const DAY_LABELS: [&str; 3] = ["Hoje", "Amanhã", "Depois de amanhã"];

/// Emoji plus description of a forecast's weather.
///
/// The scraped description wins over the table text. Unknown codes render
/// as an empty string.
#[must_use]
pub fn friendly_climate(forecast: &Forecast) -> String {
    let condition = climate_condition(&forecast.climate);
    let emoji = condition.map_or("", |c| c.emoji);
    let description = match forecast.description.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => condition.map_or("", |c| c.description),
    };

    [emoji, description]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Backslash-escape the characters legacy Telegram Markdown treats as entity markers
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One `*label*: ...` block
#[must_use]
pub fn day_block(forecast: &Forecast, label: &str) -> String {
    format!(
        "*{}*: {}\nMín. {}ºC, Máx. {}ºC, UV {}\n",
        label,
        escape_markdown(&friendly_climate(forecast)),
        escape_markdown(&forecast.min),
        escape_markdown(&forecast.max),
        escape_markdown(&forecast.uv)
    )
}

/// Full reply: city header followed by today, tomorrow and the day after.
#[must_use]
pub fn forecast_text(result: &ForecastResult) -> String {
    let mut text = format!(
        "{}, {}\n",
        escape_markdown(&result.name),
        escape_markdown(&result.state)
    );
    for (forecast, label) in result.forecasts.iter().zip(DAY_LABELS) {
        text.push_str(&day_block(forecast, label));
    }
    text
}
