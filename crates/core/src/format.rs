use crate::models::{PlaceEntry, PlacesResult, WeatherReport};

/// Renders a places lookup as its message followed by one `- name` line per
/// entry. Entries keep the order the collaborator ranked them in.
pub fn render_places(result: &PlacesResult) -> String {
    let entries = match result.payload.as_deref() {
        Some(entries) if !entries.is_empty() => entries,
        _ => return result.message.clone(),
    };

    let mut lines = vec![result.message.clone()];
    lines.extend(
        entries
            .iter()
            .map(display_name)
            .filter(|name| !name.is_empty())
            .map(|name| format!("- {name}")),
    );
    lines.join("\n")
}

/// The structured name wins, then the wiki title.
pub fn display_name(entry: &PlaceEntry) -> &str {
    let name = entry.name.trim();
    if !name.is_empty() {
        return name;
    }

    entry
        .wiki_title
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
}

pub fn render_weather(report: &WeatherReport, place: &str) -> String {
    format!(
        "In {} it's currently {:.1}°C with a {}% chance of rain.",
        place, report.temperature_c, report.rain_chance_pct
    )
}
