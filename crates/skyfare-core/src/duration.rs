use regex::Regex;

use crate::PLACEHOLDER;

/// Total minutes of an ISO-8601 style duration (`PT2H30M`, `PT45M`, `PT9H`).
///
/// Comparing the raw strings lexicographically mis-sorts `PT9H` after
/// `PT10H`, so every comparison in this crate goes through the parsed value.
pub fn parse_minutes(duration: &str) -> Option<u32> {
    let re = Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?$").unwrap();
    let caps = re.captures(duration.trim())?;

    let hours: u32 = caps.get(1).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let minutes: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).ok()?;

    // "PT" alone carries no information; treat it as unparseable.
    if caps.get(1).is_none() && caps.get(2).is_none() {
        return None;
    }

    Some(hours * 60 + minutes)
}

/// Human-readable form: `PT2H30M` -> `2h 30m`. Unparseable input renders as
/// the placeholder.
pub fn pretty(duration: &str) -> String {
    match parse_minutes(duration) {
        Some(total) => format!("{}h {}m", total / 60, total % 60),
        None => PLACEHOLDER.to_string(),
    }
}
