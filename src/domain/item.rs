use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record fetched verbatim from one of the upstream APIs.
///
/// Items are matched by [`item_id`](FeedItem::item_id) everywhere: the live
/// feed, the saved sets and the replacement logic never compare by value.
pub trait FeedItem: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn item_id(&self) -> i64;

    fn title(&self) -> &str;

    /// Browser URL of the item.
    fn link(&self) -> &str;

    /// Author, owner or poster.
    fn byline(&self) -> &str;

    /// Compact one-line counters shown next to the title.
    fn stats_line(&self) -> String;

    /// Longer lines for the preview pane.
    fn details(&self) -> Vec<String>;
}

/// A sort option offered by a provider.
pub trait SortKey: Copy + Eq + Debug + Send + Sync + 'static {
    fn all() -> &'static [Self];

    /// Human label for menus and the status bar.
    fn label(self) -> &'static str;

    /// Stable machine name used on the command line.
    fn name(self) -> &'static str;

    fn next(self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|s| *s == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == s || k.label().to_lowercase() == s)
    }
}

/// Whether a feed is showing the provider's default sample or a filtered
/// search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Discovery,
    Search,
}

/// Render a timestamp relative to `now`, e.g. "3 days ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }

    let (value, unit) = match secs {
        0..=44 => return "a few seconds ago".to_string(),
        45..=3_599 => ((secs + 30) / 60, "minute"),
        3_600..=86_399 => ((secs + 1_800) / 3_600, "hour"),
        86_400..=2_591_999 => ((secs + 43_200) / 86_400, "day"),
        2_592_000..=31_535_999 => ((secs + 1_296_000) / 2_592_000, "month"),
        _ => ((secs + 15_768_000) / 31_536_000, "year"),
    };

    if value <= 1 {
        let article = if unit == "hour" { "an" } else { "a" };
        format!("{} {} ago", article, unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}
