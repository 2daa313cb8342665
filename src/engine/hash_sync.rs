use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?(\d{4})-(\d{2})-(\d{2})$").expect("fragment pattern is valid")
});

pub fn format_fragment(date: NaiveDate) -> String {
    format!("#{}", date.format("%Y-%m-%d"))
}

/// Strict `YYYY-MM-DD` (leading `#` optional) naming a real calendar day.
pub fn parse_fragment(raw: &str) -> Option<NaiveDate> {
    let caps = FRAGMENT_RE.captures(raw.trim())?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Fragment part of a pasted link: everything after the first `#`, or the
/// whole input when it has no `#` at all.
pub fn fragment_of(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    match link.split_once('#') {
        Some((_, fragment)) if fragment.is_empty() => None,
        Some((_, fragment)) => Some(format!("#{fragment}")),
        None => Some(link.to_string()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentAction {
    Navigate(NaiveDate),
    /// Absent or malformed fragment.
    Today,
    /// Echo of a fragment we wrote ourselves.
    Ignore,
}

/// Mirror of the shareable location: a history of fragments with a current
/// position. Our own writes replace the current entry and are remembered so
/// the change notification they cause is swallowed.
pub struct HashSync {
    base_url: String,
    entries: Vec<Option<String>>,
    index: usize,
    echo: Option<String>,
}

impl HashSync {
    pub fn new(base_url: &str, initial: Option<String>) -> Self {
        Self {
            base_url: base_url.to_string(),
            entries: vec![initial],
            index: 0,
            echo: None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries[self.index].as_deref()
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn share_link(&self) -> String {
        format!("{}{}", self.base_url, self.current().unwrap_or(""))
    }

    /// Record a selection. Replaces the current entry; never adds history.
    pub fn publish(&mut self, date: NaiveDate) {
        let fragment = format_fragment(date);
        if self.current() == Some(fragment.as_str()) {
            return;
        }
        self.entries[self.index] = Some(fragment.clone());
        self.echo = Some(fragment);
    }

    /// Interpret a change notification for the location fragment.
    pub fn on_fragment_change(&mut self, fragment: Option<&str>) -> FragmentAction {
        if let (Some(echo), Some(seen)) = (self.echo.as_deref(), fragment) {
            if echo == seen {
                self.echo = None;
                return FragmentAction::Ignore;
            }
        }
        self.echo = None;
        match fragment.and_then(parse_fragment) {
            Some(date) => FragmentAction::Navigate(date),
            None => {
                if let Some(bad) = fragment {
                    log::info!("ignoring malformed fragment {bad:?}, showing today");
                }
                FragmentAction::Today
            }
        }
    }

    /// The user opened a link: new history entry, then handled as an
    /// external change.
    pub fn open_link(&mut self, link: &str) -> FragmentAction {
        let fragment = fragment_of(link);
        self.entries.truncate(self.index + 1);
        self.entries.push(fragment.clone());
        self.index += 1;
        self.on_fragment_change(fragment.as_deref())
    }

    pub fn back(&mut self) -> Option<FragmentAction> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        let fragment = self.entries[self.index].clone();
        Some(self.on_fragment_change(fragment.as_deref()))
    }

    pub fn forward(&mut self) -> Option<FragmentAction> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        let fragment = self.entries[self.index].clone();
        Some(self.on_fragment_change(fragment.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn format_is_zero_padded() {
        assert_eq!(format_fragment(d(2026, 3, 4)), "#2026-03-04");
    }

    #[test]
    fn format_then_parse_is_identity() {
        for date in [d(2026, 1, 1), d(2026, 2, 28), d(2028, 2, 29), d(2026, 12, 31)] {
            assert_eq!(parse_fragment(&format_fragment(date)), Some(date));
        }
    }

    #[test]
    fn parse_is_strict() {
        assert_eq!(parse_fragment("2026-03-04"), Some(d(2026, 3, 4)));
        assert_eq!(parse_fragment("#2026-3-4"), None);
        assert_eq!(parse_fragment("#2026-03-04x"), None);
        assert_eq!(parse_fragment("##2026-03-04"), None);
        assert_eq!(parse_fragment("#2026-02-30"), None);
        assert_eq!(parse_fragment("#26-03-04"), None);
        assert_eq!(parse_fragment(""), None);
    }

    #[test]
    fn fragment_extracted_from_links() {
        assert_eq!(
            fragment_of("https://example.org/daily/#2026-03-04").as_deref(),
            Some("#2026-03-04")
        );
        assert_eq!(fragment_of("2026-03-04").as_deref(), Some("2026-03-04"));
        assert_eq!(fragment_of("https://example.org/#"), None);
        assert_eq!(fragment_of("   "), None);
    }

    #[test]
    fn publish_replaces_without_history() {
        let mut sync = HashSync::new("https://example.org/", None);
        sync.publish(d(2026, 1, 2));
        sync.publish(d(2026, 1, 3));
        assert_eq!(sync.history_len(), 1);
        assert_eq!(sync.current(), Some("#2026-01-03"));
        assert_eq!(sync.share_link(), "https://example.org/#2026-01-03");
    }

    #[test]
    fn own_write_is_not_treated_as_navigation() {
        let mut sync = HashSync::new("", None);
        sync.publish(d(2026, 1, 2));
        assert_eq!(
            sync.on_fragment_change(Some("#2026-01-02")),
            FragmentAction::Ignore
        );
        // A later identical external change is honoured again.
        assert_eq!(
            sync.on_fragment_change(Some("#2026-01-02")),
            FragmentAction::Navigate(d(2026, 1, 2))
        );
    }

    #[test]
    fn malformed_or_missing_falls_back_to_today() {
        let mut sync = HashSync::new("", None);
        assert_eq!(sync.on_fragment_change(Some("#tomorrow")), FragmentAction::Today);
        assert_eq!(sync.on_fragment_change(None), FragmentAction::Today);
    }

    #[test]
    fn open_link_adds_history_and_back_forward_replay() {
        let mut sync = HashSync::new("", Some("#2026-01-01".to_string()));
        assert_eq!(
            sync.open_link("https://x/#2026-02-01"),
            FragmentAction::Navigate(d(2026, 2, 1))
        );
        assert_eq!(sync.history_len(), 2);
        assert_eq!(sync.back(), Some(FragmentAction::Navigate(d(2026, 1, 1))));
        assert_eq!(sync.back(), None);
        assert_eq!(sync.forward(), Some(FragmentAction::Navigate(d(2026, 2, 1))));
        assert_eq!(sync.forward(), None);
    }

    #[test]
    fn open_link_after_back_drops_forward_entries() {
        let mut sync = HashSync::new("", Some("#2026-01-01".to_string()));
        sync.open_link("#2026-02-01");
        sync.back();
        sync.open_link("#2026-03-01");
        assert_eq!(sync.history_len(), 2);
        assert_eq!(sync.forward(), None);
    }
}
