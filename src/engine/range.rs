/// An optional inclusive `[start, end]` date window.
///
/// Bounds are ISO `YYYY-MM-DD` strings compared lexicographically, which is
/// chronological order for that format. An empty/absent bound is unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    start: Option<String>,
    end: Option<String>,
}

impl DateRange {
    /// Build a range from two optional bound strings; blank strings count as
    /// absent bounds.
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        let bound = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            start: bound(start),
            end: bound(end),
        }
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    /// No bounds at all — callers use this to skip filtering entirely.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` lies inside the window.
    ///
    /// An absent/empty date is never in range, even an unbounded one: a
    /// record with no date cannot satisfy a dated query. This strictness is
    /// deliberate — do not relax it to default-true.
    pub fn contains(&self, date: Option<&str>) -> bool {
        let date = match date {
            Some(d) if !d.is_empty() => d,
            _ => return false,
        };

        let after_start = self.start.as_deref().is_none_or(|s| date >= s);
        let before_end = self.end.as_deref().is_none_or(|e| date <= e);

        after_start && before_end
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_contains_any_dated_value() {
        let range = DateRange::new(None, None);
        assert!(range.is_unbounded());
        assert!(range.contains(Some("2024-01-01")));
        assert!(range.contains(Some("1970-01-01")));
    }

    #[test]
    fn absent_date_is_never_in_range() {
        let unbounded = DateRange::new(None, None);
        let bounded = DateRange::new(Some("2024-01-01"), Some("2024-12-31"));
        assert!(!unbounded.contains(None));
        assert!(!unbounded.contains(Some("")));
        assert!(!bounded.contains(None));
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::new(Some("2024-01-01"), Some("2024-01-31"));
        assert!(range.contains(Some("2024-01-01")));
        assert!(range.contains(Some("2024-01-31")));
        assert!(range.contains(Some("2024-01-15")));
        assert!(!range.contains(Some("2023-12-31")));
        assert!(!range.contains(Some("2024-02-01")));
    }

    #[test]
    fn half_open_ranges() {
        let from = DateRange::new(Some("2024-06-01"), None);
        assert!(from.contains(Some("2030-01-01")));
        assert!(!from.contains(Some("2024-05-31")));

        let until = DateRange::new(None, Some("2024-06-01"));
        assert!(until.contains(Some("1999-01-01")));
        assert!(!until.contains(Some("2024-06-02")));
    }

    #[test]
    fn blank_bounds_are_unbounded() {
        let range = DateRange::new(Some("  "), Some(""));
        assert!(range.is_unbounded());
        assert!(range.contains(Some("2024-01-01")));
    }
}
