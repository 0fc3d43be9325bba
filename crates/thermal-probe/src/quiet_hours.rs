use chrono::NaiveTime;

/// Daily window during which probing is suppressed.
///
/// Start is inclusive, end exclusive. A window whose start is after its end
/// spans midnight (22:00 – 07:00 covers 22:00 through 06:59:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}
