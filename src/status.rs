// ============================================================================
// STATUS LINE
// ============================================================================

use std::collections::VecDeque;

use chrono::{DateTime, Local};

const HISTORY: usize = 32;

/// Timestamped status messages shown along the bottom of the panel.
#[derive(Debug, Clone)]
pub struct StatusLine {
    current: String,
    history: VecDeque<String>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            current: "System Ready".to_string(),
            history: VecDeque::with_capacity(HISTORY),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, message: impl AsRef<str>) {
        self.post_at(Local::now(), message);
    }

    pub fn post_at(&mut self, at: DateTime<Local>, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{message}");
        let line = format!("{} - {}", at.format("%H:%M:%S"), message);
        if self.history.len() == HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(line.clone());
        self.current = line;
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Posted lines, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn starts_ready() {
        assert_eq!(StatusLine::new().current(), "System Ready");
    }

    #[test]
    fn messages_are_timestamped() {
        let mut status = StatusLine::new();
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 7, 3).unwrap();
        status.post_at(at, "TV turned ON");
        assert_eq!(status.current(), "09:07:03 - TV turned ON");
    }

    #[test]
    fn history_is_bounded() {
        let mut status = StatusLine::new();
        for i in 0..40 {
            status.post(format!("message {i}"));
        }
        let history: Vec<_> = status.history().collect();
        assert_eq!(history.len(), HISTORY);
        assert!(history[0].ends_with("message 8"));
        assert!(status.current().ends_with("message 39"));
    }
}
