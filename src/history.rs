use std::collections::VecDeque;

use crate::jokeapi::JokeRecord;

/// Bounded list of recently fetched jokes, most recent first.
///
/// Owned by the UI layer; the poller only produces records.
pub struct JokeHistory {
    entries: VecDeque<JokeRecord>,
    capacity: usize,
}

impl JokeHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Prepend a record, evicting the oldest past capacity.
    pub fn push(&mut self, record: JokeRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.capacity);
    }

    /// Apply a new cap, evicting immediately if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &JokeRecord> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&JokeRecord> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> JokeRecord {
        JokeRecord {
            text: format!("joke {n}"),
            category: "Misc".to_string(),
            timestamp: "01:00 PM".to_string(),
            id: n.to_string(),
        }
    }

    #[test]
    fn test_history_keeps_most_recent_first() {
        let mut history = JokeHistory::new(3);
        for n in 0..5 {
            history.push(record(n));
        }

        assert_eq!(history.len(), 3);
        let texts: Vec<&str> = history.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["joke 4", "joke 3", "joke 2"]);
    }

    #[test]
    fn test_shrinking_capacity_evicts() {
        let mut history = JokeHistory::new(10);
        for n in 0..6 {
            history.push(record(n));
        }

        history.set_capacity(2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().text, "joke 5");
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut history = JokeHistory::new(0);
        history.push(record(1));
        assert_eq!(history.len(), 1);
    }
}
