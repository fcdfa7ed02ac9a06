//! Todo recitation: periodic re-injection of plan progress to counteract
//! attention decay over long tool-call loops.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct TodoState {
    pub remaining: Vec<String>,
    pub completed: Vec<String>,
    pub notes: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct TodoRecitation {
    state: TodoState,
    pub update_frequency: usize,
}

impl TodoRecitation {
    pub fn new(update_frequency: usize) -> Self {
        Self {
            state: TodoState::default(),
            update_frequency: update_frequency.max(1),
        }
    }

    pub fn update(&mut self, remaining: Vec<String>, completed: Vec<String>, now: DateTime<Utc>) {
        self.state.remaining = remaining;
        self.state.completed = completed;
        self.state.last_updated = Some(now);
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.state.notes.push(note.into());
    }

    /// After the 3rd, 6th, 9th... step when `update_frequency = 3`.
    pub fn should_recite(&self, step_counter: usize) -> bool {
        step_counter > 0 && step_counter % self.update_frequency == 0
    }

    /// `[CURRENT PROGRESS]` block: remaining count, next 3 items, fraction
    /// complete.
    pub fn to_recitation_string(&self) -> String {
        let total = self.state.remaining.len() + self.state.completed.len();
        let pct = if total == 0 {
            100.0
        } else {
            (self.state.completed.len() as f64 / total as f64) * 100.0
        };
        let mut lines = vec![format!(
            "[CURRENT PROGRESS] {} remaining, {:.0}% complete",
            self.state.remaining.len(),
            pct
        )];
        for item in self.state.remaining.iter().take(3) {
            lines.push(format!("- {item}"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn recites_on_multiples_of_update_frequency() {
        let recitation = TodoRecitation::new(3);
        assert!(!recitation.should_recite(1));
        assert!(!recitation.should_recite(2));
        assert!(recitation.should_recite(3));
        assert!(!recitation.should_recite(4));
        assert!(recitation.should_recite(6));
        assert!(recitation.should_recite(9));
    }

    #[test]
    fn recitation_string_lists_up_to_three_remaining_items() {
        let mut recitation = TodoRecitation::new(3);
        recitation.update(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["done".into()],
            ts(),
        );
        let text = recitation.to_recitation_string();
        assert!(text.contains("4 remaining"));
        assert_eq!(text.lines().count(), 4); // header + 3 items
    }
}
