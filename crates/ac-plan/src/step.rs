//! Plan step state machine.

use ac_eventlog::PlanStepStatusLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
    Skipped,
}

impl StepStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }

    pub fn status_icon(self) -> &'static str {
        match self {
            StepStatus::Pending => "[ ]",
            StepStatus::InProgress => "[→]",
            StepStatus::Completed => "[✓]",
            StepStatus::Blocked => "[!]",
            StepStatus::Skipped => "[-]",
        }
    }

    /// Pending → InProgress → {Completed | Blocked | Skipped}; Blocked may
    /// re-enter InProgress on replan. Completed and Skipped are terminal.
    pub fn can_transition_to(self, next: StepStatus) -> bool {
        use StepStatus::*;
        match (self, next) {
            (Pending, InProgress) => true,
            (InProgress, Completed | Blocked | Skipped) => true,
            (Blocked, InProgress) => true,
            (s, n) if s == n => true,
            _ => false,
        }
    }
}

impl From<StepStatus> for PlanStepStatusLabel {
    fn from(status: StepStatus) -> Self {
        match status {
            StepStatus::Pending => PlanStepStatusLabel::Pending,
            StepStatus::InProgress => PlanStepStatusLabel::InProgress,
            StepStatus::Completed => PlanStepStatusLabel::Completed,
            StepStatus::Blocked => PlanStepStatusLabel::Blocked,
            StepStatus::Skipped => PlanStepStatusLabel::Skipped,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub index: usize,
    pub description: String,
    pub status: StepStatus,
    pub notes: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dependencies: Vec<usize>,
}

impl PlanStep {
    pub fn new(index: usize, description: impl Into<String>) -> Self {
        Self {
            index,
            description: description.into(),
            status: StepStatus::Pending,
            notes: None,
            started_at: None,
            completed_at: None,
            dependencies: Vec::new(),
        }
    }

    pub fn start(&mut self, at: DateTime<Utc>) {
        self.status = StepStatus::InProgress;
        self.started_at = Some(at);
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.status = StepStatus::Completed;
        self.completed_at = Some(at);
    }

    pub fn block(&mut self, notes: Option<String>) {
        self.status = StepStatus::Blocked;
        self.notes = notes;
    }

    pub fn to_pseudocode(&self, is_current: bool) -> String {
        let marker = if is_current { "→ " } else { "" };
        format!(
            "{}{}. {} {}",
            marker,
            self.index + 1,
            self.status.status_icon(),
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_step_may_re_enter_in_progress_on_replan() {
        assert!(StepStatus::Blocked.can_transition_to(StepStatus::InProgress));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(!StepStatus::Completed.can_transition_to(StepStatus::InProgress));
        assert!(StepStatus::Completed.is_terminal());
    }

    #[test]
    fn pending_cannot_skip_directly_to_completed() {
        assert!(!StepStatus::Pending.can_transition_to(StepStatus::Completed));
    }
}
