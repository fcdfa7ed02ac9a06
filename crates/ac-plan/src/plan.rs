//! The plan aggregate.

use ac_domain::error::{Error, Result};
use ac_eventlog::EventPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::step::{PlanStep, StepStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub pct: f64,
    pub current: Option<usize>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub objective: String,
    pub steps: Vec<PlanStep>,
    pub current_index: usize,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    /// All steps Pending; `current_index = 0`; first step (if any) set to
    /// InProgress. A zero-step plan is immediately complete.
    pub fn create(
        id: String,
        title: impl Into<String>,
        objective: impl Into<String>,
        step_descriptions: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut steps: Vec<PlanStep> = step_descriptions
            .into_iter()
            .enumerate()
            .map(|(i, desc)| PlanStep::new(i, desc))
            .collect();
        let complete = steps.is_empty();
        if let Some(first) = steps.first_mut() {
            first.start(now);
        }
        Self {
            id,
            title: title.into(),
            objective: objective.into(),
            steps,
            current_index: 0,
            complete,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current_step(&self) -> Option<&PlanStep> {
        self.steps.get(self.current_index)
    }

    /// Marks the current step Completed, advances `current_index`, starts
    /// the next step. Returns `None` once the plan is complete.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<&PlanStep> {
        if self.complete {
            return None;
        }
        if let Some(step) = self.steps.get_mut(self.current_index) {
            if !step.status.is_terminal() {
                step.complete(now);
            }
        }
        self.current_index += 1;
        self.updated_at = now;
        if self.current_index >= self.steps.len() {
            self.complete = true;
            return None;
        }
        if let Some(next) = self.steps.get_mut(self.current_index) {
            next.start(now);
        }
        self.steps.get(self.current_index)
    }

    pub fn set_status(&mut self, index: usize, status: StepStatus, notes: Option<String>, now: DateTime<Utc>) -> Result<()> {
        let step = self
            .steps
            .get_mut(index)
            .ok_or_else(|| Error::Other(format!("plan step {index} out of range")))?;
        if !step.status.can_transition_to(status) {
            return Err(Error::IllegalTransition(format!(
                "step {index}: {:?} -> {:?}",
                step.status, status
            )));
        }
        step.status = status;
        step.notes = notes;
        match status {
            StepStatus::InProgress if step.started_at.is_none() => step.started_at = Some(now),
            StepStatus::Completed => step.completed_at = Some(now),
            _ => {}
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn progress(&self) -> Progress {
        let total = self.steps.len();
        let completed = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed || s.status == StepStatus::Skipped)
            .count();
        let pct = if total == 0 { 100.0 } else { (completed as f64 / total as f64) * 100.0 };
        Progress {
            completed,
            total,
            pct,
            current: if self.complete { None } else { Some(self.current_index) },
            complete: self.complete,
        }
    }

    /// `N. <status-icon> <description>` per step, current step prefixed `→`.
    pub fn to_pseudocode(&self) -> String {
        let mut lines = vec![format!("Plan: {} — {}", self.title, self.objective)];
        for (i, step) in self.steps.iter().enumerate() {
            lines.push(step.to_pseudocode(i == self.current_index && !self.complete));
        }
        lines.join("\n")
    }

    pub fn to_event_payload(&self) -> EventPayload {
        EventPayload::Plan {
            plan_id: self.id.clone(),
            title: self.title.clone(),
            step_descriptions: self.steps.iter().map(|s| s.description.clone()).collect(),
            step_statuses: self.steps.iter().map(|s| s.status.into()).collect(),
            current_index: self.current_index,
            complete: self.complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn zero_step_plan_is_immediately_complete() {
        let plan = Plan::create("p1".into(), "t", "o", vec![], ts());
        assert!(plan.complete);
    }

    #[test]
    fn advance_walks_through_steps_then_completes() {
        let mut plan = Plan::create(
            "p1".into(),
            "t",
            "o",
            vec!["a".into(), "b".into()],
            ts(),
        );
        assert_eq!(plan.steps[0].status, StepStatus::InProgress);
        let next = plan.advance(ts()).cloned();
        assert!(next.is_some());
        assert_eq!(plan.steps[0].status, StepStatus::Completed);
        assert_eq!(plan.current_index, 1);
        let none = plan.advance(ts());
        assert!(none.is_none());
        assert!(plan.complete);
    }

    #[test]
    fn at_most_one_step_in_progress() {
        let plan = Plan::create("p1".into(), "t", "o", vec!["a".into(), "b".into(), "c".into()], ts());
        let in_progress = plan.steps.iter().filter(|s| s.status == StepStatus::InProgress).count();
        assert_eq!(in_progress, 1);
    }
}
