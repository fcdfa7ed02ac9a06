//! The Plan Store: holds the current plan plus a bounded archive.

use std::collections::VecDeque;

use ac_domain::Result;
use chrono::{DateTime, Utc};

use crate::plan::Plan;
use crate::planner::Planner;

const FAILURE_LEXEMES: [&str; 5] = ["error", "failed", "unable", "cannot", "blocked"];

pub struct PlanStore {
    current: Option<Plan>,
    /// Archived plans, oldest-first, capped at `history_cap`. `current` is
    /// never evicted by this cap.
    history: VecDeque<Plan>,
    history_cap: usize,
    pub replan_on_error: bool,
}

impl PlanStore {
    pub fn new(history_cap: usize, replan_on_error: bool) -> Self {
        Self {
            current: None,
            history: VecDeque::new(),
            history_cap,
            replan_on_error,
        }
    }

    pub fn current(&self) -> Option<&Plan> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Plan> {
        self.current.as_mut()
    }

    pub fn history(&self) -> &VecDeque<Plan> {
        &self.history
    }

    pub async fn create(&mut self, planner: &Planner<'_>, id: String, request: &str, context: Option<&str>, now: DateTime<Utc>) -> Result<&Plan> {
        let plan = planner.create_plan(id, request, context, now).await?;
        self.current = Some(plan);
        Ok(self.current.as_ref().unwrap())
    }

    /// True when `replan_on_error` is set and the observation text contains
    /// any failure lexeme, case-insensitively.
    pub fn should_replan(&self, observation_text: &str) -> bool {
        if !self.replan_on_error {
            return false;
        }
        let lower = observation_text.to_lowercase();
        FAILURE_LEXEMES.iter().any(|lexeme| lower.contains(lexeme))
    }

    /// Archives the current plan (`complete = true`), creates a new one via
    /// the planning subroutine, and records both in `history`.
    pub async fn replan(&mut self, planner: &Planner<'_>, new_id: String, reason: &str, request: &str, now: DateTime<Utc>) -> Result<&Plan> {
        if let Some(mut old) = self.current.take() {
            old.complete = true;
            old.updated_at = now;
            self.push_history(old);
        }
        let context = format!("Replanning because: {reason}");
        let plan = planner.create_plan(new_id, request, Some(&context), now).await?;
        self.current = Some(plan);
        Ok(self.current.as_ref().unwrap())
    }

    fn push_history(&mut self, plan: Plan) {
        self.history.push_back(plan);
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_llm::stub::{ScriptedLlm, ScriptedReply};

    fn ts() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn should_replan_matches_failure_lexemes_case_insensitively() {
        let store = PlanStore::new(20, true);
        assert!(store.should_replan("Network UNREACHABLE: connection Failed"));
        assert!(!store.should_replan("all good"));
    }

    #[tokio::test]
    async fn should_replan_false_when_disabled() {
        let store = PlanStore::new(20, false);
        assert!(!store.should_replan("error: boom"));
    }

    #[tokio::test]
    async fn replan_archives_old_plan_with_complete_true_and_fresh_id() {
        let llm = ScriptedLlm::new(vec![
            ScriptedReply::content("TITLE: t\nOBJECTIVE: o\n1. a\n"),
            ScriptedReply::content("TITLE: t2\nOBJECTIVE: o2\n1. b\n"),
        ]);
        let planner = Planner::new(&llm);
        let mut store = PlanStore::new(20, true);
        store.create(&planner, "p1".into(), "do x", None, ts()).await.unwrap();
        let old_id = store.current().unwrap().id.clone();
        store.replan(&planner, "p2".into(), "network unreachable", "do x", ts()).await.unwrap();
        assert_eq!(store.current().unwrap().id, "p2");
        assert_ne!(store.current().unwrap().id, old_id);
        assert_eq!(store.history().len(), 1);
        assert!(store.history()[0].complete);
        assert_eq!(store.history()[0].id, old_id);
    }

    #[tokio::test]
    async fn history_is_capped_oldest_first_eviction() {
        let llm = ScriptedLlm::new(vec![ScriptedReply::content("TITLE: t\nOBJECTIVE: o\n1. a\n")]);
        let planner = Planner::new(&llm);
        let mut store = PlanStore::new(2, true);
        store.create(&planner, "p0".into(), "x", None, ts()).await.unwrap();
        for i in 1..=3 {
            store.replan(&planner, format!("p{i}"), "error", "x", ts()).await.unwrap();
        }
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[0].id, "p1");
    }
}
