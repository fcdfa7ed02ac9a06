//! The plan-creation subroutine: asks the LLM for a plan, parses its reply,
//! and falls back to a default three-step plan if parsing yields no steps.

use ac_domain::message::Message;
use ac_domain::Result;
use ac_llm::LlmProvider;
use chrono::{DateTime, Utc};

use crate::plan::Plan;

pub struct Planner<'a> {
    llm: &'a dyn LlmProvider,
}

const DEFAULT_STEPS: [&str; 3] = ["analyze the request", "execute the necessary actions", "verify the outcome"];

impl<'a> Planner<'a> {
    pub fn new(llm: &'a dyn LlmProvider) -> Self {
        Self { llm }
    }

    /// Propagates any error from the LLM call itself (including
    /// `LlmFatal`, which must reach the caller rather than be absorbed
    /// here); only a *successful* reply that yields no parseable steps
    /// falls back to `DEFAULT_STEPS`.
    pub async fn create_plan(&self, id: String, request: &str, context: Option<&str>, now: DateTime<Utc>) -> Result<Plan> {
        let prompt = build_planning_prompt(request, context);
        let reply = self.llm.ask(&[Message::user(prompt)], &[], None).await?;
        let (title, objective, steps) = parse_plan_response(&reply);
        let steps = if steps.is_empty() {
            DEFAULT_STEPS.iter().map(|s| s.to_string()).collect()
        } else {
            steps
        };
        let title = title.unwrap_or_else(|| "Untitled plan".to_string());
        let objective = objective.unwrap_or_else(|| request.to_string());
        Ok(Plan::create(id, title, objective, steps, now))
    }
}

fn build_planning_prompt(request: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "Produce a plan for the following request.\n\
         Reply with a `TITLE:` line, an `OBJECTIVE:` line, and a numbered list of steps.\n\n\
         Request: {request}\n"
    );
    if let Some(ctx) = context {
        prompt.push_str(&format!("\nContext:\n{ctx}\n"));
    }
    prompt
}

/// Parses a planner reply: title from the first `TITLE:` line, objective
/// from the first `OBJECTIVE:` line, steps from lines beginning with a
/// digit followed by `.`. Strips leading status markers from step text.
fn parse_plan_response(reply: &str) -> (Option<String>, Option<String>, Vec<String>) {
    let mut title = None;
    let mut objective = None;
    let mut steps = Vec::new();

    for line in reply.lines() {
        let trimmed = line.trim();
        if title.is_none() {
            if let Some(rest) = trimmed.strip_prefix("TITLE:") {
                title = Some(rest.trim().to_string());
                continue;
            }
        }
        if objective.is_none() {
            if let Some(rest) = trimmed.strip_prefix("OBJECTIVE:") {
                objective = Some(rest.trim().to_string());
                continue;
            }
        }
        if let Some(step_text) = parse_numbered_step(trimmed) {
            steps.push(strip_status_marker(&step_text));
        }
    }

    (title, objective, steps)
}

/// Matches `<digits>.` at the start of the line, returning the remainder.
fn parse_numbered_step(line: &str) -> Option<String> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let rest = &line[digits_end..];
    let rest = rest.strip_prefix('.')?;
    Some(rest.trim().to_string())
}

fn strip_status_marker(text: &str) -> String {
    for marker in ["[ ]", "[→]", "[✓]", "[!]", "[-]"] {
        if let Some(rest) = text.strip_prefix(marker) {
            return rest.trim().to_string();
        }
    }
    text.to_string()
}
