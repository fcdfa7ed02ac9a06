//! `ac-agent run` — one-shot execution against the in-memory stub backend.
//!
//! There is no real LLM or tool integration wired into this binary: it
//! exists so the core can be exercised and inspected during development.

use std::sync::Arc;

use ac_datasource::DatasourceRegistry;
use ac_domain::config::Config;
use ac_knowledge::KnowledgeRegistry;
use ac_llm::stub::{ScriptedLlm, ScriptedReply};
use ac_loop::AgentLoop;
use ac_tools::stub::FixedTool;
use ac_tools::{ToolCatalog, ToolOutput};

fn stub_llm() -> Arc<ScriptedLlm> {
    Arc::new(ScriptedLlm::new(vec![
        ScriptedReply::content("TITLE: Stub run\nOBJECTIVE: acknowledge the request\n1. acknowledge and terminate\n"),
        ScriptedReply::tool_call("c1", "terminate", "{}"),
    ]))
}

fn stub_tools() -> Arc<ToolCatalog> {
    let catalog = ToolCatalog::new();
    catalog.add(Arc::new(FixedTool::new("terminate", "ends the run").with_output(ToolOutput::ok(
        "Request acknowledged (stub mode — no LLM or tool backend is wired into this binary).",
    ))));
    Arc::new(catalog)
}

pub async fn run(config: Config, message: String, json_output: bool) -> anyhow::Result<()> {
    let mut agent = AgentLoop::new(
        config,
        stub_llm(),
        stub_tools(),
        Arc::new(KnowledgeRegistry::with_defaults(5)),
        Arc::new(DatasourceRegistry::with_defaults()),
    );

    let summary = agent.run(&message).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if let Some(text) = &summary.final_message {
            println!("{text}");
        }
        for result in &summary.tool_results {
            match &result.error {
                Some(err) => println!("[tool: {}] error: {err}", result.tool_name),
                None => println!("[tool: {}] {}", result.tool_name, result.output),
            }
        }
        if let Some(progress) = &summary.plan_progress {
            println!(
                "plan: {}/{} steps complete ({:.0}%){}",
                progress.completed,
                progress.total,
                progress.pct,
                if summary.truncated { ", truncated at step budget" } else { "" }
            );
        }
    }

    Ok(())
}
