//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): aligned text for terminals
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use resilience_core::{TestPlan, ResilienceConfig};
use resilience_driver::testing::{LinkAction, ReferenceScript};
use resilience_driver::{DriverError, Verdict};
use serde_json::{json, Value};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format the exchange of a passing run for `plan`.
pub fn format_plan(plan: &TestPlan, config: &ResilienceConfig, mode: OutputMode) -> String {
    let script = ReferenceScript::for_plan(plan);
    let params = config.delay_params();
    match mode {
        OutputMode::Json => {
            let steps: Vec<Value> = script
                .steps()
                .iter()
                .map(|step| {
                    json!({
                        "event": step.event.label.as_str(),
                        "actions": step.actions.iter().map(action_text).collect::<Vec<_>>(),
                        "delayed": step.delayed,
                    })
                })
                .collect();
            pretty(json!({
                "profile": plan.profile().name(),
                "targets": plan.targets().iter().map(|t| t.to_string()).collect::<Vec<_>>(),
                "reset_count": plan.reset_count(),
                "total_resets": plan.total_resets(),
                "delay_min_secs": params.min().as_secs_f64(),
                "delay_max_secs": params.max().as_secs_f64(),
                "steps": steps,
            }))
        }
        OutputMode::Human => {
            let targets: Vec<String> = plan.targets().iter().map(|t| t.to_string()).collect();
            let mut out = format!(
                "profile:  {}\ntargets:  {}\nresets:   {} per target, {} total\ndelay:    {:.1}s..{:.1}s before each reset after a write\n\n",
                plan.profile(),
                targets.join(", "),
                plan.reset_count(),
                plan.total_resets(),
                params.min().as_secs_f64(),
                params.max().as_secs_f64(),
            );
            for (i, step) in script.steps().iter().enumerate() {
                let actions: Vec<String> = step
                    .actions
                    .iter()
                    .map(|a| {
                        if step.delayed && *a == LinkAction::Reset {
                            format!("(delay) {}", action_text(a))
                        } else {
                            action_text(a)
                        }
                    })
                    .collect();
                out.push_str(&format!(
                    "{:>4}) {:<15} -> {}\n",
                    i + 1,
                    step.event.label.as_str(),
                    actions.join(", ")
                ));
            }
            out.trim_end().to_string()
        }
    }
}

/// Format a passing replay.
pub fn format_verdict(verdict: &Verdict, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(json!({
            "result": "pass",
            "events_delivered": verdict.events_delivered,
            "events_ignored": verdict.events_ignored,
            "resets": verdict.resets,
            "targets_completed": verdict.targets_completed,
        })),
        OutputMode::Human => {
            let mut out = format!(
                "PASS: {} target(s) survived {} reset(s) ({} events)",
                verdict.targets_completed, verdict.resets, verdict.events_delivered
            );
            if verdict.events_ignored > 0 {
                out.push_str(&format!(
                    "\n{} event(s) after exit were ignored",
                    verdict.events_ignored
                ));
            }
            out
        }
    }
}

/// Format a failed replay.
pub fn format_failure(err: &DriverError, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let mut body = json!({
                "result": "fail",
                "error": err.to_string(),
            });
            if let Some(v) = err.violation() {
                body["expected"] = json!(v.expected.as_str());
                body["received"] = json!(v.received.as_str());
                body["target"] = json!(v.target);
                body["cycle"] = json!(v.cycle);
            }
            pretty(body)
        }
        OutputMode::Human => format!("FAIL: {}", err),
    }
}

/// Format any other error.
pub fn format_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(json!({ "error": message })),
        OutputMode::Human => format!("(error) {}", message),
    }
}

fn action_text(action: &LinkAction) -> String {
    match action {
        LinkAction::Command(cmd) => cmd.to_string(),
        LinkAction::Reset => "reset".to_string(),
    }
}

fn pretty(value: Value) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
