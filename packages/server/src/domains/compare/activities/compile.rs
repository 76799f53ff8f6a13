//! Compile research records into one comparison.

use anyhow::{Context, Result};
use openai_client::Message;
use serde_json::Value;
use tracing::info;

use crate::common::extract_json_or_error;
use crate::kernel::{ModelRequest, ServerDeps};

/// User message embedding the ordered records.
pub fn compile_message(records: &[Value]) -> Result<String> {
    let payload = serde_json::to_string_pretty(records).context("Failed to encode item records")?;
    Ok(format!(
        "Compile a comparison of these items, in this order:\n{}",
        payload
    ))
}

/// One model call, no search tool. Returns the compiled object, or an
/// `{error, raw}` record when the output is not JSON.
///
/// Transport failures propagate.
pub async fn compile_comparison(records: &[Value], deps: &ServerDeps) -> Result<Value> {
    let request = ModelRequest::new(vec![
        Message::system(deps.prompts.compile.clone()),
        Message::user(compile_message(records)?),
    ]);

    let response = deps
        .ai
        .respond(request)
        .await
        .context("Comparison compile call failed")?;

    info!(count = records.len(), "Comparison compiled");
    Ok(extract_json_or_error(&response.text))
}
