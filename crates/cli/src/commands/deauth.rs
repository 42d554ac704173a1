//! deauth command - Remove the stored credentials

use crate::exit_code::ExitCode;

use super::Context;

/// Execute the deauth command
pub fn execute(ctx: &Context) -> ExitCode {
    let path = ctx.credentials.path().display().to_string();

    match ctx.credentials.remove() {
        Ok(true) => {
            if ctx.formatter.is_json() {
                ctx.formatter
                    .json(&serde_json::json!({"status": "success", "removed": path}));
            } else {
                ctx.formatter.success(&format!("Removed {path}"));
            }
            ExitCode::Success
        }
        Ok(false) => {
            if ctx.formatter.is_json() {
                ctx.formatter
                    .json(&serde_json::json!({"status": "success", "removed": null}));
            } else {
                ctx.formatter.println("No stored credentials.");
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}
