//! version command - Print the version

use crate::exit_code::ExitCode;

use super::Context;

/// Execute the version command
pub fn execute(ctx: &Context) -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");

    if ctx.formatter.is_json() {
        ctx.formatter.json(&serde_json::json!({ "version": version }));
    } else {
        ctx.formatter.println(&format!("Version: {version}"));
    }

    ExitCode::Success
}
