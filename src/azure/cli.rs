//! Azure CLI command execution.
//!
//! Runs `az` with an explicit argument list, so KQL queries containing quotes
//! and pipes are passed through untouched.

use colored::Colorize;
use std::error::Error;
use std::process::Command;

/// Upper bound on a single `az` response.
const MAX_STDOUT_BYTES: usize = 64 * 1024 * 1024;

/// Run `az <args>` and return its stdout.
///
/// # Arguments
/// * `args` - Arguments after `az`
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If `az` cannot be started, exits non-zero or produces too much output
pub fn run_az(args: &[&str]) -> Result<String, Box<dyn Error>> {
    let cmd = command_line("az", args);
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let output = Command::new("az").args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute az: {}", e)
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running az: {}", stderr.trim()).into());
    }

    log::debug!("Success output.stdout.len(): {}", output.stdout.len());
    if output.stdout.len() > MAX_STDOUT_BYTES {
        return Err(format!(
            "Response too large: {} bytes for command: {cmd}",
            output.stdout.len()
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;
    Ok(stdout)
}

/// Printable form of a command line, quoting arguments that contain whitespace.
fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('\'');
            line.push_str(&arg.replace('\'', "'\\''"));
            line.push('\'');
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_plain() {
        assert_eq!(
            command_line("az", &["graph", "query", "--first", "1000"]),
            "az graph query --first 1000"
        );
    }

    #[test]
    fn test_command_line_quotes_whitespace() {
        assert_eq!(
            command_line("az", &["graph", "query", "-q", "resources | take 1"]),
            "az graph query -q 'resources | take 1'"
        );
    }

    #[test]
    fn test_command_line_embedded_quote_and_empty() {
        assert_eq!(
            command_line("az", &["-q", "where name == 'x' ", ""]),
            "az -q 'where name == '\\''x'\\'' ' ''"
        );
    }
}
