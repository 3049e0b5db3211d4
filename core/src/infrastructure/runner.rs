//! Shell command execution for the metric collector.
//!
//! `CommandRunner` is the seam the collector spawns commands through.
//! `ShellRunner` runs each command line with `sh -c` so pipelines work.

use std::process::Command;

/// Runs one shell command line and returns its stdout, or a failure reason.
pub trait CommandRunner {
    fn run(&self, cmd: &str) -> Result<String, String>;
}

/// Production runner that spawns `sh -c <cmd>`.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str) -> Result<String, String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .output()
            .map_err(|e| format!("failed to execute `{}`: {}", cmd, e))?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Err(format!("`{}` exited with {}", cmd, output.status))
        } else {
            Err(format!("`{}` exited with {}: {}", cmd, output.status, stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_runner_captures_stdout() {
        let out = ShellRunner.run("printf 'pi-zero\\n'").unwrap();
        assert_eq!(out, "pi-zero\n");
    }

    #[test]
    fn shell_runner_supports_pipelines() {
        let out = ShellRunner.run("echo '10.0.0.7 fe80::1' | cut -d' ' -f1").unwrap();
        assert_eq!(out.trim_end(), "10.0.0.7");
    }

    #[test]
    fn shell_runner_reports_nonzero_exit() {
        let err = ShellRunner.run("exit 3").unwrap_err();
        assert!(err.contains("exit"), "unexpected reason: {}", err);
    }

    #[test]
    fn shell_runner_includes_stderr() {
        let err = ShellRunner.run("echo boom >&2; exit 1").unwrap_err();
        assert!(err.ends_with("boom"), "unexpected reason: {}", err);
    }
}
