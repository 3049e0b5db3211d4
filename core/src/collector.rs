//! Metric collector: hostname, IP, CPU load and memory usage as display text.
//!
//! Each metric is one shell command line whose trimmed stdout is shown
//! verbatim on the panel. The four commands run in a fixed order and the
//! first failure aborts the whole snapshot.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::infrastructure::runner::{CommandRunner, ShellRunner};

/// One iteration's worth of metric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub hostname: String,
    pub ip: String,
    pub cpu: String,
    pub mem: String,
}

/// Anything that can produce a fresh `MetricSnapshot`.
pub trait MetricSource {
    fn collect(&self) -> Result<MetricSnapshot>;
}

/// Shell command line for each metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricCommands {
    pub hostname: String,
    pub ip: String,
    pub cpu: String,
    pub mem: String,
}

impl Default for MetricCommands {
    fn default() -> Self {
        MetricCommands {
            hostname: "hostname".into(),
            ip: "hostname -I | cut -d' ' -f1".into(),
            cpu: r#"top -bn1 | grep load | awk '{printf "CPU Load: %.2f", $(NF-2)}'"#.into(),
            mem: r#"free -m | awk 'NR==2{printf "Mem: %s/%sMB %.2f%%", $3,$2,$3*100/$2 }'"#
                .into(),
        }
    }
}

/// Production source: runs each metric command through a `CommandRunner`.
pub struct ShellMetricSource {
    runner: Box<dyn CommandRunner>,
    commands: MetricCommands,
}

impl ShellMetricSource {
    pub fn new(commands: MetricCommands) -> Self {
        Self::with_runner(commands, Box::new(ShellRunner))
    }

    pub fn with_runner(commands: MetricCommands, runner: Box<dyn CommandRunner>) -> Self {
        ShellMetricSource { runner, commands }
    }

    fn run_metric(&self, metric: &str, cmd: &str) -> Result<String> {
        let out = self
            .runner
            .run(cmd)
            .map_err(|reason| MonitorError::collection(metric, reason))?;
        Ok(out.trim_end().to_string())
    }
}

impl MetricSource for ShellMetricSource {
    fn collect(&self) -> Result<MetricSnapshot> {
        let snapshot = MetricSnapshot {
            hostname: self.run_metric("hostname", &self.commands.hostname)?,
            ip: self.run_metric("ip", &self.commands.ip)?,
            cpu: self.run_metric("cpu", &self.commands.cpu)?,
            mem: self.run_metric("mem", &self.commands.mem)?,
        };
        debug!(?snapshot, "collected metrics");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::ScriptedRunner;

    fn source_with(replies: Vec<std::result::Result<String, String>>) -> (ShellMetricSource, ScriptedRunner) {
        let runner = ScriptedRunner::new(replies);
        let source = ShellMetricSource::with_runner(MetricCommands::default(), Box::new(runner.clone()));
        (source, runner)
    }

    #[test]
    fn collects_trimmed_strings_in_order() {
        let (source, runner) = source_with(vec![
            Ok("raspberrypi\n".into()),
            Ok("192.168.1.20\n".into()),
            Ok("CPU Load: 0.42".into()),
            Ok("Mem: 210/926MB 22.68%".into()),
        ]);
        let snap = source.collect().unwrap();
        assert_eq!(snap.hostname, "raspberrypi");
        assert_eq!(snap.ip, "192.168.1.20");
        assert_eq!(snap.cpu, "CPU Load: 0.42");
        assert_eq!(snap.mem, "Mem: 210/926MB 22.68%");

        let defaults = MetricCommands::default();
        assert_eq!(
            runner.commands(),
            vec![defaults.hostname, defaults.ip, defaults.cpu, defaults.mem]
        );
    }

    #[test]
    fn first_failure_aborts_snapshot() {
        let (source, runner) = source_with(vec![
            Ok("raspberrypi".into()),
            Err("hostname: invalid option -- 'I'".into()),
        ]);
        let err = source.collect().unwrap_err();
        match err {
            MonitorError::Collection { metric, reason } => {
                assert_eq!(metric, "ip");
                assert!(reason.contains("invalid option"));
            }
            other => panic!("expected collection error, got {:?}", other),
        }
        // cpu and mem never ran
        assert_eq!(runner.commands().len(), 2);
    }

    #[test]
    fn failure_on_last_metric_is_still_fatal() {
        let (source, _) = source_with(vec![
            Ok("pi".into()),
            Ok("10.0.0.1".into()),
            Ok("CPU Load: 1.00".into()),
            Err("free: command not found".into()),
        ]);
        let err = source.collect().unwrap_err();
        assert!(err.is_collection());
        assert!(err.to_string().contains("mem"));
    }

    #[test]
    fn default_commands_match_panel_format() {
        let cmds = MetricCommands::default();
        assert_eq!(cmds.hostname, "hostname");
        assert!(cmds.ip.starts_with("hostname -I"));
        assert!(cmds.cpu.contains("CPU Load: %.2f"));
        assert!(cmds.mem.contains("Mem: %s/%sMB"));
    }

    #[test]
    fn real_shell_commands_run() {
        let cmds = MetricCommands {
            hostname: "echo testhost".into(),
            ip: "echo '10.1.2.3 10.9.9.9' | cut -d' ' -f1".into(),
            cpu: "printf 'CPU Load: %.2f' 0.5".into(),
            mem: "printf 'Mem: 1/2MB 50.00%%'".into(),
        };
        let snap = ShellMetricSource::new(cmds).collect().unwrap();
        assert_eq!(snap.hostname, "testhost");
        assert_eq!(snap.ip, "10.1.2.3");
        assert_eq!(snap.cpu, "CPU Load: 0.50");
        assert_eq!(snap.mem, "Mem: 1/2MB 50.00%");
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let snap = MetricSnapshot {
            hostname: "pi".into(),
            ip: "10.0.0.1".into(),
            cpu: "CPU Load: 0.10".into(),
            mem: "Mem: 1/2MB 50.00%".into(),
        };
        let json = serde_json::to_string(&snap).unwrap();
        let back: MetricSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
