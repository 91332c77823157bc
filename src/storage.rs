use chrono::{DateTime, Local};

/// Exit code recorded when the command could not be run at all.
pub const SPAWN_ERROR_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub timestamp: DateTime<Local>, // When the run finished
    pub stdout: String,             // Standard output
    pub stderr: String,             // Standard error output
    pub exit_code: i32,             // Exit code, SPAWN_ERROR_EXIT_CODE if the command never ran
    pub duration_ms: u64,           // Execution duration (milliseconds)
    pub error: Option<String>,      // Spawn or wait failure, None for a normal (even non-zero) exit
}

impl Execution {
    /// Combined output: stdout, stderr, or both joined by a newline.
    pub fn output(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        format!("{}\n{}", self.stdout, self.stderr)
    }

    pub fn failed(&self) -> bool {
        self.exit_code != 0
    }

    #[cfg(test)]
    pub fn with_output(stdout: &str) -> Self {
        Self {
            timestamp: Local::now(),
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: 0,
            duration_ms: 0,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_prefers_whichever_stream_is_present() {
        let mut exec = Execution::with_output("out");
        assert_eq!(exec.output(), "out");

        exec.stderr = "err".to_string();
        assert_eq!(exec.output(), "out\nerr");

        exec.stdout.clear();
        assert_eq!(exec.output(), "err");
    }

    #[test]
    fn failed_reflects_exit_code() {
        let mut exec = Execution::with_output("");
        assert!(!exec.failed());
        exec.exit_code = 2;
        assert!(exec.failed());
    }
}
