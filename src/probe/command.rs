//! External command execution with a time budget.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::RawResult;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long pipe readers get to finish after a timed-out child is killed.
const READER_GRACE: Duration = Duration::from_millis(500);

/// Run `program` with `args`, killing it once `timeout` elapses.
///
/// A program that cannot be found is `Unavailable`. A non-zero exit, a
/// spawn error other than not-found, or a timeout is `Failed`. Tools that
/// print their version on stderr only (older Pythons) still yield output.
///
/// On timeout only the direct child is killed. Grandchildren it started
/// keep running; if they hold the output pipes past `READER_GRACE`, the
/// reader threads are left detached.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> RawResult {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return RawResult::unavailable(format!("{} not found", program));
        }
        Err(e) => return RawResult::failed(format!("failed to start {}: {}", program, e)),
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_handle = thread::spawn(move || read_pipe(stdout));
    let stderr_handle = thread::spawn(move || read_pipe(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                let grace = Instant::now() + READER_GRACE;
                for handle in [stdout_handle, stderr_handle] {
                    while !handle.is_finished() && Instant::now() < grace {
                        thread::sleep(POLL_INTERVAL);
                    }
                    if handle.is_finished() {
                        let _ = handle.join();
                    }
                }
                return RawResult::failed(format!(
                    "{} timed out after {}s",
                    program,
                    timeout.as_secs_f32()
                ));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return RawResult::failed(format!("failed waiting for {}: {}", program, e));
            }
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    if status.success() {
        let output = if stdout.trim().is_empty() {
            stderr
        } else {
            stdout
        };
        RawResult::ok(output)
    } else {
        let reason = match stderr.trim() {
            "" => match status.code() {
                Some(code) => format!("{} exited with code {}", program, code),
                None => format!("{} terminated by signal", program),
            },
            message => message.to_string(),
        };
        RawResult::failed_with_output(stdout, reason)
    }
}

fn read_pipe<R: Read>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeStatus;

    #[test]
    fn missing_program_is_unavailable() {
        let result = run_with_timeout(
            "this-command-does-not-exist-12345",
            &["--version"],
            Duration::from_secs(5),
        );
        assert_eq!(result.status, ProbeStatus::Unavailable);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_captures_stdout() {
        let result = run_with_timeout("sh", &["-c", "echo hello"], Duration::from_secs(5));
        assert!(result.is_ok());
        assert_eq!(result.output.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn stderr_only_output_is_used() {
        let result = run_with_timeout(
            "sh",
            &["-c", "echo 'Python 2.7.18' >&2"],
            Duration::from_secs(5),
        );
        assert!(result.is_ok());
        assert!(result.output.contains("Python 2.7.18"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failed_with_stderr_reason() {
        let result = run_with_timeout(
            "sh",
            &["-c", "echo partial; echo broken >&2; exit 3"],
            Duration::from_secs(5),
        );
        assert_eq!(result.status, ProbeStatus::Failed);
        assert_eq!(result.output.trim(), "partial");
        assert_eq!(result.error.as_deref(), Some("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_without_stderr_reports_code() {
        let result = run_with_timeout("sh", &["-c", "exit 4"], Duration::from_secs(5));
        assert!(result.error.unwrap().contains("code 4"));
    }

    #[cfg(unix)]
    #[test]
    fn hung_command_is_killed_at_deadline() {
        let start = Instant::now();
        let result = run_with_timeout("sleep", &["10"], Duration::from_millis(200));
        assert_eq!(result.status, ProbeStatus::Failed);
        assert!(result.error.unwrap().contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn grandchild_holding_pipes_does_not_block_timeout() {
        let start = Instant::now();
        let result = run_with_timeout(
            "sh",
            &["-c", "sleep 5 & sleep 5"],
            Duration::from_millis(200),
        );
        assert_eq!(result.status, ProbeStatus::Failed);
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
