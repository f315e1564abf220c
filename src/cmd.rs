use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

/// Execute a command and stream output to stdout if verbose mode is enabled
pub fn execute<S: AsRef<OsStr>>(ctx: &Context, program: &str, args: &[S]) -> Result<()> {
    let command_line = format!(
        "{} {}",
        program,
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    if ctx.verbose {
        println!("Executing: {}", command_line);
    }

    let mut command = Command::new(program);
    command.args(args);
    let spawn_err = |e: std::io::Error| Error::CommandFailed(format!("{}: {}", command_line, e));

    // Never leave a pipe undrained while blocking on another one: verbose
    // runs send stderr straight to the terminal, quiet runs let `output()`
    // collect both streams at once.
    let (status, stderr) = if ctx.verbose {
        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(stdout) = child.stdout.take() {
            let reader = BufReader::new(stdout);
            for line in reader.lines().map_while(|l| l.ok()) {
                println!("{}", line);
            }
        }

        (child.wait()?, String::new())
    } else {
        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(spawn_err)?;
        (output.status, String::from_utf8_lossy(&output.stderr).into_owned())
    };

    if !status.success() {
        return Err(Error::CommandFailed(format!(
            "{} failed with exit code {}: {}",
            command_line,
            status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ctx() -> Context {
        Context::new(PathBuf::from("."), false, false)
    }

    #[test]
    fn test_success() {
        execute(&ctx(), "sh", &["-c", "echo hello"]).unwrap();
    }

    #[test]
    fn test_failure_reports_stderr() {
        let err = execute(&ctx(), "sh", &["-c", "echo broken >&2; exit 3"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exit code 3"), "{msg}");
        assert!(msg.contains("broken"), "{msg}");
    }

    #[test]
    fn test_large_stderr_does_not_block() {
        // well past a 64 KiB pipe buffer, with stdout also in use
        let script = "i=0; while [ $i -lt 4000 ]; do echo \"tar: warning line $i padding padding\" >&2; \
                      echo out $i; i=$((i+1)); done";
        execute(&ctx(), "sh", &["-c", script]).unwrap();
    }
}
