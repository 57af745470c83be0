//! External language identification process.
use std::fmt;
use std::io::{self, BufWriter, Write};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

use log::debug;

use crate::error::Error;

const FASTTEXT: &str = "fastText/fasttext";
const FASTTEXT_ARGS: [&str; 3] = ["predict-prob", "fastText/lid.176.bin", "-"];

/// Command line of the identification subprocess.
///
/// The process reads newline-terminated lines on its stdin and answers
/// exactly one line per input line, in order, on its stdout.
/// A new process is spawned for each [Oracle::run].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    program: String,
    args: Vec<String>,
}

impl Oracle {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace-separated command line.
    pub fn from_command_line(command_line: &str) -> Result<Self, Error> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| Error::Oracle("empty command line".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Run a new process.
    ///
    /// `feed` writes lines to the process stdin from its own thread, while the
    /// calling thread copies the answers into `answers`. The oracle blocks on writing
    /// its stdout once the pipe is full, so both ends have to progress concurrently.
    ///
    /// The call returns once the feeder is done *and* the process exited.
    ///
    /// # Errors
    /// - [Error::Oracle] if the process can't be spawned or exits unsuccessfully,
    /// - errors from copying the answers, which also kill the process,
    /// - errors returned by `feed`.
    pub fn run<T, F, W>(&self, feed: F, answers: &mut W) -> Result<T, Error>
    where
        T: Send,
        F: FnOnce(&mut BufWriter<ChildStdin>) -> Result<T, Error> + Send,
        W: Write,
    {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Oracle(format!("could not spawn `{}`: {}", self, e)))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (stdin, mut stdout) = match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                child.kill()?;
                return Err(Error::Oracle(format!("`{}` pipes are not available", self)));
            }
        };

        let (fed, copied) = thread::scope(|s| {
            let feeder = s.spawn(move || -> Result<T, Error> {
                let mut stdin = BufWriter::new(stdin);
                let fed = feed(&mut stdin)?;
                stdin.flush()?;
                // stdin is dropped here, closing the pipe
                Ok(fed)
            });

            let copied = io::copy(&mut stdout, answers).and_then(|n| answers.flush().map(|_| n));
            if copied.is_err() {
                // nobody reads the answers anymore: unblock the feeder
                if let Err(e) = child.kill() {
                    debug!("could not kill `{}`: {}", self, e);
                }
            }

            let fed = feeder
                .join()
                .unwrap_or_else(|_| Err(Error::Custom("oracle feeder panicked".to_string())));
            (fed, copied)
        });

        let status = child.wait()?;
        let copied = copied?;
        if !status.success() {
            return Err(Error::Oracle(format!("`{}` exited with {}", self, status)));
        }
        debug!("`{}` answered {} bytes", self, copied);

        fed
    }
}

impl Default for Oracle {
    /// fastText with the `lid.176` model, as laid out in the working directory.
    fn default() -> Self {
        Self::new(FASTTEXT, FASTTEXT_ARGS.iter().map(|a| a.to_string()).collect())
    }
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    /// Answers `__label__en 0.95` to every line.
    fn constant() -> Oracle {
        Oracle::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"while IFS= read -r l; do echo "__label__en 0.95"; done"#.to_string(),
            ],
        )
    }

    #[test]
    fn command_line() {
        let o = Oracle::from_command_line("  fasttext predict-prob  lid.bin - ").unwrap();
        assert_eq!(
            o,
            Oracle::new(
                "fasttext",
                vec!["predict-prob".into(), "lid.bin".into(), "-".into()]
            )
        );
        assert_eq!(o.to_string(), "fasttext predict-prob lid.bin -");
        assert!(Oracle::from_command_line("   ").is_err());
    }

    #[test]
    fn default_is_fasttext() {
        assert_eq!(
            Oracle::default().to_string(),
            "fastText/fasttext predict-prob fastText/lid.176.bin -"
        );
    }

    #[test]
    fn one_answer_per_line() {
        let mut answers = Vec::new();
        let fed = constant()
            .run(
                |stdin| {
                    for i in 0..3 {
                        writeln!(stdin, "line {}", i)?;
                    }
                    Ok(3)
                },
                &mut answers,
            )
            .unwrap();

        assert_eq!(fed, 3);
        assert_eq!(
            String::from_utf8(answers).unwrap(),
            "__label__en 0.95\n".repeat(3)
        );
    }

    // more input than pipe buffers can hold, fed before anything is read back
    #[test]
    fn large_batch() {
        let mut answers = Vec::new();
        let line = "x".repeat(200);
        constant()
            .run(
                |stdin| {
                    for _ in 0..2_000 {
                        writeln!(stdin, "{}", line)?;
                    }
                    Ok(())
                },
                &mut answers,
            )
            .unwrap();

        assert_eq!(answers.iter().filter(|b| **b == b'\n').count(), 2_000);
    }

    #[test]
    fn non_zero_exit() {
        let oracle = Oracle::new("sh", vec!["-c".to_string(), "cat > /dev/null; exit 3".to_string()]);
        let err = oracle.run(|_| Ok(()), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Oracle(_)));
    }

    #[test]
    fn missing_program() {
        let oracle = Oracle::new("./this/does/not/exist", vec![]);
        let err = oracle.run(|_| Ok(()), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Oracle(_)));
    }

    #[test]
    fn feeder_error() {
        let err = constant()
            .run(
                |_| -> Result<(), Error> { Err(Error::Format("bad record".to_string())) },
                &mut Vec::new(),
            )
            .unwrap_err();
        assert!(err.is_format());
    }
}
