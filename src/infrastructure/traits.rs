//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::domain::{Answer, Node};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Source of yes/no answers for pending questions.
///
/// Implementations validate raw input themselves; the engine only ever sees
/// an [`Answer`].
pub trait AnswerPrompt: Send + Sync {
    /// Ask for the answer to `question`.
    /// Returns None when no more input is available.
    fn ask(&self, question: &Node) -> io::Result<Option<Answer>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

struct LineIo<R, W> {
    reader: R,
    writer: W,
}

/// Line-based prompt: writes `[id] yes/no > ` and reads one line per attempt.
///
/// Anything other than yes/y/no/n is rejected and the question is asked again.
pub struct LinePrompt<R, W> {
    io: Mutex<LineIo<R, W>>,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new(LineIo { reader, writer }),
        }
    }
}

impl LinePrompt<BufReader<io::Stdin>, io::Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> AnswerPrompt for LinePrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask(&self, question: &Node) -> io::Result<Option<Answer>> {
        let mut guard = self
            .io
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "prompt lock poisoned"))?;
        let LineIo { reader, writer } = &mut *guard;

        loop {
            write!(writer, "[{}] yes/no > ", question.id)?;
            writer.flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                writeln!(writer)?;
                return Ok(None);
            }
            match line.parse::<Answer>() {
                Ok(answer) => return Ok(Some(answer)),
                Err(e) => writeln!(writer, "{e}")?,
            }
        }
    }
}

/// Replays a fixed list of answers, e.g. from `--answers yes,no`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Answer>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }
}

impl AnswerPrompt for ScriptedPrompt {
    fn ask(&self, _question: &Node) -> io::Result<Option<Answer>> {
        let mut answers = self
            .answers
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "prompt lock poisoned"))?;
        Ok(answers.pop_front())
    }
}
