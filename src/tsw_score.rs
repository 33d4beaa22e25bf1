// Highscore log: one `date,outcome,difficulty,score` line per finished game
// The file only ever grows; the start screen shows its most recent lines

use chrono::Local;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::tsw_board::Difficulty;
use crate::tsw_game::Outcome;

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighscoreRecord {
    pub date: String, // dd/mm/yyyy
    pub outcome: Outcome,
    pub difficulty: Difficulty,
    pub score: u32,
}

impl HighscoreRecord {
    /// Record stamped with today's local date
    pub fn today(outcome: Outcome, difficulty: Difficulty, score: u32) -> Self {
        HighscoreRecord {
            date: Local::now().format("%d/%m/%Y").to_string(),
            outcome,
            difficulty,
            score,
        }
    }
}

impl fmt::Display for HighscoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.date,
            self.outcome,
            self.difficulty.label(),
            self.score
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRecordError {
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),
    #[error("missing date")]
    Date,
    #[error("unknown outcome `{0}`")]
    Outcome(String),
    #[error("unknown difficulty `{0}`")]
    Difficulty(String),
    #[error("invalid score `{0}`")]
    Score(String),
}

impl FromStr for HighscoreRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[date, outcome, difficulty, score] = fields.as_slice() else {
            return Err(ParseRecordError::FieldCount(fields.len()));
        };
        if date.is_empty() {
            return Err(ParseRecordError::Date);
        }
        Ok(HighscoreRecord {
            date: date.to_string(),
            outcome: Outcome::from_label(outcome)
                .ok_or_else(|| ParseRecordError::Outcome(outcome.to_string()))?,
            difficulty: Difficulty::from_label(difficulty)
                .ok_or_else(|| ParseRecordError::Difficulty(difficulty.to_string()))?,
            score: score
                .parse()
                .map_err(|_| ParseRecordError::Score(score.to_string()))?,
        })
    }
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("highscore file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse the last `n` non-blank lines of a highscore log
/// Lines that do not parse are dropped, so fewer than `n` records may come back
pub fn read_recent<R: BufRead>(reader: R, n: usize) -> io::Result<Vec<HighscoreRecord>> {
    let mut lines = Vec::new();
    for chunk in reader.split(b'\n') {
        let line = String::from_utf8_lossy(&chunk?).trim().to_string();
        if !line.is_empty() {
            lines.push(line);
        }
    }
    let tail = &lines[lines.len().saturating_sub(n)..];
    let records: Vec<HighscoreRecord> = tail.iter().filter_map(|l| l.parse().ok()).collect();
    if records.len() < tail.len() {
        debug!(skipped = tail.len() - records.len(), "malformed highscore lines");
    }
    Ok(records)
}

/// Append-only highscore file
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Most recent `n` records, oldest first
    /// A missing file is created empty and reads as no records
    pub fn recent(&self, n: usize) -> Result<Vec<HighscoreRecord>, ScoreError> {
        match File::open(&self.path) {
            Ok(file) => read_recent(BufReader::new(file), n).map_err(|e| self.io_error(e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.open_append().map_err(|e| self.io_error(e))?;
                info!(path = %self.path.display(), "created empty highscore file");
                Ok(Vec::new())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Append one record as a new last line
    pub fn append(&self, record: &HighscoreRecord) -> Result<(), ScoreError> {
        let mut file = self.open_append().map_err(|e| self.io_error(e))?;
        writeln!(file, "{record}").map_err(|e| self.io_error(e))?;
        info!(record = %record, "highscore saved");
        Ok(())
    }

    fn open_append(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }

    fn io_error(&self, source: io::Error) -> ScoreError {
        ScoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
