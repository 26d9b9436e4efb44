//! Append-only turn log stored as JSON lines.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::repository::traits::check_order;
use crate::repository::{RepositoryError, Result, TurnLogRepository, TurnRecord};

/// File-based turn log.
///
/// Each record is one line of JSON:
/// ```text
/// {"turn":0,"actions":[...],"stateRoot":"..."}
/// {"turn":1,"actions":[...],"stateRoot":"..."}
/// ```
///
/// Lines are flushed after every append so a crash loses at most the turn
/// being written.
pub struct FileTurnLog {
    path: PathBuf,
    writer: BufWriter<File>,
    last_turn: Option<u32>,
}

impl FileTurnLog {
    pub const DEFAULT_FILENAME: &'static str = "turns.log";

    /// Create a new log.
    ///
    /// # Errors
    ///
    /// Returns error if the file already exists (prevents accidental overwrites).
    pub fn create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;

        let path = base_dir.join(filename.as_ref());
        if path.exists() {
            return Err(RepositoryError::LogAlreadyExists(
                path.display().to_string(),
            ));
        }

        let file = OpenOptions::new().create_new(true).write(true).open(&path)?;
        tracing::debug!("Created turn log: {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            last_turn: None,
        })
    }

    /// Open or create a log, resuming after its last record.
    pub fn open_or_create(base_dir: impl AsRef<Path>, filename: impl AsRef<str>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        std::fs::create_dir_all(base_dir)?;

        let path = base_dir.join(filename.as_ref());
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let last_turn = Self::read_file(&path)?.last().map(|record| record.turn);

        tracing::debug!(
            "Opened turn log: {} (last turn {:?})",
            path.display(),
            last_turn
        );

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            last_turn,
        })
    }

    /// Reads every record of a log file without opening it for writing.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<TurnRecord>> {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|error| {
                RepositoryError::CorruptedData(format!("line {}: {}", index + 1, error))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TurnLogRepository for FileTurnLog {
    fn append(&mut self, record: &TurnRecord) -> Result<()> {
        check_order(self.last_turn, record)?;

        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        self.last_turn = Some(record.turn);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TurnRecord>> {
        Self::read_file(&self.path)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn last_turn(&self) -> Option<u32> {
        self.last_turn
    }
}

impl Drop for FileTurnLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(
                "Failed to flush turn log '{}' on drop: {}",
                self.path.display(),
                e
            );
        }
    }
}
