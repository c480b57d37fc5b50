/// Snapshot files on disk
///
/// Each aggregation pass is written once to `streaming_content_<YYYYMMDD_HHMMSS>.csv`
/// and never touched again. Names sort lexicographically in time order, so the
/// greatest name is the latest snapshot. A second write within the same second gets
/// a `_01`…`_99` suffix, which still sorts after the base name.
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::{
    error::{AppError, AppResult},
    models::{ContentRecord, Snapshot},
};

pub const SNAPSHOT_PREFIX: &str = "streaming_content_";
pub const SNAPSHOT_SUFFIX: &str = ".csv";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TIMESTAMP_LEN: usize = 15;
const MAX_COLLISION_SUFFIX: u32 = 99;

/// Header row, in `ContentRecord` field order
pub const SNAPSHOT_COLUMNS: [&str; 13] = [
    "type",
    "title",
    "overview",
    "tmdb_id",
    "imdb_id",
    "provider",
    "release_date",
    "tmdb_rating",
    "popularity",
    "poster_path",
    "genres",
    "imdb_rating",
    "imdb_votes",
];

/// Checks a file name against `streaming_content_<timestamp>[_NN].csv`
pub fn is_snapshot_name(name: &str) -> bool {
    let Some(stem) = name
        .strip_prefix(SNAPSHOT_PREFIX)
        .and_then(|rest| rest.strip_suffix(SNAPSHOT_SUFFIX))
    else {
        return false;
    };

    let Some(timestamp) = stem.get(..TIMESTAMP_LEN) else {
        return false;
    };
    if NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_err() {
        return false;
    }

    match &stem[TIMESTAMP_LEN..] {
        "" => true,
        counter => {
            counter.len() == 3
                && counter.starts_with('_')
                && counter[1..].chars().all(|c| c.is_ascii_digit())
        }
    }
}

fn snapshot_name(timestamp: NaiveDateTime, collision: u32) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    if collision == 0 {
        format!("{}{}{}", SNAPSHOT_PREFIX, stamp, SNAPSHOT_SUFFIX)
    } else {
        format!(
            "{}{}_{:02}{}",
            SNAPSHOT_PREFIX, stamp, collision, SNAPSHOT_SUFFIX
        )
    }
}

/// Append-only store of snapshot files in one directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All snapshot file names, oldest first
    pub fn list(&self) -> AppResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_snapshot_name(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Name of the most recent snapshot, if any
    pub fn find_latest(&self) -> AppResult<Option<String>> {
        Ok(self.list()?.pop())
    }

    /// Reads a snapshot back into records
    pub fn load(&self, filename: &str) -> AppResult<Snapshot> {
        if !is_snapshot_name(filename) {
            return Err(AppError::Load(format!(
                "{} is not a snapshot file name",
                filename
            )));
        }

        let path = self.dir.join(filename);
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| AppError::Load(format!("Cannot open {}: {}", filename, e)))?;

        let headers = reader
            .headers()
            .map_err(|e| AppError::Load(format!("Cannot read header of {}: {}", filename, e)))?;
        if headers.iter().ne(SNAPSHOT_COLUMNS.iter().copied()) {
            return Err(AppError::Load(format!(
                "{} has unexpected columns",
                filename
            )));
        }

        let records = reader
            .deserialize::<ContentRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Load(format!("Malformed row in {}: {}", filename, e)))?;

        tracing::debug!(filename = %filename, records = records.len(), "Snapshot loaded");

        Ok(Snapshot {
            filename: filename.to_string(),
            records,
        })
    }

    /// Writes records to a new snapshot named after the current local time
    pub fn write(&self, records: &[ContentRecord]) -> AppResult<String> {
        self.write_at(records, Local::now().naive_local())
    }

    pub(crate) fn write_at(
        &self,
        records: &[ContentRecord],
        timestamp: NaiveDateTime,
    ) -> AppResult<String> {
        fs::create_dir_all(&self.dir)?;

        let (filename, file) = self.create_new_file(timestamp)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(SNAPSHOT_COLUMNS).map_err(snapshot_error)?;
        for record in records {
            writer.serialize(record).map_err(snapshot_error)?;
        }
        writer.flush()?;

        tracing::info!(
            filename = %filename,
            records = records.len(),
            dir = %self.dir.display(),
            "Snapshot written"
        );

        Ok(filename)
    }

    /// Opens a file that did not exist before, never overwriting an older snapshot
    fn create_new_file(&self, timestamp: NaiveDateTime) -> AppResult<(String, fs::File)> {
        for collision in 0..=MAX_COLLISION_SUFFIX {
            let filename = snapshot_name(timestamp, collision);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&filename))
            {
                Ok(file) => return Ok((filename, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(filename = %filename, "Snapshot name taken");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Snapshot(format!(
            "No free snapshot name for timestamp {}",
            timestamp.format(TIMESTAMP_FORMAT)
        )))
    }
}

fn snapshot_error(e: csv::Error) -> AppError {
    AppError::Snapshot(e.to_string())
}
