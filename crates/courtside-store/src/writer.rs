use std::fs;
use std::path::{Path, PathBuf};

use courtside_core::error::AppError;
use courtside_core::models::{TableRow, Tables, compute_hash};

/// One persisted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub table: &'static str,
    pub path: PathBuf,
    pub rows: usize,
    /// SHA-256 of the file contents.
    pub digest: String,
}

/// Writes row sets as UTF-8 CSV files, one per table.
///
/// Every write replaces the whole file, header row included, so two runs
/// over the same rows leave byte-identical files.
#[derive(Debug, Clone)]
pub struct CsvTableWriter {
    dir: PathBuf,
}

impl CsvTableWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `table`'s file under the output directory.
    pub fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    /// Write the six core tables, plus season logs when `season_logs` is set.
    pub fn write_all(&self, tables: &Tables, season_logs: bool) -> Result<Vec<WrittenTable>, AppError> {
        let mut written = vec![
            self.write(&tables.teams)?,
            self.write(&tables.players)?,
            self.write(&tables.roster)?,
            self.write(&tables.games)?,
            self.write(&tables.game_team_stats)?,
            self.write(&tables.game_player_stats)?,
        ];
        if season_logs {
            written.push(self.write(&tables.season_logs)?);
        }
        Ok(written)
    }

    /// Replace `R::TABLE`'s file with `rows`. An empty slice still writes
    /// the header row.
    pub fn write<R: TableRow>(&self, rows: &[R]) -> Result<WrittenTable, AppError> {
        let bytes = encode(rows)?;
        let path = self.path_for(R::TABLE);

        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("csv.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        let written = WrittenTable {
            table: R::TABLE,
            path,
            rows: rows.len(),
            digest: compute_hash(&bytes),
        };
        tracing::debug!(
            table = written.table,
            rows = written.rows,
            path = %written.path.display(),
            "Wrote table"
        );
        Ok(written)
    }
}

fn encode<R: TableRow>(rows: &[R]) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(R::HEADERS).map_err(csv_error(R::TABLE))?;
    for row in rows {
        wtr.write_record(row.record()).map_err(csv_error(R::TABLE))?;
    }
    wtr.into_inner()
        .map_err(|e| AppError::CsvError(format!("{}: {e}", R::TABLE)))
}

fn csv_error(table: &'static str) -> impl Fn(csv::Error) -> AppError {
    move |e| AppError::CsvError(format!("{table}: {e}"))
}
