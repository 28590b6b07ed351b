//! Sample input generation for trying out a batch run

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: [&str; 5] = ["ID", "Name", "Email", "Age", "City"];

/// Data rows written to the `index`-th sample file (1-based)
pub fn sample_row_count(index: usize) -> usize {
    100 + index.saturating_sub(1) * 50
}

/// Write `count` CSV files named `sample_<n>.csv` into `dir`.
///
/// File `n` holds a header plus [`sample_row_count(n)`](sample_row_count) rows.
/// The directory is created when missing; existing samples are overwritten.
pub fn create_sample_files(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create sample directory {}", dir.display()))?;

    let mut paths = Vec::with_capacity(count);
    for index in 1..=count {
        let path = dir.join(format!("sample_{index}.csv"));
        write_sample(&path, index, sample_row_count(index))
            .with_context(|| format!("Failed to write sample file {}", path.display()))?;
        tracing::debug!("Created {} ({} rows)", path.display(), sample_row_count(index));
        paths.push(path);
    }

    Ok(paths)
}

fn write_sample(path: &Path, file: usize, rows: usize) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    for row in 0..rows {
        let id = row + 1;
        writer.write_record([
            id.to_string(),
            format!("User_{file}_{id}"),
            format!("user{file}_{id}@example.com"),
            (20 + row % 50).to_string(),
            format!("City_{}", row % 10 + 1),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_row_counts_grow_by_fifty() {
        assert_eq!(sample_row_count(1), 100);
        assert_eq!(sample_row_count(2), 150);
        assert_eq!(sample_row_count(5), 300);
    }

    #[test]
    fn test_create_sample_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data");

        let paths = create_sample_files(&dir, 3).unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], dir.join("sample_1.csv"));

        let content = fs::read_to_string(&paths[1]).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("ID,Name,Email,Age,City"));
        assert_eq!(lines.count(), 150);
    }

    #[test]
    fn test_row_content() {
        let temp_dir = TempDir::new().unwrap();
        let paths = create_sample_files(temp_dir.path(), 2).unwrap();

        let content = fs::read_to_string(&paths[1]).unwrap();
        let rows: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(rows[0], "1,User_2_1,user2_1@example.com,20,City_1");
        assert_eq!(rows[10], "11,User_2_11,user2_11@example.com,30,City_1");
        assert_eq!(rows[59], "60,User_2_60,user2_60@example.com,29,City_10");
    }

    #[test]
    fn test_zero_count_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = create_sample_files(temp_dir.path(), 0).unwrap();
        assert!(paths.is_empty());
    }
}
