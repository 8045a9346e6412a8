// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads the movie review dataset from its on-disk layout:
//
//   <root>/
//     train/
//       train_data    ← one review per line
//       train_label   ← one integer rating per line (1..=10)
//
// Line N of train_data pairs with line N of train_label.
// A mismatch in line counts or a rating outside 1..=10 fails
// the whole load; nothing is skipped silently.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (Reading a File)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::review::{is_valid_rating, RawReview};

/// Loads raw reviews from a dataset root directory.
pub struct ReviewLoader {
    root: PathBuf,
}

impl ReviewLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Path of the review text file
    pub fn data_path(&self) -> PathBuf {
        self.root.join("train").join("train_data")
    }

    /// Path of the rating file
    pub fn label_path(&self) -> PathBuf {
        self.root.join("train").join("train_label")
    }

    /// Read only the review lines (used by local test mode).
    pub fn load_lines(&self) -> Result<Vec<String>> {
        let path = self.data_path();
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read reviews from '{}'", path.display()))?;
        Ok(text.lines().map(str::to_string).collect())
    }

    /// Read reviews and ratings, pairing them line by line.
    pub fn load_all(&self) -> Result<Vec<RawReview>> {
        let lines = self.load_lines()?;

        let path   = self.label_path();
        let labels = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read labels from '{}'", path.display()))?;
        let labels: Vec<&str> = labels.lines().collect();

        if labels.len() != lines.len() {
            bail!(
                "'{}' has {} lines but '{}' has {}",
                self.data_path().display(),
                lines.len(),
                path.display(),
                labels.len()
            );
        }

        let reviews = lines
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (text, label))| -> Result<RawReview> {
                let rating: i64 = label.trim().parse().with_context(|| {
                    format!("Line {} of '{}': '{}' is not an integer", i + 1, path.display(), label)
                })?;
                if !is_valid_rating(rating) {
                    bail!("Line {} of '{}': rating {} is outside 1..=10", i + 1, path.display(), rating);
                }
                Ok(RawReview::new(text, rating as u8))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded {} reviews from '{}'", reviews.len(), self.root.display());
        Ok(reviews)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn write_dataset(data: &str, labels: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("train")).unwrap();
        fs::write(dir.path().join("train/train_data"), data).unwrap();
        fs::write(dir.path().join("train/train_label"), labels).unwrap();
        dir
    }

    #[test]
    fn test_loads_paired_lines() {
        let dir     = write_dataset("최고의 영화\n별로였다\n", "10\n2\n");
        let reviews = ReviewLoader::new(dir.path()).load_all().unwrap();
        assert_eq!(reviews, vec![RawReview::new("최고의 영화", 10), RawReview::new("별로였다", 2)]);
    }

    #[test]
    fn test_rejects_mismatched_counts() {
        let dir = write_dataset("a\nb\n", "1\n");
        assert!(ReviewLoader::new(dir.path()).load_all().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let dir = write_dataset("a\n", "11\n");
        let err = ReviewLoader::new(dir.path()).load_all().unwrap_err();
        assert!(err.to_string().contains("outside 1..=10"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ReviewLoader::new(dir.path().join("nope")).load_all().is_err());
    }
}
