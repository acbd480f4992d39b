//! Random selection from a line-oriented result file.

use std::fs;
use std::path::Path;

use crate::Error;

/// Pick one non-blank line from `path` uniformly at random.
///
/// Each call draws from a freshly seeded generator, so rapid successive
/// invocations do not share a sequence.
pub fn pick_random(path: &Path) -> Result<String, Error> {
    let content = fs::read_to_string(path).map_err(Error::cache_io(path))?;
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(Error::EmptyFile(path.to_path_buf()));
    }

    let mut rng = fastrand::Rng::new();
    Ok(lines[rng.usize(..lines.len())].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pick_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot");
        fs::write(&path, "\n   \nhttps://w.wallhaven.cc/a.jpg\n\t\n").unwrap();

        for _ in 0..10 {
            assert_eq!(pick_random(&path).unwrap(), "https://w.wallhaven.cc/a.jpg");
        }
    }

    #[test]
    fn test_pick_covers_all_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top");
        fs::write(&path, "a\nb\nc\n").unwrap();

        let seen: HashSet<String> = (0..200).map(|_| pick_random(&path).unwrap()).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_blank_file_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("random");
        fs::write(&path, "\n  \n").unwrap();

        assert!(matches!(pick_random(&path), Err(Error::EmptyFile(p)) if p == path));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = pick_random(&dir.path().join("nope"));
        assert!(matches!(result, Err(Error::CacheIo { .. })));
    }
}
