//! Display recent log entries.

use crate::logging::{is_rotated_log, log_dir};
use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LINES: usize = 50;

/// Prints the last lines of the newest log file.
///
/// # Errors
/// - If the log directory cannot be determined or read
/// - If the log file cannot be read
pub fn handle_logs() -> Result<(), anyhow::Error> {
    let log_dir = log_dir()?;

    if !log_dir.exists() {
        println!("Log directory does not exist yet: {}", log_dir.display());
        println!("Logs will be created when micdeck runs.");
        return Ok(());
    }

    let Some(log_file) = latest_log(&log_dir)? else {
        println!("No log files found in: {}", log_dir.display());
        println!("Run 'micdeck' to generate logs.");
        return Ok(());
    };

    let content =
        fs::read_to_string(&log_file).map_err(|e| anyhow!("Failed to read log file: {e}"))?;
    if content.is_empty() {
        println!("Log file is empty: {}", log_file.display());
        return Ok(());
    }

    let (shown, total) = tail(&content, DEFAULT_LINES);

    println!();
    if shown.len() < total {
        println!("Showing last {} of {} lines:", shown.len(), total);
    } else {
        println!("Showing all {total} lines:");
    }
    println!("Full log file at: {}", log_file.display());
    println!();

    for line in shown {
        println!("{line}");
    }

    Ok(())
}

/// Most recently modified log file in `log_dir`, if any.
fn latest_log(log_dir: &Path) -> Result<Option<PathBuf>, anyhow::Error> {
    let entries =
        fs::read_dir(log_dir).map_err(|e| anyhow!("Failed to read log directory: {e}"))?;

    let latest = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !is_rotated_log(path.file_name()?.to_str()?) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path);

    Ok(latest)
}

/// Last `count` lines of `content` and the total line count.
fn tail(content: &str, count: usize) -> (Vec<&str>, usize) {
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len();
    let start = total.saturating_sub(count);
    (lines[start..].to_vec(), total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_tail() {
        let (shown, total) = tail("a\nb\nc\nd", 2);
        assert_eq!(shown, vec!["c", "d"]);
        assert_eq!(total, 4);

        let (shown, total) = tail("a\nb", 50);
        assert_eq!(shown, vec!["a", "b"]);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_latest_log_picks_newest_rotated_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(latest_log(dir.path()).unwrap(), None);

        let base = SystemTime::now() - Duration::from_secs(600);
        for (name, offset) in [
            ("micdeck.log.2026-10-12", 0),
            ("micdeck.log.2026-10-13", 60),
            ("unrelated.txt", 120),
        ] {
            let file = fs::File::create(dir.path().join(name)).unwrap();
            file.set_modified(base + Duration::from_secs(offset)).unwrap();
        }

        assert_eq!(
            latest_log(dir.path()).unwrap(),
            Some(dir.path().join("micdeck.log.2026-10-13"))
        );
    }
}
