/// Disk usage and totals panel
///
/// Turns the `/api/stats` reply into what the stats card displays.

use super::data::{DiskStats, Stats};

/// Mount points checked first, in order.
const MOUNT_PRIORITY: [&str; 3] = ["/app/images", "/images", "/"];

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Fill level class of the disk bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warning,
    Critical,
}

impl Level {
    pub fn of(percent: f64) -> Self {
        if percent > 90.0 {
            Level::Critical
        } else if percent > 70.0 {
            Level::Warning
        } else {
            Level::Ok
        }
    }
}

/// What the stats card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    /// Bar fill in percent.
    pub percent_used: f64,
    pub level: Level,
    /// Line under the bar (free space or error text).
    pub caption: String,
    /// Tooltip with the used amount.
    pub detail: Option<String>,
    pub total_files: String,
    pub total_albums: String,
}

impl StatsView {
    /// Placeholder before the first reply.
    pub fn loading() -> Self {
        Self::error("Loading...")
    }

    /// Failed fetch or `{error}` reply.
    pub fn error(message: &str) -> Self {
        Self {
            percent_used: 0.0,
            level: Level::Ok,
            caption: message.to_string(),
            detail: None,
            total_files: "—".to_string(),
            total_albums: "—".to_string(),
        }
    }

    pub fn from_stats(stats: &Stats) -> Self {
        if stats.status.as_deref() == Some("error") || stats.error.is_some() {
            return Self::error(stats.error.as_deref().unwrap_or("Failed to load statistics"));
        }

        let (percent_used, caption, detail) = match main_disk(stats) {
            Some(disk) => (
                disk.percent_used,
                format!("Free {:.1} GB of {:.1} GB", disk.free as f64 / GIB, disk.total as f64 / GIB),
                Some(format!("Used: {:.1} GB ({}%)", disk.used as f64 / GIB, disk.percent_used)),
            ),
            None => (0.0, "Disk statistics unavailable".to_string(), None),
        };

        let (total_files, total_albums) = match &stats.files {
            Some(files) => (files.total_files.to_string(), files.total_albums.to_string()),
            None => ("—".to_string(), "—".to_string()),
        };

        Self {
            percent_used,
            level: Level::of(percent_used),
            caption,
            detail,
            total_files,
            total_albums,
        }
    }
}

/// Preferred mount point, otherwise the first one reported.
fn main_disk(stats: &Stats) -> Option<&DiskStats> {
    MOUNT_PRIORITY
        .iter()
        .find_map(|mount| stats.disk_stats.get(*mount))
        .or_else(|| stats.disk_stats.values().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::FileTotals;

    fn disk(total: u64, used: u64, percent: f64) -> DiskStats {
        DiskStats {
            total,
            used,
            free: total - used,
            percent_used: percent,
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(Level::of(50.0), Level::Ok);
        assert_eq!(Level::of(70.0), Level::Ok);
        assert_eq!(Level::of(70.5), Level::Warning);
        assert_eq!(Level::of(90.1), Level::Critical);
    }

    #[test]
    fn test_mount_priority() {
        let mut stats = Stats::default();
        stats.disk_stats.insert("/".to_string(), disk(100 * GIB as u64, 10 * GIB as u64, 10.0));
        stats.disk_stats.insert("/images".to_string(), disk(200 * GIB as u64, 190 * GIB as u64, 95.0));
        stats.files = Some(FileTotals { total_files: 1200, total_albums: 7 });

        let view = StatsView::from_stats(&stats);
        assert_eq!(view.percent_used, 95.0);
        assert_eq!(view.level, Level::Critical);
        assert_eq!(view.caption, "Free 10.0 GB of 200.0 GB");
        assert_eq!(view.total_files, "1200");
        assert_eq!(view.total_albums, "7");
    }

    #[test]
    fn test_falls_back_to_first_mount() {
        let mut stats = Stats::default();
        stats.disk_stats.insert("/srv/data".to_string(), disk(10 * GIB as u64, 8 * GIB as u64, 80.0));
        let view = StatsView::from_stats(&stats);
        assert_eq!(view.level, Level::Warning);
        assert_eq!(view.total_files, "—");
    }

    #[test]
    fn test_error_reply() {
        let stats = Stats {
            error: Some("db down".to_string()),
            status: Some("error".to_string()),
            ..Stats::default()
        };
        let view = StatsView::from_stats(&stats);
        assert_eq!(view.caption, "db down");
        assert_eq!(view.total_albums, "—");
        assert_eq!(view.percent_used, 0.0);
    }

    #[test]
    fn test_no_disk_stats() {
        let view = StatsView::from_stats(&Stats::default());
        assert_eq!(view.caption, "Disk statistics unavailable");
    }
}
