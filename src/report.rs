use serde::Serialize;

const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size with 1024-based units and one decimal place.
/// Anything past terabytes stays in TB.
pub fn readable_bytes(num_of_bytes: i64) -> String {
    let mut value = num_of_bytes as f64;

    for unit in &UNITS[..UNITS.len() - 1] {
        if value.abs() < 1024.0 {
            return format!("{:3.1} {}", value, unit);
        }
        value /= 1024.0;
    }

    format!("{:3.1} {}", value, UNITS[UNITS.len() - 1])
}

/// Cumulative space savings while a run is in progress
#[derive(Debug, Default)]
pub struct SavingsTracker {
    savings: i64,
}

impl SavingsTracker {
    pub fn record(&mut self, old_size: u64, new_size: u64) {
        self.savings += old_size as i64 - new_size as i64;
    }

    pub fn savings(&self) -> i64 {
        self.savings
    }

    pub fn indicator(&self) -> &'static str {
        if self.savings >= 0 {
            "📉 (Size is smaller than before.)"
        } else {
            "📈 (Size is bigger than before.)"
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "Current space savings in total: {} {}",
            readable_bytes(self.savings),
            self.indicator()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub root: String,
    pub total_files: usize,
    pub candidates: usize,
    pub converted: usize,
    pub failed: usize,
    pub size_before: u64,
    pub size_after: u64,
}

impl RunSummary {
    pub fn savings(&self) -> i64 {
        self.size_before as i64 - self.size_after as i64
    }

    pub fn size_line(&self) -> String {
        format!(
            "Before and after size of the directory: {} / {}",
            readable_bytes(self.size_before as i64),
            readable_bytes(self.size_after as i64)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_bytes() {
        assert_eq!(readable_bytes(0), "0.0 bytes");
        assert_eq!(readable_bytes(512), "512.0 bytes");
        assert_eq!(readable_bytes(1536), "1.5 KB");
        assert_eq!(readable_bytes(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(readable_bytes(5 * 1024 * 1024 * 1024), "5.0 GB");
        assert_eq!(readable_bytes(2048 * 1024_i64.pow(4)), "2048.0 TB");
    }

    #[test]
    fn test_readable_bytes_negative() {
        assert_eq!(readable_bytes(-2048), "-2.0 KB");
        assert_eq!(readable_bytes(-10), "-10.0 bytes");
    }

    #[test]
    fn test_savings_tracker() {
        let mut tracker = SavingsTracker::default();
        tracker.record(1000, 400);
        assert_eq!(tracker.savings(), 600);
        assert!(tracker.indicator().starts_with("📉"));

        tracker.record(100, 900);
        assert_eq!(tracker.savings(), -200);
        assert!(tracker.indicator().starts_with("📈"));
        assert_eq!(
            tracker.status_line(),
            "Current space savings in total: -200.0 bytes 📈 (Size is bigger than before.)"
        );
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            root: "/photos".to_string(),
            total_files: 4,
            candidates: 3,
            converted: 2,
            failed: 1,
            size_before: 4096,
            size_after: 1024,
        };
        assert_eq!(summary.savings(), 3072);
        assert_eq!(
            summary.size_line(),
            "Before and after size of the directory: 4.0 KB / 1.0 KB"
        );

        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["converted"], 2);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["root"], "/photos");
    }
}
