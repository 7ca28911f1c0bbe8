//! Object admission filter
//!
//! A listed object is admitted when it is strictly newer than the
//! watermark and is not a zero-byte folder marker. The two conditions are
//! independent; page boundaries never affect the outcome.

use crate::domain::{ObjectRecord, Watermark};

/// Whether an object passes the incremental filter for the given watermark
pub fn admits(watermark: Watermark, record: &ObjectRecord) -> bool {
    watermark.admits(record.last_modified) && !record.is_folder_marker()
}

/// Filter one page of entries, preserving backend order
pub fn filter_page(watermark: Watermark, entries: Vec<ObjectRecord>) -> Vec<ObjectRecord> {
    entries
        .into_iter()
        .filter(|record| admits(watermark, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use test_case::test_case;

    fn record(key: &str, minute: u32, size: u64) -> ObjectRecord {
        ObjectRecord::new(
            key,
            Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap(),
            size,
        )
    }

    #[test_case("data/a.csv", 30, 1024, true; "newer regular object admitted")]
    #[test_case("data/a.csv", 0, 1024, false; "older regular object rejected")]
    #[test_case("data/a.csv", 15, 1024, false; "equal timestamp rejected")]
    #[test_case("data/dir_$folder$", 30, 0, false; "zero byte folder marker rejected")]
    #[test_case("data/dir_$folder$", 30, 12, true; "non empty marker named object admitted")]
    #[test_case("data/report_$folder$.bak", 30, 0, true; "suffix not at end admitted")]
    #[test_case("data/empty.txt", 30, 0, true; "zero byte regular object admitted")]
    fn test_admits(key: &str, minute: u32, size: u64, expected: bool) {
        let watermark = Watermark::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 15, 0).unwrap());
        assert_eq!(admits(watermark, &record(key, minute, size)), expected);
    }

    #[test]
    fn test_unset_watermark_admits_everything_but_markers() {
        let watermark = Watermark::unset();

        assert!(admits(watermark, &record("old.csv", 0, 10)));
        assert!(!admits(watermark, &record("dir_$folder$", 0, 0)));
    }

    #[test]
    fn test_filter_page_preserves_order() {
        let watermark = Watermark::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let entries = vec![
            record("c.csv", 10, 1),
            record("a.csv", 20, 1),
            record("skip_$folder$", 30, 0),
            record("b.csv", 30, 1),
        ];

        let kept = filter_page(watermark, entries);
        let keys: Vec<&str> = kept.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["c.csv", "a.csv", "b.csv"]);
    }
}
