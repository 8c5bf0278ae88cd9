use crate::error::AppResult;
use crate::validation::{parse_time_of_day, validate_day};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Time-of-day / day-of-week window during which listed sites are blocked.
///
/// An absent or disabled schedule means "always block when listed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Day numbers (0=Sunday, 6=Saturday). `None` means every day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u8>>,
    /// Start time in HH:MM format (24-hour).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End time in HH:MM format (24-hour). May be earlier than the start,
    /// in which case the window crosses midnight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl ScheduleConfig {
    /// Schedule written on first install: weekdays 09:00-17:00, switched off.
    pub fn install_default() -> Self {
        Self {
            enabled: false,
            days: Some(vec![1, 2, 3, 4, 5]),
            start_time: Some("09:00".to_string()),
            end_time: Some("17:00".to_string()),
        }
    }

    /// Check if this schedule applies to the given day (0=Sunday).
    pub fn applies_to_day(&self, day: u32) -> bool {
        match &self.days {
            Some(days) => days.iter().any(|d| u32::from(*d) == day),
            None => true,
        }
    }

    /// Start and end as minutes since midnight, when both are set.
    pub fn window_minutes(&self) -> AppResult<Option<(u32, u32)>> {
        match (non_empty(self.start_time.as_deref()), non_empty(self.end_time.as_deref())) {
            (Some(start), Some(end)) => Ok(Some((parse_time_of_day(start)?, parse_time_of_day(end)?))),
            _ => Ok(None),
        }
    }

    /// Check if blocking is in force on `day` (0=Sunday) at `minutes` since midnight.
    ///
    /// Both window ends are inclusive. A window whose start is after its end
    /// wraps past midnight.
    pub fn is_active_at(&self, day: u32, minutes: u32) -> AppResult<bool> {
        if !self.enabled {
            return Ok(true);
        }

        if !self.applies_to_day(day) {
            return Ok(false);
        }

        let Some((start, end)) = self.window_minutes()? else {
            return Ok(true);
        };

        if start <= end {
            Ok(start <= minutes && minutes <= end)
        } else {
            Ok(minutes >= start || minutes <= end)
        }
    }

    /// Evaluate the schedule against a local wall-clock time.
    pub fn should_block_at(&self, now: NaiveDateTime) -> AppResult<bool> {
        let day = now.weekday().num_days_from_sunday();
        let minutes = now.hour() * 60 + now.minute();
        self.is_active_at(day, minutes)
    }

    /// Strict check applied before a schedule is saved.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(days) = &self.days {
            for day in days {
                validate_day(*day)?;
            }
        }
        if let Some(start) = non_empty(self.start_time.as_deref()) {
            parse_time_of_day(start)?;
        }
        if let Some(end) = non_empty(self.end_time.as_deref()) {
            parse_time_of_day(end)?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schedule(days: Option<Vec<u8>>, start: &str, end: &str) -> ScheduleConfig {
        ScheduleConfig {
            enabled: true,
            days,
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_disabled_always_blocks() {
        let mut s = schedule(Some(vec![1]), "09:00", "10:00");
        s.enabled = false;
        for day in 0..7 {
            for minutes in [0, 59, 600, 1439] {
                assert!(s.is_active_at(day, minutes).unwrap());
            }
        }
        assert!(ScheduleConfig::default().is_active_at(3, 720).unwrap());
    }

    #[test]
    fn test_disabled_ignores_malformed_times() {
        let mut s = schedule(None, "bogus", "17:00");
        s.enabled = false;
        assert!(s.is_active_at(2, 600).unwrap());
    }

    #[test]
    fn test_same_day_window_is_inclusive() {
        let s = schedule(None, "09:00", "17:00");
        assert!(!s.is_active_at(2, 539).unwrap());
        assert!(s.is_active_at(2, 540).unwrap());
        assert!(s.is_active_at(2, 720).unwrap());
        assert!(s.is_active_at(2, 1020).unwrap());
        assert!(!s.is_active_at(2, 1021).unwrap());
    }

    #[test]
    fn test_zero_length_window_blocks_single_minute() {
        let s = schedule(None, "12:00", "12:00");
        assert!(!s.is_active_at(2, 719).unwrap());
        assert!(s.is_active_at(2, 720).unwrap());
        assert!(!s.is_active_at(2, 721).unwrap());
    }

    #[test]
    fn test_midnight_crossing_window() {
        let s = schedule(None, "22:00", "06:00");
        assert!(s.is_active_at(2, 23 * 60 + 30).unwrap());
        assert!(s.is_active_at(2, 5 * 60).unwrap());
        assert!(s.is_active_at(2, 22 * 60).unwrap());
        assert!(s.is_active_at(2, 6 * 60).unwrap());
        assert!(!s.is_active_at(2, 12 * 60).unwrap());
        assert!(!s.is_active_at(2, 6 * 60 + 1).unwrap());
    }

    #[test]
    fn test_unlisted_day_never_blocks() {
        let s = schedule(Some(vec![1, 2, 3, 4, 5]), "00:00", "23:59");
        assert!(!s.is_active_at(0, 720).unwrap());
        assert!(!s.is_active_at(6, 720).unwrap());
        assert!(s.is_active_at(1, 720).unwrap());
    }

    #[test]
    fn test_days_without_window_blocks_all_day() {
        let s = ScheduleConfig {
            enabled: true,
            days: Some(vec![6]),
            start_time: None,
            end_time: Some("17:00".into()),
        };
        assert!(s.is_active_at(6, 0).unwrap());
        assert!(s.is_active_at(6, 1439).unwrap());
        assert!(!s.is_active_at(5, 600).unwrap());
    }

    #[test]
    fn test_empty_time_strings_count_as_absent() {
        let s = schedule(None, "", "");
        assert!(s.is_active_at(4, 300).unwrap());
    }

    #[test]
    fn test_malformed_time_is_config_error() {
        let s = schedule(None, "9am", "17:00");
        let err = s.is_active_at(2, 600).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }

    #[test]
    fn test_should_block_at_uses_weekday_and_minutes() {
        let s = schedule(Some(vec![1, 2, 3, 4, 5]), "09:00", "17:00");
        // 2024-01-02 is a Tuesday, 2024-01-06 a Saturday.
        assert!(s.should_block_at(at(2024, 1, 2, 10, 0)).unwrap());
        assert!(!s.should_block_at(at(2024, 1, 6, 10, 0)).unwrap());
        assert!(!s.should_block_at(at(2024, 1, 2, 20, 0)).unwrap());
    }

    #[test]
    fn test_sunday_is_day_zero() {
        let s = schedule(Some(vec![0]), "00:00", "23:59");
        // 2024-01-07 is a Sunday.
        assert!(s.should_block_at(at(2024, 1, 7, 8, 15)).unwrap());
        assert!(!s.should_block_at(at(2024, 1, 8, 8, 15)).unwrap());
    }

    #[test]
    fn test_validate() {
        assert!(ScheduleConfig::install_default().validate().is_ok());
        assert!(schedule(Some(vec![7]), "09:00", "17:00").validate().is_err());
        assert!(schedule(None, "24:00", "17:00").validate().is_err());
        assert!(schedule(None, "09:00", "17:xx").validate().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_value(ScheduleConfig::install_default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "enabled": false,
                "days": [1, 2, 3, 4, 5],
                "startTime": "09:00",
                "endTime": "17:00"
            })
        );

        let partial: ScheduleConfig = serde_json::from_str(r#"{"enabled":true}"#).unwrap();
        assert!(partial.enabled);
        assert!(partial.days.is_none());
    }
}
