use serde::{Deserialize, Serialize};

/// One lesson of the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ScheduleEntry {
    pub date: String,
    pub started_at: String,
    pub finished_at: String,
    pub room_name: String,
    pub subject_name: String,
    pub teacher_name: String,
    pub lesson: i64,
}

impl ScheduleEntry {
    /// `HH:MM-HH:MM`, dropping the seconds the API sends
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            crate::utils::short_time(&self.started_at),
            crate::utils::short_time(&self.finished_at)
        )
    }
}
