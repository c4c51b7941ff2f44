use serde::{Deserialize, Serialize};

/// Teacher feedback left for the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Review {
    pub date: String,
    pub full_spec: String,
    pub message: String,
    pub spec: String,
    pub teacher: String,
}

/// Attendance and marks for a single lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LessonVisit {
    pub spec_id: i64,
    pub lesson_number: i64,
    pub status_was: i64,
    pub class_work_mark: Option<i64>,
    pub control_work_mark: Option<i64>,
    pub home_work_mark: Option<i64>,
    pub lab_work_mark: Option<i64>,
    pub date_visit: String,
    pub spec_name: String,
    pub lesson_theme: String,
    pub teacher_name: String,
}

impl LessonVisit {
    /// Every mark given for this lesson, in class/control/home/lab order
    pub fn marks(&self) -> Vec<i64> {
        [
            self.class_work_mark,
            self.control_work_mark,
            self.home_work_mark,
            self.lab_work_mark,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AttendanceEntry {
    pub date: String,
    pub has_rasp: bool,
    pub points: Option<i64>,
    pub previous_points: Option<i64>,
}

/// A position on the group or stream leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StudentInfo {
    pub id: i64,
    pub position: i64,
    pub amount: i64,
    pub full_name: String,
    pub photo_path: String,
}

/// One gamification event (points earned for a visit, mark, homework...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ActivityEntry {
    pub achievements_id: i64,
    pub achievements_type: i64,
    pub action: i64,
    pub badge: i64,
    pub current_point: i64,
    pub point_types_id: i64,
    pub subject_mark: Option<i64>,
    pub date: String,
    pub achievements_name: String,
    pub point_types_name: String,
    pub subject_name: Option<String>,
    pub old_competition: bool,
}

impl ActivityEntry {
    pub fn achievement(&self) -> Option<AchievementName> {
        AchievementName::from_code(&self.achievements_name)
    }

    pub fn point_type(&self) -> Option<PointTypeName> {
        PointTypeName::from_code(&self.point_types_name)
    }

    pub fn gaming_point_type(&self) -> Option<GamingPointType> {
        GamingPointType::from_code(self.point_types_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamingPointType {
    Gems,
    Coins,
}

impl GamingPointType {
    pub fn code(&self) -> i64 {
        match self {
            GamingPointType::Gems => 1,
            GamingPointType::Coins => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        [GamingPointType::Gems, GamingPointType::Coins]
            .into_iter()
            .find(|p| p.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementName {
    LessonRate,
    PairVisit,
    Assessment,
    HomeworkCompleted,
}

impl AchievementName {
    pub fn code(&self) -> &'static str {
        match self {
            AchievementName::LessonRate => "EVALUATION_LESSON_MARK",
            AchievementName::PairVisit => "PAIR_VISIT",
            // The provider spells it with a single S
            AchievementName::Assessment => "ASSESMENT",
            AchievementName::HomeworkCompleted => "HOMETASK_INTIME",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [
            AchievementName::LessonRate,
            AchievementName::PairVisit,
            AchievementName::Assessment,
            AchievementName::HomeworkCompleted,
        ]
        .into_iter()
        .find(|a| a.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTypeName {
    Diamond,
    Coin,
}

impl PointTypeName {
    pub fn code(&self) -> &'static str {
        match self {
            PointTypeName::Diamond => "DIAMOND",
            PointTypeName::Coin => "COIN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DIAMOND" => Some(PointTypeName::Diamond),
            "COIN" => Some(PointTypeName::Coin),
            _ => None,
        }
    }
}
