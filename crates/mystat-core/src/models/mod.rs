//! Data models for MyStat entities.
//!
//! This module contains the records returned by the accessor methods:
//!
//! - `ScheduleEntry`: timetable lessons
//! - Progress types: `Review`, `LessonVisit`, `AttendanceEntry`, `StudentInfo`, `ActivityEntry`
//! - `NewsEntry`, `NewsDetails`: portal announcements
//! - `Exam`: past and upcoming exams
//! - Homework inputs: `HomeworkType`, `HomeworkStatus`, `HomeworkUpload`, `HomeworkId`
//! - `UserInfo`: the profile summary used to resolve the group id

pub mod exam;
pub mod homework;
pub mod news;
pub mod progress;
pub mod schedule;
pub mod user;

pub use exam::Exam;
pub use homework::{HomeworkId, HomeworkStatus, HomeworkType, HomeworkUpload};
pub use news::{NewsDetails, NewsEntry};
pub use progress::{
    AchievementName, ActivityEntry, AttendanceEntry, GamingPointType, LessonVisit, PointTypeName,
    Review, StudentInfo,
};
pub use schedule::ScheduleEntry;
pub use user::UserInfo;
