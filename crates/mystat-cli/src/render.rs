//! Plain-text tables for the records the client returns.

use mystat_core::models::{Exam, NewsEntry, ScheduleEntry, StudentInfo};
use mystat_core::utils::{short_time, truncate_string};

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn schedule_table(title: &str, entries: &[ScheduleEntry]) -> String {
    let mut out = vec![format!("\n{}:", title), rule()];
    out.push(format!(
        "{:<12} {:<12} {:<20} {:<20} {:<10}",
        "Date", "Time", "Subject", "Teacher", "Room"
    ));
    out.push(rule());

    if entries.is_empty() {
        out.push("No lessons".to_string());
    }
    for entry in entries {
        let time = format!(
            "{}-{}",
            short_time(&entry.started_at),
            short_time(&entry.finished_at)
        );
        out.push(format!(
            "{:<12} {:<12} {:<20} {:<20} {:<10}",
            entry.date,
            time,
            truncate_string(&entry.subject_name, 18),
            truncate_string(&entry.teacher_name, 18),
            entry.room_name
        ));
    }
    out.join("\n")
}

pub fn news_table(entries: &[NewsEntry]) -> String {
    let mut out = vec!["\nLatest news:".to_string(), rule()];
    if entries.is_empty() {
        out.push("No news".to_string());
    }
    for entry in entries {
        out.push(format!(
            "{:<8} {:<20} {}",
            entry.id_bbs,
            entry.time,
            truncate_string(&entry.theme, 48)
        ));
    }
    out.join("\n")
}

pub fn exam_table(title: &str, exams: &[Exam]) -> String {
    let mut out = vec![format!("\n{}:", title), rule()];
    if exams.is_empty() {
        out.push("No exams".to_string());
    }
    for exam in exams {
        let mark = if exam.is_graded() {
            exam.mark.to_string()
        } else {
            "-".to_string()
        };
        out.push(format!(
            "{:<12} {:<30} {:<24} {:>4}",
            exam.date,
            truncate_string(&exam.spec, 28),
            truncate_string(&exam.teacher, 22),
            mark
        ));
    }
    out.join("\n")
}

pub fn leader_table(title: &str, students: &[StudentInfo]) -> String {
    let mut out = vec![format!("\n{}:", title), rule()];
    for student in students {
        out.push(format!(
            "{:>4}. {:<40} {:>8}",
            student.position,
            truncate_string(&student.full_name, 38),
            student.amount
        ));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_row_uses_short_times() {
        let entry = ScheduleEntry {
            date: "2024-05-13".to_string(),
            started_at: "09:00:00".to_string(),
            finished_at: "10:20:00".to_string(),
            room_name: "305".to_string(),
            subject_name: "Object-oriented programming in C++".to_string(),
            teacher_name: "Ivanova Olena".to_string(),
            lesson: 1,
        };
        let table = schedule_table("Today", &[entry]);
        assert!(table.contains("09:00-10:20"));
        assert!(table.contains("Object-oriented..."));
        assert!(!table.contains("No lessons"));
    }

    #[test]
    fn test_empty_schedule() {
        assert!(schedule_table("Tomorrow", &[]).contains("No lessons"));
    }
}
