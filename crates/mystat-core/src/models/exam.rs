use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Exam {
    pub exam_id: i64,
    pub id_file: i64,
    pub mark: i64,
    pub mark_type: i64,
    pub need_access: i64,
    pub date: String,
    pub spec: String,
    pub teacher: String,
    pub comment_delete_file: Option<String>,
    pub comment_teach: Option<String>,
    pub ex_file_name: Option<String>,
    pub file_path: Option<String>,
    pub need_access_stud: Option<bool>,
}

impl Exam {
    /// A mark of zero means the exam has not been graded yet
    pub fn is_graded(&self) -> bool {
        self.mark > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exam_with_nulls() {
        let json = r#"{"exam_id":31,"id_file":0,"mark":0,"mark_type":1,"need_access":0,"date":"2024-06-10","spec":"Python","teacher":"Petrenko Ivan","comment_delete_file":null,"comment_teach":null,"ex_file_name":null,"file_path":null,"need_access_stud":null}"#;
        let exam: Exam = serde_json::from_str(json).expect("Failed to parse exam JSON");
        assert_eq!(exam.exam_id, 31);
        assert_eq!(exam.comment_teach, None);
        assert!(!exam.is_graded());
    }
}
