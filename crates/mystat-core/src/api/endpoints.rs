//! Typed accessors for the individual MyStat endpoints.

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::models::{
    ActivityEntry, AttendanceEntry, Exam, HomeworkId, HomeworkStatus, HomeworkType, HomeworkUpload,
    LessonVisit, NewsDetails, NewsEntry, Review, ScheduleEntry, StudentInfo, UserInfo,
};
use crate::utils::{format_date, today};

use super::client::decode_object;
use super::payload::{FormField, Payload};
use super::{ApiClient, ApiError, Result};

const HOMEWORK_LIST_PATH: &str = "homework/operations/list";
const HOMEWORK_CREATE_PATH: &str = "homework/operations/create";
const HOMEWORK_DELETE_PATH: &str = "homework/operations/delete";

impl ApiClient {
    // ===== User Information =====

    pub async fn get_user_info(&self) -> Result<Option<UserInfo>> {
        self.get_object("settings/user-info").await
    }

    pub async fn get_user_settings(&self) -> Result<Option<Value>> {
        self.get_object("profile/operations/settings").await
    }

    // ===== Schedule =====

    /// Lessons of the month containing `date` (defaults to today)
    pub async fn get_month_schedule(&self, date: Option<NaiveDate>) -> Result<Vec<ScheduleEntry>> {
        let date = format_date(date.unwrap_or_else(today));
        self.get_list(&format!("schedule/operations/get-month?date_filter={}", date))
            .await
    }

    /// Lessons on `date` (defaults to today)
    pub async fn get_schedule_by_date(&self, date: Option<NaiveDate>) -> Result<Vec<ScheduleEntry>> {
        let date = format_date(date.unwrap_or_else(today));
        self.get_list(&format!("schedule/operations/get-by-date?date_filter={}", date))
            .await
    }

    // ===== Reviews and Progress =====

    pub async fn get_reviews(&self) -> Result<Vec<Review>> {
        self.get_list("reviews/index/list").await
    }

    pub async fn get_visits(&self) -> Result<Vec<LessonVisit>> {
        self.get_list("progress/operations/student-visits").await
    }

    pub async fn get_attendance(&self) -> Result<Vec<AttendanceEntry>> {
        self.get_list("dashboard/chart/attendance").await
    }

    // ===== Homework =====

    pub async fn get_homework_by_type(
        &self,
        page: u32,
        homework_type: HomeworkType,
    ) -> Result<Option<Value>> {
        let group_id = self.resolve_group_id().await?;
        self.get_object(&format!(
            "{}?page={}&type={}&group_id={}",
            HOMEWORK_LIST_PATH,
            page,
            homework_type.code(),
            group_id
        ))
        .await
    }

    pub async fn get_homework_list(
        &self,
        page: u32,
        status: HomeworkStatus,
        homework_type: HomeworkType,
    ) -> Result<Option<Value>> {
        let group_id = self.resolve_group_id().await?;
        self.get_object(&format!(
            "{}?page={}&status={}&type={}&group_id={}",
            HOMEWORK_LIST_PATH,
            page,
            status.code(),
            homework_type.code(),
            group_id
        ))
        .await
    }

    /// Submit an answer, optionally with an attachment read from disk.
    pub async fn upload_homework(&self, upload: &HomeworkUpload) -> Result<Option<Value>> {
        let mut fields = vec![
            FormField::text("id", upload.homework_id.to_string()),
            FormField::text("spentTimeHour", upload.spent_time_hour.to_string()),
            FormField::text("spentTimeMin", upload.spent_time_min.to_string()),
        ];

        if let Some(text) = upload.answer_text.as_deref().filter(|t| !t.is_empty()) {
            fields.push(FormField::text("answerText", text));
        }

        if let Some(path) = &upload.file {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "answer".to_string());
            fields.push(FormField::file("file", file_name, bytes));
        }

        let form = Payload::Multipart(fields);
        debug!(
            homework_id = upload.homework_id,
            fields = ?form.field_names(),
            "Uploading homework answer"
        );

        let payload = self
            .authenticated_request(Method::POST, HOMEWORK_CREATE_PATH, &form)
            .await?;
        decode_object(HOMEWORK_CREATE_PATH, payload)
    }

    /// Delete a submitted answer. Returns `false` when the provider answers `null`.
    pub async fn delete_homework(&self, homework_id: impl Into<HomeworkId>) -> Result<bool> {
        let body = serde_json::json!({ "id": homework_id.into() });
        let response = self
            .dispatch(Method::POST, HOMEWORK_DELETE_PATH, &Payload::Json(body))
            .await?;

        Ok(matches!(response, Some(text) if text.trim() != "null"))
    }

    /// Group id from the session, fetched from the user profile the first time.
    async fn resolve_group_id(&self) -> Result<i64> {
        if let Some(group_id) = self.session().group_id().await? {
            return Ok(group_id);
        }

        debug!("Group id unknown, fetching user info");
        let group_id = self
            .get_user_info()
            .await?
            .and_then(|info| info.current_group_id)
            .ok_or(ApiError::GroupUnresolved)?;

        self.session().set_group_id(group_id).await?;
        Ok(group_id)
    }

    // ===== News =====

    pub async fn get_latest_news(&self) -> Result<Vec<NewsEntry>> {
        self.get_list("news/operations/latest-news").await
    }

    pub async fn get_news_details(&self, news_id: i64) -> Result<Option<NewsDetails>> {
        self.get_object(&format!("news/operations/detail-news?news_id={}", news_id))
            .await
    }

    // ===== Exams =====

    pub async fn get_all_exams(&self) -> Result<Vec<Exam>> {
        self.get_list("progress/operations/student-exams").await
    }

    pub async fn get_future_exams(&self) -> Result<Vec<Exam>> {
        self.get_list("dashboard/info/future-exams").await
    }

    // ===== Students and Groups =====

    pub async fn get_stream_leaders(&self) -> Result<Vec<StudentInfo>> {
        self.get_list("dashboard/progress/leader-stream").await
    }

    pub async fn get_group_leaders(&self) -> Result<Vec<StudentInfo>> {
        self.get_list("dashboard/progress/leader-group").await
    }

    pub async fn get_activity(&self) -> Result<Vec<ActivityEntry>> {
        self.get_list("dashboard/progress/activity").await
    }

    pub async fn get_activity_log(&self) -> Result<Vec<Value>> {
        self.get_list("dashboard/progress/activity-web").await
    }

    pub async fn get_group_info(&self) -> Result<Vec<Value>> {
        self.get_list("homework/settings/group-history").await
    }

    pub async fn get_homework_count(&self) -> Result<Vec<Value>> {
        self.get_list("count/homework").await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::tests::{config, login_ok, ready_client};
    use crate::auth::now_millis;

    fn schedule_json() -> Value {
        json!([
            {"date": "2024-05-13", "lesson": 1, "started_at": "09:00:00", "finished_at": "10:20:00",
             "teacher_name": "Ivanova Olena", "subject_name": "Databases", "room_name": "305"},
            {"date": "2024-05-13", "lesson": 2, "started_at": "10:30:00", "finished_at": "11:50:00",
             "teacher_name": "Petrenko Ivan", "subject_name": "Python", "room_name": "Lab 2"}
        ])
    }

    #[tokio::test]
    async fn test_login_then_schedule_by_date() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(login_ok("fresh"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/schedule/operations/get-by-date"))
            .and(query_param("date_filter", "2024-05-13"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::connect(config(&server)).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
        let lessons = client.get_schedule_by_date(Some(date)).await.unwrap();

        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].lesson, 1);
        assert_eq!(lessons[0].subject_name, "Databases");
        assert_eq!(lessons[0].room_name, "305");
        assert_eq!(lessons[1].teacher_name, "Petrenko Ivan");
        assert_eq!(lessons[1].started_at, "10:30:00");
        assert_eq!(lessons[1].finished_at, "11:50:00");
    }

    #[tokio::test]
    async fn test_month_schedule_defaults_to_today() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule/operations/get-month"))
            .and(query_param("date_filter", format_date(today()).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedule_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        assert_eq!(client.get_month_schedule(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reviews/index/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"date": "2024-05-01"}])))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        match client.get_reviews().await {
            Err(ApiError::Decode { path, .. }) => assert_eq!(path, "reviews/index/list"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_news_details_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/operations/detail-news"))
            .and(query_param("news_id", "17"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id_bbs": 17, "is_viewed": false, "text_bbs": "<p>Session starts Monday</p>",
                "theme": "Session", "time": "2024-05-10 09:00:00"
            })))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        let details = client.get_news_details(17).await.unwrap().expect("details");
        assert_eq!(details.id_bbs, 17);
        assert_eq!(details.plain_text(), "Session starts Monday");
    }

    #[tokio::test]
    async fn test_homework_list_resolves_group_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings/user-info"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"current_group_id": 321, "full_name": "Student One"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/homework/operations/list"))
            .and(query_param("page", "2"))
            .and(query_param("status", "3"))
            .and(query_param("type", "1"))
            .and(query_param("group_id", "321"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(2)
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        for _ in 0..2 {
            let page = client
                .get_homework_list(2, HomeworkStatus::Active, HomeworkType::Lab)
                .await
                .unwrap();
            assert_eq!(page, Some(json!({"data": []})));
        }
        assert_eq!(client.session_snapshot().await.unwrap().group_id, Some(321));
    }

    #[tokio::test]
    async fn test_configured_group_id_skips_user_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings/user-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/homework/operations/list"))
            .and(query_param("type", "0"))
            .and(query_param("group_id", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(&server)
            .with_token("token", now_millis() + 60_000)
            .with_group_id(8);
        let client = ApiClient::connect(cfg).await.unwrap();
        client
            .get_homework_by_type(1, HomeworkType::Homework)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_group_id_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings/user-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"full_name": "No Group"})))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        let result = client.get_homework_by_type(1, HomeworkType::Homework).await;
        assert!(matches!(result, Err(ApiError::GroupUnresolved)));
        assert_eq!(client.session_snapshot().await.unwrap().group_id, None);
    }

    #[tokio::test]
    async fn test_delete_homework_null_means_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/delete"))
            .and(body_json(json!({"id": 999})))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/delete"))
            .and(body_json(json!({"id": "12"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        assert!(!client.delete_homework(999).await.unwrap());
        assert!(client.delete_homework("12").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_homework_failure_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/delete"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"message":"locked"}"#))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        match client.delete_homework(1).await {
            Err(ApiError::RequestFailed { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("locked"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_homework_sends_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/create"))
            .and(header("authorization", "Bearer token"))
            .and(body_string_contains("name=\"id\""))
            .and(body_string_contains("name=\"spentTimeHour\""))
            .and(body_string_contains("name=\"answerText\""))
            .and(body_string_contains("filename=\"answer.txt\""))
            .and(body_string_contains("print('hi')"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 55})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("answer.txt");
        std::fs::File::create(&file_path)
            .unwrap()
            .write_all(b"print('hi')")
            .unwrap();

        let client = ready_client(&server, "token").await;
        let upload = HomeworkUpload::new(55)
            .with_answer("see attachment")
            .with_file(&file_path)
            .with_spent_time(1, 30);
        let result = client.upload_homework(&upload).await.unwrap();
        assert_eq!(result, Some(json!({"id": 55})));
    }

    #[tokio::test]
    async fn test_upload_homework_rejection_is_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/create"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!([{"field": "id", "message": "closed"}])))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        let result = client.upload_homework(&HomeworkUpload::new(1)).await;
        assert!(matches!(result, Err(ApiError::RequestFailed { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_upload_retries_with_same_form_after_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(login_ok("renewed"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/create"))
            .and(header("authorization", "Bearer revoked"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/homework/operations/create"))
            .and(header("authorization", "Bearer renewed"))
            .and(body_string_contains("name=\"spentTimeMin\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ready_client(&server, "revoked").await;
        let result = client
            .upload_homework(&HomeworkUpload::new(3).with_answer("done"))
            .await
            .unwrap();
        assert_eq!(result, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_leaders_and_activity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/progress/leader-group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "position": 1, "amount": 420, "full_name": "Top Student", "photo_path": ""}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/count/homework"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"counter_type": 0, "counter": 4}])))
            .mount(&server)
            .await;

        let client = ready_client(&server, "token").await;
        let leaders = client.get_group_leaders().await.unwrap();
        assert_eq!(leaders[0].full_name, "Top Student");
        assert_eq!(leaders[0].amount, 420);

        let counters = client.get_homework_count().await.unwrap();
        assert_eq!(counters[0]["counter"], 4);
    }
}
