use serde::{Deserialize, Serialize};

/// Body of `POST auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub application_key: &'a str,
    pub id_city: Option<i64>,
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login payload. Lifetimes are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in_access: i64,
    pub expires_in_refresh: i64,
    pub user_type: i64,
    #[serde(default)]
    pub city_data: serde_json::Value,
}

/// One validation message returned by a rejected login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The login endpoint answers with either a token set or a list of field errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthOutcome {
    Authenticated(LoginResponse),
    Rejected(Vec<FieldError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_successful_login() {
        let json = r#"{"access_token":"abc","refresh_token":"def","expires_in_access":3600,"expires_in_refresh":86400,"user_type":1,"city_data":{"id":12,"name":"Kyiv"}}"#;
        let outcome: AuthOutcome = serde_json::from_str(json).expect("valid login payload");
        match outcome {
            AuthOutcome::Authenticated(resp) => {
                assert_eq!(resp.access_token, "abc");
                assert_eq!(resp.expires_in_access, 3600);
                assert_eq!(resp.city_data["name"], "Kyiv");
            }
            AuthOutcome::Rejected(_) => unreachable!(),
        }
    }

    #[test]
    fn test_parse_rejected_login_keeps_order() {
        let json = r#"[{"field":"password","message":"Wrong password"},{"field":"username","message":"Blocked"}]"#;
        let outcome: AuthOutcome = serde_json::from_str(json).expect("valid rejection payload");
        match outcome {
            AuthOutcome::Rejected(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        FieldError::new("password", "Wrong password"),
                        FieldError::new("username", "Blocked"),
                    ]
                );
            }
            AuthOutcome::Authenticated(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_login_request_sends_null_city() {
        let body = LoginRequest {
            application_key: "key",
            id_city: None,
            username: "student",
            password: "secret",
        };
        let json = serde_json::to_value(&body).expect("serializable");
        assert_eq!(json["id_city"], serde_json::Value::Null);
        assert_eq!(json["application_key"], "key");
    }
}
