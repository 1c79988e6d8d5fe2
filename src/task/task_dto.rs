use crate::error::{AppError, Result};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use validator::Validate;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// `Low`, `Medium` (default) or `High`
    pub priority: Option<String>,
    /// `Todo` (default), `In Progress` or `Completed`
    pub status: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; empty means no due date
    pub due_date: Option<String>,
    /// Id of one of the caller's categories
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 500, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// `null` or `""` clears the due date
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
    /// `null` or `""` detaches the task from its category
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
}

/// Without `status` the task advances one step through the status cycle.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateTaskStatusRequest {
    /// An empty body selects the cycle step; anything else must be valid JSON.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_null_from_absent() {
        let absent: UpdateTaskRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.due_date, None);
        assert_eq!(absent.category, None);

        let cleared: UpdateTaskRequest =
            serde_json::from_str(r#"{"dueDate":null,"category":null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));
        assert_eq!(cleared.category, Some(None));

        let set: UpdateTaskRequest = serde_json::from_str(r#"{"dueDate":"2024-01-01"}"#).unwrap();
        assert_eq!(set.due_date, Some(Some("2024-01-01".to_string())));
    }

    #[test]
    fn status_body_is_empty_or_valid_json() {
        assert_eq!(UpdateTaskStatusRequest::from_body(b"").unwrap().status, None);
        assert_eq!(UpdateTaskStatusRequest::from_body(b" \n").unwrap().status, None);
        assert_eq!(UpdateTaskStatusRequest::from_body(b"{}").unwrap().status, None);
        assert_eq!(
            UpdateTaskStatusRequest::from_body(br#"{"status":"Completed"}"#)
                .unwrap()
                .status
                .as_deref(),
            Some("Completed")
        );

        let err = UpdateTaskStatusRequest::from_body(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn missing_title_fails_validation() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"description":"no title"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
