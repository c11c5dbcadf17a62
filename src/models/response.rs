use serde::{Deserialize, Serialize};

/// Success envelope: `{"success": true, "message"?, "data"?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Collection envelope: `{"success": true, "data": [...], "total": n}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            success: true,
            total: data.len(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelopes_skip_absent_fields() {
        let body = serde_json::to_value(ApiResponse::message("Task deleted successfully")).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "Task deleted successfully"})
        );

        let body = serde_json::to_value(ApiResponse::data(1)).unwrap();
        assert_eq!(body, json!({"success": true, "data": 1}));
    }

    #[test]
    fn test_list_counts_items() {
        let body = serde_json::to_value(ListResponse::from(vec!["a", "b"])).unwrap();
        assert_eq!(body, json!({"success": true, "data": ["a", "b"], "total": 2}));
    }
}
