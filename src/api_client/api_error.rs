use reqwest::Error as ReqwestError;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    ReqwestError(ReqwestError),
    JsonParseError(serde_json::Error),
    StatusError { code: u16 },
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::ReqwestError(e) => write!(f, "Request error: {}", e),
            ApiError::JsonParseError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::StatusError { code } => write!(f, "API error: {}", code),
            ApiError::Other(s) => write!(f, "Other error: {}", s),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ReqwestError> for ApiError {
    fn from(error: ReqwestError) -> Self {
        ApiError::ReqwestError(error)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::JsonParseError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let error = ApiError::StatusError { code: 500 };
        assert_eq!(error.to_string(), "API error: 500");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ApiError = parse_error.into();
        assert!(error.to_string().starts_with("JSON parse error"));
    }
}
