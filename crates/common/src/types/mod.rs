use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Numeric codes carried in [`Envelope::code`]. They mirror the HTTP status of the response.
pub mod code {
    pub const SUCCESS: u16 = 200;
    pub const INVALID_ARGUMENT: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Uniform response wrapper for every API endpoint.
///
/// ```json
/// {"flag": true, "code": 200, "message": "Find One Success", "data": {...}}
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T = serde_json::Value> {
    pub flag: bool,
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self { flag: true, code: code::SUCCESS, message: message.into(), data: Some(data) }
    }

    pub fn failure(code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self { flag: false, code, message: message.into(), data }
    }
}

impl Envelope<()> {
    /// Success without payload; `data` serializes as `null`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self { flag: true, code: code::SUCCESS, message: message.into(), data: None }
    }
}
