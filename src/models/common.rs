use serde::{Deserialize, Serialize};

/// JSON body of every failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
