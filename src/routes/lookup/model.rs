use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lookup::ResultRecord;

#[derive(Debug, Deserialize)]
pub struct BatchLookupRequest {
    /// 多行原始文本，每行一个 ID
    #[serde(default)]
    pub ids: String,
}

#[derive(Debug, Serialize)]
pub struct BatchLookupResponse {
    pub batch_id: Uuid,
    pub total: usize,
    pub records: Vec<ResultRecord>,
}
