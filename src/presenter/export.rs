use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::lookup::ResultRecord;

pub const CSV_HEADER: [&str; 6] = [
    "id",
    "username",
    "global_name",
    "created_at_fmt",
    "avatar_url",
    "status",
];

/// 表头固定写入一行，即使没有记录
pub fn to_csv(records: &[ResultRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("discord_export_{}.csv", now.format("%H%M"))
}

/// 已完成批次的内存存储，超过容量时淘汰最旧的
#[derive(Clone)]
pub struct ExportStore {
    capacity: usize,
    entries: Arc<RwLock<VecDeque<(Uuid, Arc<Vec<ResultRecord>>)>>>,
}

impl ExportStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    pub async fn insert(&self, records: Vec<ResultRecord>) -> Uuid {
        let batch_id = Uuid::new_v4();

        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            if let Some((evicted, _)) = entries.pop_front() {
                tracing::debug!("Evicting export {}", evicted);
            }
        }
        entries.push_back((batch_id, Arc::new(records)));
        batch_id
    }

    pub async fn get(&self, batch_id: &Uuid) -> Option<Arc<Vec<ResultRecord>>> {
        self.entries
            .read()
            .await
            .iter()
            .find(|(id, _)| id == batch_id)
            .map(|(_, records)| records.clone())
    }
}
