use chrono::{DateTime, Utc};

/// Discord 纪元 2015-01-01T00:00:00Z（毫秒）
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// 从雪花 ID 的高 42 位取出创建时间
pub fn created_at(id: u64) -> Option<DateTime<Utc>> {
    let offset = i64::try_from(id >> 22).ok()?;
    DateTime::from_timestamp_millis(DISCORD_EPOCH_MS + offset)
}
