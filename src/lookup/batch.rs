use serde::Serialize;
use tokio::sync::{Mutex, watch};

use super::record::ResultRecord;
use super::resolver::UserResolver;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub current_id: Option<String>,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// 顺序执行批量查询，同一时刻只允许一个批次
pub struct BatchDriver {
    running: Mutex<()>,
    progress: watch::Sender<Progress>,
}

impl Default for BatchDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchDriver {
    pub fn new() -> Self {
        Self {
            running: Mutex::new(()),
            progress: watch::Sender::new(Progress::default()),
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress.borrow().clone()
    }

    pub async fn run(&self, resolver: &UserResolver, ids: &[String]) -> Vec<ResultRecord> {
        self.run_with(resolver, ids, |_| {}).await
    }

    /// 每个 ID 完成后回调一次进度 `(index + 1) / total`
    pub async fn run_with<F>(
        &self,
        resolver: &UserResolver,
        ids: &[String],
        mut on_progress: F,
    ) -> Vec<ResultRecord>
    where
        F: FnMut(&Progress),
    {
        let _running = self.running.lock().await;
        let total = ids.len();
        tracing::info!("Starting batch of {} ids", total);
        self.progress.send_replace(Progress {
            completed: 0,
            total,
            current_id: None,
        });

        let mut results = Vec::with_capacity(total);
        for (index, id) in ids.iter().enumerate() {
            self.progress
                .send_modify(|progress| progress.current_id = Some(id.clone()));

            let record = resolver.resolve(id).await;
            tracing::debug!("{} -> {}", id, record.status.as_str());
            results.push(record);

            let progress = Progress {
                completed: index + 1,
                total,
                current_id: Some(id.clone()),
            };
            tracing::info!("Batch progress {}/{}", progress.completed, total);
            on_progress(&progress);
            self.progress.send_replace(progress);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::discord::LookupError;
    use crate::lookup::LookupStatus;
    use crate::lookup::testing::{FakeService, resolver, user};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn one_record_per_id_in_order() {
        let input = ids(&["3", "1", "2", "1"]);
        let driver = BatchDriver::new();
        let records = driver
            .run(&resolver(Arc::new(FakeService::found())), &input)
            .await;

        let got: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(got, vec!["3", "1", "2", "1"]);
    }

    #[tokio::test]
    async fn not_found_everywhere() {
        let driver = BatchDriver::new();
        let records = driver
            .run(&resolver(Arc::new(FakeService::not_found())), &ids(&["1", "2", "3"]))
            .await;

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.status == LookupStatus::NotFound));
        assert!(records.iter().all(|r| r.avatar_url.is_none()));
    }

    #[tokio::test]
    async fn errors_do_not_stop_the_batch() {
        let service = Arc::new(FakeService::new(|id| {
            if id == 2 {
                Err(LookupError::Api {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(user(id))
            }
        }));
        let driver = BatchDriver::new();
        let records = driver
            .run(&resolver(service.clone()), &ids(&["1", "2", "3"]))
            .await;

        let statuses: Vec<LookupStatus> = records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![LookupStatus::Success, LookupStatus::Error, LookupStatus::Success]
        );
        assert_eq!(service.connects(), 3);
    }

    #[tokio::test]
    async fn reports_progress_after_each_call() {
        let driver = BatchDriver::new();
        let mut seen = Vec::new();
        driver
            .run_with(
                &resolver(Arc::new(FakeService::found())),
                &ids(&["10", "20"]),
                |p| seen.push((p.completed, p.total, p.fraction())),
            )
            .await;

        assert_eq!(seen, vec![(1, 2, 0.5), (2, 2, 1.0)]);
        let last = driver.progress();
        assert_eq!(last.completed, 2);
        assert_eq!(last.current_id.as_deref(), Some("20"));
    }

    #[tokio::test]
    async fn empty_batch_touches_nothing() {
        let service = Arc::new(FakeService::found());
        let driver = BatchDriver::new();
        let records = driver.run(&resolver(service.clone()), &[]).await;

        assert!(records.is_empty());
        assert_eq!(service.connects(), 0);
        assert_eq!(driver.progress().fraction(), 0.0);
    }

    #[tokio::test]
    async fn concurrent_batches_never_overlap() {
        let service = Arc::new(FakeService::found().with_latency(Duration::from_millis(10)));
        let resolver = resolver(service.clone());
        let driver = BatchDriver::new();
        let first = ids(&["1", "2", "3"]);
        let second = ids(&["4", "5"]);

        let (a, b) = tokio::join!(
            driver.run(&resolver, &first),
            driver.run(&resolver, &second)
        );

        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 2);
        assert_eq!(service.connects(), 5);
        assert_eq!(service.max_in_flight(), 1);
    }
}
