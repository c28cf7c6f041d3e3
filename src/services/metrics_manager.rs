use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    pub rule_hits: HashMap<String, u64>,
    pub fallback_hits: u64,
    pub accepted_messages: u64,
    pub ignored_messages: u64,
    /// Filled in at read time from the session registry.
    pub active_sessions: usize,
}

#[derive(Debug, Clone)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
        }
    }

    /// `None` records a fallback reply.
    pub async fn record_reply(&self, topic: Option<&str>) {
        let mut data = self.inner.write().await;
        match topic {
            Some(topic) => *data.rule_hits.entry(topic.to_string()).or_insert(0) += 1,
            None => data.fallback_hits += 1,
        }
    }

    pub async fn record_submission(&self, accepted: bool) {
        let mut data = self.inner.write().await;
        if accepted {
            data.accepted_messages += 1;
        } else {
            data.ignored_messages += 1;
        }
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}
