use std::sync::Arc;

use anyhow::Result;
use medwaste_core::{
    config::RunConfig,
    service::{BatchReport, EmissionService},
};
use tokio::task::JoinSet;

pub(crate) struct App {
    pub(crate) service: Arc<EmissionService>,
    pub(crate) config: Arc<RunConfig>,
}

impl App {
    pub(crate) fn new(service: Arc<EmissionService>, config: Arc<RunConfig>) -> Self {
        Self { service, config }
    }

    /// Evaluate every planned cell on the blocking pool, keeping plan order.
    pub(crate) async fn run(&self) -> Result<BatchReport> {
        let cells = self.service.plan(&self.config);
        tracing::info!(cells = cells.len(), "evaluating batch");

        let mut tasks = JoinSet::new();
        for (index, cell) in cells.into_iter().enumerate() {
            let service = Arc::clone(&self.service);
            let config = Arc::clone(&self.config);
            tasks.spawn_blocking(move || (index, service.evaluate_cell(&cell, &config.composition)));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined?);
        }
        outcomes.sort_unstable_by_key(|(index, _)| *index);

        Ok(BatchReport {
            cells: outcomes.into_iter().map(|(_, outcome)| outcome).collect(),
        })
    }
}
