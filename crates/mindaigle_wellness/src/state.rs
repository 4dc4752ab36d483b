use metrics_exporter_prometheus::PrometheusHandle;

use crate::services::WellnessService;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub service: WellnessService,
    /// `None` when no Prometheus recorder was installed (tests).
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: WellnessService) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
