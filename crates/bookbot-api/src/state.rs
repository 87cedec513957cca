use std::sync::Arc;
use bookbot_graph::Graph;
use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The Graph keeps no per-question state, so one instance built at startup
/// serves every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub graph: Arc<Graph>,
}

impl AppState {
    pub fn new(config: Config, graph: Graph) -> Self {
        Self {
            config: Arc::new(config),
            graph: Arc::new(graph),
        }
    }
}
