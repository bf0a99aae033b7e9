use log::info;

/// Prefixes every line with the component that emitted it.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn for_component(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }
}
