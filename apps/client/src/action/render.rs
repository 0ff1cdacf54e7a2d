use std::sync::{Mutex, PoisonError};

/// The UI seam. A controller calls these in lifecycle order and holds no
/// other reference to whatever draws the result.
pub trait RenderHook: Send + Sync {
    fn on_working(&self);
    fn on_succeeded(&self, value: &str);
    fn on_failed(&self, reason: &str);
}

/// One recorded render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Working,
    Succeeded(String),
    Failed(String),
}

/// Records every render call in order. Useful for headless callers that want
/// to inspect what would have been drawn.
#[derive(Debug, Default)]
pub struct RenderLog {
    events: Mutex<Vec<RenderEvent>>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, pred: impl Fn(&RenderEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }

    fn push(&self, event: RenderEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl RenderHook for RenderLog {
    fn on_working(&self) {
        self.push(RenderEvent::Working);
    }

    fn on_succeeded(&self, value: &str) {
        self.push(RenderEvent::Succeeded(value.to_string()));
    }

    fn on_failed(&self, reason: &str) {
        self.push(RenderEvent::Failed(reason.to_string()));
    }
}
