/// Load status of a table.
///
/// `Idle -> Loading -> (Ready | Failed)`; any dirty query change or refresh
/// moves `Ready`/`Failed` back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStatus {
    /// Nothing has been requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The latest request succeeded
    Ready,
    /// The latest request failed
    Failed,
}

impl TableStatus {
    /// Check if no request has been made
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if a request is in flight
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the latest request succeeded
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Check if the latest request failed
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}
