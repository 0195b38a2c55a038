//! Application state owned by the render loop.

use std::time::Duration;

use crate::collector::{DriverInfo, InterfaceInfo};

use super::viewport::ViewportState;

/// Everything the loop needs between ticks, apart from the queue registry.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Monitored interface name.
    pub interface: String,
    /// Driver shown in the header, if known.
    pub driver: Option<DriverInfo>,
    /// Pause between ticks when no input arrived.
    pub poll_interval: Duration,
    pub viewport: ViewportState,
    /// Set by the exit key; checked before every tick.
    pub should_quit: bool,
}

impl AppState {
    /// Creates state for `info` with an empty (0×0) viewport until the terminal size is known.
    pub fn new(info: &InterfaceInfo, poll_interval: Duration) -> Self {
        Self {
            interface: info.name.clone(),
            driver: info.driver.clone(),
            poll_interval,
            viewport: ViewportState::new(info.queue_count, 0, 0),
            should_quit: false,
        }
    }

    /// Poll interval in whole milliseconds, as shown in the header.
    pub fn poll_millis(&self) -> u128 {
        self.poll_interval.as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let info = InterfaceInfo {
            name: "eth0".to_string(),
            queue_count: 4,
            driver: None,
        };
        let state = AppState::new(&info, Duration::from_millis(10));
        assert_eq!(state.interface, "eth0");
        assert_eq!(state.poll_millis(), 10);
        assert_eq!(state.viewport.queue_count(), 4);
        assert!(state.viewport.visible_range().is_empty());
        assert!(!state.should_quit);
    }
}
