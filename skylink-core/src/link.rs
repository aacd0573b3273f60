// Link state tracking for the telemetry stream.
// Transport mechanics live in the station crate; this module only decides what
// each lifecycle event means for connection state and the retry timer.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Lifecycle events fed by the transport loop, in arrival order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// `start()` was called, or a connect attempt is about to begin.
    ConnectRequested,
    /// The transport open completed.
    Opened,
    /// The transport closed or errored; open failure and mid-connection loss
    /// are treated identically.
    Lost,
    /// The pending retry timer fired.
    RetryElapsed,
    /// `stop()` was called.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkTransition {
    pub from: LinkState,
    pub to: LinkState,
}

/// Tracks connection state, whether a retry is armed, and whether the owner
/// asked to stop. At most one retry is ever armed at a time.
#[derive(Clone, Copy, Debug)]
pub struct LinkTracker {
    state: LinkState,
    retry_armed: bool,
    stopped: bool,
}

impl Default for LinkTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkTracker {
    pub fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            retry_armed: false,
            stopped: false,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// True only while the link is Connected.
    pub fn is_live(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn retry_armed(&self) -> bool {
        self.retry_armed
    }

    pub fn apply(&mut self, event: LinkEvent) -> Option<LinkTransition> {
        let from = self.state;
        let to = match event {
            LinkEvent::ConnectRequested => {
                self.stopped = false;
                self.retry_armed = false;
                match from {
                    LinkState::Disconnected => LinkState::Connecting,
                    other => other,
                }
            }
            LinkEvent::Opened => match from {
                LinkState::Connecting => {
                    // Defensive: no retry should be pending at this point.
                    self.retry_armed = false;
                    LinkState::Connected
                }
                other => other,
            },
            LinkEvent::Lost => match from {
                LinkState::Connecting | LinkState::Connected => {
                    self.retry_armed = !self.stopped;
                    LinkState::Disconnected
                }
                other => other,
            },
            LinkEvent::RetryElapsed => {
                if self.retry_armed && !self.stopped && from == LinkState::Disconnected {
                    self.retry_armed = false;
                    LinkState::Connecting
                } else {
                    from
                }
            }
            LinkEvent::Stopped => {
                self.stopped = true;
                self.retry_armed = false;
                LinkState::Disconnected
            }
        };

        self.state = to;
        (from != to).then_some(LinkTransition { from, to })
    }
}
