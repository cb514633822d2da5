use std::fmt;

/// Why a session ended without a local shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossReason {
    /// Nothing was read within the read timeout.
    Timeout,
    /// The remote end closed the channel.
    Closed,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossReason::Timeout => f.write_str("read timed out"),
            LossReason::Closed => f.write_str("connection closed"),
        }
    }
}
