//! Parent-side combination of both partial minimums

use crate::error::Result;
use log::{error, warn};
use std::fmt;

/// Final result as seen by the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combined {
    pub parent: i32,
    /// Value used for the child; the parent's own when `degraded`
    pub child: i32,
    pub overall: i32,
    /// The child's value never arrived
    pub degraded: bool,
}

/// Combine the parent's partial with whatever the channel delivered
///
/// A failed receive is logged and the parent's partial stands in for the
/// child's. The run still succeeds; only `degraded` records the gap.
pub fn combine(parent: i32, received: Result<i32>) -> Combined {
    match received {
        Ok(child) => Combined {
            parent,
            child,
            overall: parent.min(child),
            degraded: false,
        },
        Err(e) => {
            error!("[Parent] {}", e);
            warn!("[Parent] Child result unavailable, using own partial {}", parent);
            Combined {
                parent,
                child: parent,
                overall: parent,
                degraded: true,
            }
        }
    }
}

impl fmt::Display for Combined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min(parent={}, child={}) = {}",
            self.parent, self.child, self.overall
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, ReadEnd};
    use crate::error::{PipeminError, ReadFailure};
    use crate::input::InputSequence;
    use crate::reduce::{Half, PartialMin};

    fn scenario() -> InputSequence {
        InputSequence::from_values([
            5, 900, 12, 44, 310, 87, 650, 19, 998, 71, 402, 56, 88, 230, 3, 777, 15, 61, 140,
            333,
        ])
    }

    #[test]
    fn received_value_wins_when_smaller() {
        let input = scenario();
        let parent = PartialMin::compute(&input, Half::First).value;
        let child = PartialMin::compute(&input, Half::Second).value;

        let combined = combine(parent, Ok(child));
        assert_eq!(combined.overall, 3);
        assert_eq!(combined.overall, *input.values().iter().min().unwrap());
        assert!(!combined.degraded);
        assert_eq!(combined.to_string(), "min(parent=5, child=3) = 3");
    }

    #[test]
    fn parent_value_wins_when_smaller() {
        let combined = combine(2, Ok(40));
        assert_eq!(combined.overall, 2);
        assert_eq!(combined.child, 40);
    }

    #[test]
    fn zero_read_falls_back_to_parent_partial() {
        let (mut read, write) = Channel::open().unwrap().into_ends();
        write.close();

        let combined = combine(5, read.receive_partial());
        assert!(combined.degraded);
        assert_eq!(combined.overall, 5);
        assert_eq!(combined.to_string(), "min(parent=5, child=5) = 5");
    }

    #[test]
    fn short_read_falls_back_to_parent_partial() {
        let torn = 3i32.to_ne_bytes();
        let mut read = ReadEnd::new(&torn[..3]);

        let combined = combine(5, read.receive_partial());
        assert!(combined.degraded);
        assert_eq!(combined.overall, 5);
    }

    #[test]
    fn any_read_error_falls_back() {
        let combined = combine(17, Err(PipeminError::ChannelRead(ReadFailure::Closed)));
        assert_eq!(
            combined,
            Combined {
                parent: 17,
                child: 17,
                overall: 17,
                degraded: true,
            }
        );
    }
}
