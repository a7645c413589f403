use std::fmt;

/// Camera registration failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandoffError {
    /// Every slot holds a live camera.
    Full { capacity: usize },
    /// The host view handle is already bound to a live camera.
    AlreadyRegistered { view_id: u64 },
}

impl fmt::Display for HandoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity } => {
                write!(f, "handoff buffer full ({capacity} cameras registered)")
            }
            Self::AlreadyRegistered { view_id } => {
                write!(f, "view {view_id} already has a live camera key")
            }
        }
    }
}

impl std::error::Error for HandoffError {}
