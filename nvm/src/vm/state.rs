/// VM execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMState {
    Ready,
    Running,
    Halted,
    Faulted { offset: usize },
}

impl std::fmt::Display for VMState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VMState::Ready => write!(f, "READY"),
            VMState::Running => write!(f, "RUNNING"),
            VMState::Halted => write!(f, "HALTED"),
            VMState::Faulted { offset } => write!(f, "FAULTED at 0x{offset:02X}"),
        }
    }
}

/// How a dispatched instruction left the instruction pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUpdate {
    /// Move on to the next record
    Advance,
    /// The instruction already repositioned the pointer
    Moved,
}
