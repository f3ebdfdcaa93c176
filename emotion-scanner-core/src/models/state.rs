/// Scanner lifecycle state machine.
///
/// State transitions:
/// ```text
/// idle → scanning → idle        (stop)
///   ↓
/// error ──start──→ scanning     (acquisition failure, retried by the user)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Scanning,
    Error(String),
}

impl LifecycleState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Whether `start` is accepted from this state.
    pub fn can_start(&self) -> bool {
        !self.is_scanning()
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Error(_) => "error",
        }
    }
}
