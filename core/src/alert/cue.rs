use crate::prelude::EntityId;
use crate::telemetry::LogManager;

/// Side effect fired once when a new threat alert is raised.
pub trait AlertCue: Send + Sync {
    fn threat_raised(&self, owner: EntityId, target: EntityId);
}

/// Default cue: a warning line in the log.
#[derive(Debug, Clone)]
pub struct LogCue {
    logger: LogManager,
}

impl LogCue {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("alert-cue"),
        }
    }
}

impl Default for LogCue {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertCue for LogCue {
    fn threat_raised(&self, owner: EntityId, target: EntityId) {
        self.logger
            .warn(&format!("threat: entity {} inside threat radius of {}", target, owner));
    }
}
