use log::warn;
use sneakercore::alert::AlertCue;
use sneakercore::EntityId;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Threat cue for terminal use: counts every threat and optionally rings BEL.
#[derive(Debug, Default)]
pub struct BellCue {
    ring: bool,
    rung: AtomicUsize,
}

impl BellCue {
    pub fn new(ring: bool) -> Self {
        Self {
            ring,
            rung: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.rung.load(Ordering::SeqCst)
    }
}

impl AlertCue for BellCue {
    fn threat_raised(&self, owner: EntityId, target: EntityId) {
        self.rung.fetch_add(1, Ordering::SeqCst);
        warn!("THREAT: {} inside threat radius of {}", target, owner);
        if self.ring {
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }
}
