//! Session persistence as pretty-printed JSON

use std::path::Path;
use tracing::debug;

use tier_core::Side;

use crate::error::Result;
use crate::session::Session;

impl Session {
    /// Parse a session; the loaded slots become each ledger's baseline.
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut session: Session = serde_json::from_str(contents)?;
        session.mark_persisted();
        Ok(session)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a session from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save the session to a JSON file and reset change tracking
    pub fn save(&mut self, path: &Path) -> Result<()> {
        debug!(
            path = %path.display(),
            changed_slots = self.pending_changes(),
            "saving session"
        );
        std::fs::write(path, self.to_json()?)?;
        self.mark_persisted();
        Ok(())
    }

    fn mark_persisted(&mut self) {
        for side in [Side::A, Side::B] {
            if let Some(ledger) = self.rivalry.ledger_mut(side) {
                ledger.mark_persisted();
            }
        }
    }
}
