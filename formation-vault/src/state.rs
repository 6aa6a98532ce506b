//! Registry-wide counters.

use formation_integrity::{FormationId, LogicalClock};
use serde::{Deserialize, Serialize};

/// Global counters of the vault, loaded into every invocation and committed
/// with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Last id issued, shared by the primary and shadow namespaces
    pub sequence_tracker: FormationId,
    /// Successful mutating calls across every entry point
    pub total_operations: u64,
    /// Clock of the most recent mutating call
    pub last_calibration: LogicalClock,
    pub flux_indicator: bool,
}

impl RegistryState {
    /// Advance the sequence and return the new id.
    pub fn next_id(&mut self) -> FormationId {
        self.sequence_tracker += 1;
        self.sequence_tracker
    }

    /// Count one successful mutation. `flux` of `None` leaves the flag alone.
    pub fn record_operation(&mut self, clock: LogicalClock, flux: Option<bool>) {
        self.total_operations += 1;
        self.last_calibration = clock;
        if let Some(flux) = flux {
            self.flux_indicator = flux;
        }
    }
}
