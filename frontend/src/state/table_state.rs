//! # Table State Module
//!
//! State of the attendance table and the pure reducer that drives it.
//!
//! ## Responsibilities:
//! - The ordered row collection for the selected period
//! - Temporary identity allocation for rows added locally
//! - In-flight tracking for loads and saves (independent of each other)
//! - Reconciliation of server IDs into rows after a save
//!
//! ## Purpose:
//! Every transition goes through [`reduce`], so the table's behaviour can be
//! tested without any record store or rendering attached.

use tracing::{debug, warn};
use shared::{AttendancePeriod, AttendanceRecord, RecordId};

use super::row::{AttendanceRow, FieldValue, Identity, LocalId, RowField};

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// Period whose rows are displayed
    pub period: AttendancePeriod,

    /// Rows in display order
    pub rows: Vec<AttendanceRow>,

    /// Next temporary identity to hand out
    pub next_local_id: u64,

    /// Loads sent but not yet answered
    pub pending_loads: u32,

    /// Saves sent but not yet answered
    pub pending_saves: u32,
}

/// Everything that can happen to the table
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch the selected period; unsaved rows are discarded by the reload
    SelectPeriod(AttendancePeriod),
    LoadStarted,
    /// Records returned by the store for `period`
    RowsLoaded {
        period: AttendancePeriod,
        records: Vec<AttendanceRecord>,
    },
    LoadFailed,
    AddRow,
    UpdateField {
        identity: Identity,
        field: RowField,
        value: FieldValue,
    },
    SaveStarted,
    /// Server IDs for rows that were local when the save was sent
    SaveCompleted {
        period: AttendancePeriod,
        assignments: Vec<(LocalId, RecordId)>,
    },
    SaveFailed,
    /// The store confirmed deletion of this register number
    RowsDeleted { register_number: String },
}

impl TableState {
    pub fn new(period: AttendancePeriod) -> Self {
        Self {
            period,
            rows: Vec::new(),
            next_local_id: 1,
            pending_loads: 0,
            pending_saves: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    pub fn is_saving(&self) -> bool {
        self.pending_saves > 0
    }

    /// Idle when nothing is in flight
    pub fn is_idle(&self) -> bool {
        !self.is_loading() && !self.is_saving()
    }

    pub fn row(&self, identity: &Identity) -> Option<&AttendanceRow> {
        self.rows.iter().find(|row| &row.identity == identity)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Identity the next `AddRow` will receive
    pub fn peek_local_id(&self) -> LocalId {
        LocalId(self.next_local_id)
    }

    fn allocate_local_id(&mut self) -> LocalId {
        let id = LocalId(self.next_local_id);
        self.next_local_id += 1;
        id
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(AttendancePeriod::default())
    }
}

/// Apply one action to the state, returning the next state
pub fn reduce(mut state: TableState, action: Action) -> TableState {
    match action {
        Action::SelectPeriod(period) => {
            state.period = period;
        }
        Action::LoadStarted => {
            state.pending_loads += 1;
        }
        Action::RowsLoaded { period, records } => {
            state.pending_loads = state.pending_loads.saturating_sub(1);
            if period != state.period {
                debug!(
                    "Discarding {} rows loaded for {} while {} is selected",
                    records.len(),
                    period,
                    state.period
                );
                return state;
            }
            let mut rows = Vec::with_capacity(records.len());
            for record in records {
                rows.push(AttendanceRow::from_record(record, || state.allocate_local_id()));
            }
            state.rows = rows;
        }
        Action::LoadFailed => {
            state.pending_loads = state.pending_loads.saturating_sub(1);
        }
        Action::AddRow => {
            let id = state.allocate_local_id();
            state.rows.push(AttendanceRow::blank(id));
        }
        Action::UpdateField { identity, field, value } => {
            match state.rows.iter_mut().find(|row| row.identity == identity) {
                Some(row) => *row = row.with_field(field, value),
                None => debug!("Ignoring edit for unknown row {}", identity),
            }
        }
        Action::SaveStarted => {
            state.pending_saves += 1;
        }
        Action::SaveCompleted { period, assignments } => {
            state.pending_saves = state.pending_saves.saturating_sub(1);
            if period != state.period {
                return state;
            }
            for (local_id, record_id) in assignments {
                let taken = state
                    .rows
                    .iter()
                    .any(|row| row.identity.record_id() == Some(&record_id));
                if taken {
                    warn!(
                        "Record {} is already displayed; keeping local identity {}",
                        record_id, local_id.0
                    );
                    continue;
                }
                if let Some(row) = state
                    .rows
                    .iter_mut()
                    .find(|row| row.identity == Identity::Local(local_id))
                {
                    row.identity = Identity::Persisted(record_id);
                }
            }
        }
        Action::SaveFailed => {
            state.pending_saves = state.pending_saves.saturating_sub(1);
        }
        Action::RowsDeleted { register_number } => {
            state.rows.retain(|row| row.register_number != register_number);
        }
    }
    state
}
