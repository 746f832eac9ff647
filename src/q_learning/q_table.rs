//! Sparse Q-table with per-state-action visit counts

use serde::{Deserialize, Serialize};

use super::state::{QState, STATE_SPACE};

/// Number of actions: one per predicted opponent move.
pub const ACTIONS: usize = 3;

/// Dense row index of a state inside a [`QTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

/// One learned state: its values and how often each action was updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QRow {
    pub state: QState,
    pub values: [f64; ACTIONS],
    pub visits: [u32; ACTIONS],
}

impl QRow {
    fn new(state: QState) -> Self {
        Self {
            state,
            values: [0.0; ACTIONS],
            visits: [0; ACTIONS],
        }
    }
}

/// Q-values and visit counts for the states seen so far.
///
/// Rows are created lazily and zero-initialised. Each [`QState`] code maps to
/// a slot holding its row index, so lookups never hash a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<QRow>", into = "Vec<QRow>")]
pub struct QTable {
    slots: Vec<Option<StateId>>,
    rows: Vec<QRow>,
}

impl QTable {
    pub fn new() -> Self {
        Self {
            slots: vec![None; STATE_SPACE],
            rows: Vec::new(),
        }
    }

    /// Row index for `state`, creating a zeroed row if needed.
    pub fn ensure(&mut self, state: QState) -> StateId {
        let slot = &mut self.slots[state.code()];
        if let Some(id) = *slot {
            return id;
        }
        let id = StateId(self.rows.len());
        *slot = Some(id);
        self.rows.push(QRow::new(state));
        id
    }

    /// Row index for `state`, if it has been seen.
    pub fn lookup(&self, state: &QState) -> Option<StateId> {
        self.slots[state.code()]
    }

    pub fn row(&self, id: StateId) -> &QRow {
        &self.rows[id.0]
    }

    /// Row for `state`, if it has been seen.
    pub fn get(&self, state: &QState) -> Option<&QRow> {
        self.lookup(state).map(|id| self.row(id))
    }

    /// Highest value in the row.
    pub fn max_value(&self, id: StateId) -> f64 {
        self.rows[id.0]
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest value; ties go to the lowest index.
    pub fn greedy_action(&self, id: StateId) -> usize {
        let values = &self.rows[id.0].values;
        let mut best = 0;
        for action in 1..ACTIONS {
            if values[action] > values[best] {
                best = action;
            }
        }
        best
    }

    /// TD update with an adaptive learning rate.
    ///
    /// η = 1 / (1 + N(s,a)), then N(s,a) += 1, then
    /// Q(s,a) ← (1 − η)·Q(s,a) + η·(r + γ·max_a' Q(s',a')).
    ///
    /// Returns the new value of Q(s,a).
    pub fn adaptive_update(
        &mut self,
        state: StateId,
        action: usize,
        reward: f64,
        next_state: StateId,
        discount_factor: f64,
    ) -> f64 {
        let best_next = self.max_value(next_state);
        let row = &mut self.rows[state.0];

        let eta = 1.0 / (1.0 + f64::from(row.visits[action]));
        row.visits[action] += 1;

        let updated = (1.0 - eta) * row.values[action] + eta * (reward + discount_factor * best_next);
        row.values[action] = updated;
        updated
    }

    pub fn rows(&self) -> &[QRow] {
        &self.rows
    }

    /// Number of states stored.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.slots.fill(None);
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<QRow>> for QTable {
    fn from(rows: Vec<QRow>) -> Self {
        let mut table = QTable::new();
        for row in rows {
            let id = table.ensure(row.state);
            table.rows[id.0] = row;
        }
        table
    }
}

impl From<QTable> for Vec<QRow> {
    fn from(table: QTable) -> Self {
        table.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rps::{Move, Round};

    fn windowed(opponent: Move) -> QState {
        QState::Windowed([Round::new(opponent, Move::Rock); 3])
    }

    #[test]
    fn rows_start_at_zero_and_are_created_once() {
        let mut table = QTable::new();
        let a = table.ensure(QState::Unseeded);
        let b = table.ensure(QState::Unseeded);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
        assert_eq!(table.row(a).values, [0.0; ACTIONS]);
        assert_eq!(table.row(a).visits, [0; ACTIONS]);
    }

    #[test]
    fn lookup_does_not_create() {
        let table = QTable::new();
        assert!(table.lookup(&QState::Unseeded).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn greedy_breaks_ties_towards_lowest_index() {
        let mut table = QTable::new();
        let id = table.ensure(QState::Unseeded);
        assert_eq!(table.greedy_action(id), 0);

        table.rows[id.0].values = [0.2, 0.7, 0.7];
        assert_eq!(table.greedy_action(id), 1);
    }

    #[test]
    fn first_update_uses_full_learning_rate() {
        let mut table = QTable::new();
        let s = table.ensure(QState::Unseeded);
        let next = table.ensure(windowed(Move::Paper));
        table.rows[next.0].values = [0.0, 2.0, -1.0];

        // η = 1: Q = 1 + 0.9 * 2
        let q = table.adaptive_update(s, 1, 1.0, next, 0.9);
        assert!((q - 2.8).abs() < 1e-12);
        assert_eq!(table.row(s).visits, [0, 1, 0]);
    }

    #[test]
    fn learning_rate_decays_with_visits() {
        let mut table = QTable::new();
        let s = table.ensure(QState::Unseeded);
        let next = table.ensure(windowed(Move::Rock));

        table.adaptive_update(s, 0, 1.0, next, 0.0);
        // η = 1/2: Q = 0.5 * 1 + 0.5 * (-1)
        let q = table.adaptive_update(s, 0, -1.0, next, 0.0);
        assert!(q.abs() < 1e-12);
        assert_eq!(table.row(s).visits[0], 2);
    }

    #[test]
    fn self_transition_reads_value_before_update() {
        let mut table = QTable::new();
        let s = table.ensure(QState::Unseeded);
        table.rows[s.0].values = [1.0, 0.0, 0.0];
        table.rows[s.0].visits = [1, 0, 0];

        // η = 1/2: Q = 0.5 * 1 + 0.5 * (0 + 0.5 * 1)
        let q = table.adaptive_update(s, 0, 0.0, s, 0.5);
        assert!((q - 0.75).abs() < 1e-12);
    }

    #[test]
    fn serde_roundtrip_rebuilds_slots() {
        let mut table = QTable::new();
        let s = table.ensure(windowed(Move::Scissors));
        table.rows[s.0].values = [0.1, 0.2, 0.3];

        let bytes = rmp_serde::to_vec(&table).unwrap();
        let restored: QTable = rmp_serde::from_slice(&bytes).unwrap();
        let row = restored.get(&windowed(Move::Scissors)).unwrap();
        assert_eq!(row.values, [0.1, 0.2, 0.3]);
        assert!(restored.get(&QState::Unseeded).is_none());
    }

    #[test]
    fn clear_forgets_every_state() {
        let mut table = QTable::new();
        table.ensure(QState::Unseeded);
        table.clear();
        assert!(table.is_empty());
        assert!(table.lookup(&QState::Unseeded).is_none());
    }
}
