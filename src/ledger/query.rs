//! Parameterized statements issued against the ledger tables.
//!
//! The SQL text is fixed at compile time; callers only supply bound values,
//! so nothing user-controlled is ever spliced into a statement.

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Integer parameter (slots, amounts).
    Int(i64),
    /// Text parameter (addresses, hashes).
    Text(String),
}

/// Removes spends past `:given_slot` whose output was never stored in
/// `address_utxo`.
pub const DELETE_ORPHAN_TX_INPUTS_SQL: &str = "\
DELETE FROM tx_input \
WHERE spent_at_slot > :given_slot \
AND NOT EXISTS ( \
  SELECT 1 FROM address_utxo au \
  WHERE au.tx_hash = tx_input.tx_hash \
    AND au.output_index = tx_input.output_index \
)";

/// Sums the outputs of `:address` that have no recorded spend.
pub const UNSPENT_BALANCE_SQL: &str = "\
SELECT SUM(au.lovelace_amount) AS balance \
FROM address_utxo au \
WHERE au.owner_addr = :address \
AND NOT EXISTS ( \
  SELECT 1 FROM tx_input ti \
  WHERE ti.tx_hash = au.tx_hash \
    AND ti.output_index = au.output_index \
)";

/// Static SQL plus named parameters (`:name` style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    sql: &'static str,
    params: Vec<(&'static str, Param)>,
}

impl Query {
    /// Orphan cleanup for every spend with `spent_at_slot > after_slot`.
    pub fn delete_orphan_tx_inputs(after_slot: i64) -> Self {
        Self {
            sql: DELETE_ORPHAN_TX_INPUTS_SQL,
            params: vec![(":given_slot", Param::Int(after_slot))],
        }
    }

    /// Unspent lovelace held by `address`.
    pub fn unspent_balance(address: &str) -> Self {
        Self {
            sql: UNSPENT_BALANCE_SQL,
            params: vec![(":address", Param::Text(address.to_string()))],
        }
    }

    /// Statement text.
    pub fn sql(&self) -> &'static str {
        self.sql
    }

    /// Named parameters, in binding order.
    pub fn params(&self) -> &[(&'static str, Param)] {
        &self.params
    }

    /// Value bound to `name`, if any.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}
