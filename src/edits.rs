//! Batch edits passed as `edit` command flags.

use regex::Regex;

use crate::columns::{ColumnSpec, resolve_input_binding};
use crate::error::{DraftError, Result};
use crate::model::{ClientId, LineItemField};
use crate::mutation::DraftAction;
use crate::store::DraftStore;

/// One `ROW.FIELD=VALUE` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SetArg {
    pub row: usize,
    pub field: LineItemField,
    pub raw: String,
}

pub fn parse_set_arg(arg: &str) -> Result<SetArg> {
    let set_re = Regex::new(r"^(\d+)\.([a-z_0-9]+)=(.*)$")
        .map_err(|e| DraftError::Config(e.to_string()))?;
    let caps = set_re
        .captures(arg)
        .ok_or_else(|| DraftError::Config(format!("expected ROW.FIELD=VALUE, got `{arg}`")))?;
    let row = caps[1]
        .parse::<usize>()
        .map_err(|e| DraftError::Config(format!("bad row in `{arg}`: {e}")))?;
    let field = caps[2].parse::<LineItemField>()?;
    Ok(SetArg {
        row,
        field,
        raw: caps[3].to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct EditFlags {
    pub client: Option<ClientId>,
    pub add: u8,
    pub remove: Vec<usize>,
    pub set: Vec<String>,
}

impl EditFlags {
    pub fn is_empty(&self) -> bool {
        self.client.is_none() && self.add == 0 && self.remove.is_empty() && self.set.is_empty()
    }

    /// Applies client, removes, adds and sets in that order. Stops at the
    /// first rejected edit; earlier edits stay applied.
    pub fn apply(&self, store: &mut DraftStore) -> Result<()> {
        // A malformed --set fails before any edit is applied.
        let sets = self
            .set
            .iter()
            .map(|arg| parse_set_arg(arg))
            .collect::<Result<Vec<_>>>()?;

        if let Some(client_id) = &self.client {
            store.dispatch(DraftAction::SelectClient(client_id.clone()))?;
        }

        // Highest rows first so the remaining indexes stay put.
        let mut remove = self.remove.clone();
        remove.sort_unstable_by(|a, b| b.cmp(a));
        remove.dedup();
        for index in remove {
            store.dispatch(DraftAction::RemoveItem { index })?;
        }

        for _ in 0..self.add {
            store.dispatch(DraftAction::AppendBlankItem)?;
        }

        for set in sets {
            let binding = resolve_input_binding(store, &ColumnSpec::new(set.field), set.row)?;
            binding.on_change(store, &set.raw)?;
        }
        Ok(())
    }
}
