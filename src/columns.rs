//! Column resolution for the line item table.
//!
//! Which columns are visible depends on the kind of document being edited;
//! the table itself only ever sees the resolved [`ColumnSpec`] sequence.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, InputError, MutationError, Result};
use crate::i18n::Translator;
use crate::model::{EntityKind, FieldKind, FieldValue, InvoiceDraft, LineItemField};
use crate::mutation::DraftAction;
use crate::store::DraftStore;

const DEFAULT_COLUMNS: &[LineItemField] = &[
    LineItemField::ProductKey,
    LineItemField::Description,
    LineItemField::Cost,
    LineItemField::Quantity,
    LineItemField::TaxRate1,
    LineItemField::LineTotal,
];

const PURCHASE_ORDER_COLUMNS: &[LineItemField] = &[
    LineItemField::ProductKey,
    LineItemField::Description,
    LineItemField::Cost,
    LineItemField::Quantity,
    LineItemField::LineTotal,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: LineItemField,
    pub label_key: String,
}

impl ColumnSpec {
    pub fn new(field: LineItemField) -> Self {
        Self {
            field,
            label_key: field.label_key().to_string(),
        }
    }

    pub fn field_key(&self) -> &'static str {
        self.field.key()
    }
}

/// Per-kind column overrides, read from the `[columns]` table of the settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Vec<LineItemField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Vec<LineItemField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<Vec<LineItemField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_invoice: Option<Vec<LineItemField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<Vec<LineItemField>>,
}

impl ColumnConfig {
    fn overrides(&self, kind: EntityKind) -> Option<&Vec<LineItemField>> {
        match kind {
            EntityKind::Invoice => self.invoice.as_ref(),
            EntityKind::Quote => self.quote.as_ref(),
            EntityKind::Credit => self.credit.as_ref(),
            EntityKind::RecurringInvoice => self.recurring_invoice.as_ref(),
            EntityKind::PurchaseOrder => self.purchase_order.as_ref(),
        }
    }

    pub fn fields(&self, kind: EntityKind) -> &[LineItemField] {
        match self.overrides(kind) {
            Some(fields) => fields.as_slice(),
            None if kind == EntityKind::PurchaseOrder => PURCHASE_ORDER_COLUMNS,
            None => DEFAULT_COLUMNS,
        }
    }

    /// Columns for `kind` in display order.
    ///
    /// The iterator is lazy and can be cloned to walk the columns again; the
    /// order never changes for a given configuration.
    pub fn resolve_columns(
        &self,
        kind: EntityKind,
    ) -> impl Iterator<Item = ColumnSpec> + Clone + '_ {
        self.fields(kind).iter().copied().map(ColumnSpec::new)
    }

    /// Rejects empty column lists and fields listed twice.
    pub fn validate(&self) -> Result<()> {
        for kind in EntityKind::ALL {
            let Some(fields) = self.overrides(kind) else {
                continue;
            };
            if fields.is_empty() {
                return Err(DraftError::Config(format!("no columns configured for {kind}")));
            }
            let mut seen = HashSet::new();
            for field in fields {
                if !seen.insert(field) {
                    return Err(DraftError::Config(format!(
                        "column `{field}` listed twice for {kind}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Header text for `column`, falling back to the raw field key.
pub fn resolve_label(column: &ColumnSpec, translator: &dyn Translator) -> String {
    translator
        .translate(&column.label_key)
        .unwrap_or_else(|| column.field_key().to_string())
}

/// The current value of one cell and the way to change it.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBinding {
    column: ColumnSpec,
    index: usize,
    value: FieldValue,
}

impl InputBinding {
    pub fn column(&self) -> &ColumnSpec {
        &self.column
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_editable(&self) -> bool {
        self.column.field.is_editable()
    }

    /// Converts raw input into a value of the column's kind.
    pub fn parse(&self, raw: &str) -> std::result::Result<FieldValue, InputError> {
        let field = self.column.field;
        match field.kind() {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .ok_or_else(|| InputError::NotANumber {
                    field,
                    raw: raw.to_string(),
                }),
        }
    }

    /// Parses `raw` and writes it into the store's draft.
    pub fn on_change<'s>(&self, store: &'s mut DraftStore, raw: &str) -> Result<&'s InvoiceDraft> {
        let value = self.parse(raw)?;
        store.dispatch(DraftAction::UpdateItemField {
            index: self.index,
            field: self.column.field,
            value,
        })
    }
}

pub fn resolve_input_binding(
    store: &DraftStore,
    column: &ColumnSpec,
    index: usize,
) -> Result<InputBinding> {
    let draft = store.current().ok_or(DraftError::NoDraftLoaded)?;
    let item = draft
        .line_items
        .get(index)
        .ok_or(MutationError::IndexOutOfRange {
            index,
            len: draft.line_items.len(),
        })?;
    Ok(InputBinding {
        column: column.clone(),
        index,
        value: item.get(column.field),
    })
}
