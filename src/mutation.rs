//! Line item edits.
//!
//! Every function takes the current draft by reference and returns a new
//! draft; nothing is changed in place. Preconditions the browser front end
//! enforced by hiding buttons are checked here and reported as
//! [`MutationError`].

use crate::error::MutationError;
use crate::model::{ClientId, FieldValue, InvoiceDraft, LineItem, LineItemField};

/// An edit intent the [`DraftStore`](crate::store::DraftStore) can dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    AppendBlankItem,
    RemoveItem {
        index: usize,
    },
    UpdateItemField {
        index: usize,
        field: LineItemField,
        value: FieldValue,
    },
    SelectClient(ClientId),
    ClearClient,
}

impl DraftAction {
    pub fn apply(&self, draft: &InvoiceDraft) -> Result<InvoiceDraft, MutationError> {
        match self {
            DraftAction::AppendBlankItem => append_blank_item(draft),
            DraftAction::RemoveItem { index } => remove_item(draft, *index),
            DraftAction::UpdateItemField {
                index,
                field,
                value,
            } => update_item_field(draft, *index, *field, value.clone()),
            DraftAction::SelectClient(client_id) => Ok(select_client(draft, client_id.clone())),
            DraftAction::ClearClient => Ok(clear_client(draft)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DraftAction::AppendBlankItem => "append_blank_item",
            DraftAction::RemoveItem { .. } => "remove_item",
            DraftAction::UpdateItemField { .. } => "update_item_field",
            DraftAction::SelectClient(_) => "select_client",
            DraftAction::ClearClient => "clear_client",
        }
    }
}

pub fn append_blank_item(draft: &InvoiceDraft) -> Result<InvoiceDraft, MutationError> {
    if !draft.has_client() {
        return Err(MutationError::NoClientSelected);
    }
    let mut next = draft.clone();
    next.line_items.push(LineItem::blank());
    Ok(next)
}

pub fn remove_item(draft: &InvoiceDraft, index: usize) -> Result<InvoiceDraft, MutationError> {
    let len = draft.line_items.len();
    if index >= len {
        return Err(MutationError::IndexOutOfRange { index, len });
    }
    if len == 1 {
        return Err(MutationError::LastLineItem);
    }
    let mut next = draft.clone();
    next.line_items.remove(index);
    Ok(next)
}

pub fn update_item_field(
    draft: &InvoiceDraft,
    index: usize,
    field: LineItemField,
    value: FieldValue,
) -> Result<InvoiceDraft, MutationError> {
    let item = draft
        .line_items
        .get(index)
        .ok_or(MutationError::IndexOutOfRange {
            index,
            len: draft.line_items.len(),
        })?;
    let updated = item.with_field(field, value)?;

    let mut next = draft.clone();
    next.line_items[index] = updated;
    Ok(next)
}

/// Assigns the client, seeding one blank row so the table is never empty.
pub fn select_client(draft: &InvoiceDraft, client_id: ClientId) -> InvoiceDraft {
    let mut next = draft.clone();
    next.client_id = Some(client_id);
    if next.line_items.is_empty() {
        next.line_items.push(LineItem::blank());
    }
    next
}

pub fn clear_client(draft: &InvoiceDraft) -> InvoiceDraft {
    InvoiceDraft {
        client_id: None,
        ..draft.clone()
    }
}
