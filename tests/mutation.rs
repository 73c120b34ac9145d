//! Line item edits against hand-built drafts.

use invoice_draft::{
    DraftAction, EntityKind, FieldValue, InvoiceDraft, LineItem, LineItemField, MutationError,
    append_blank_item, clear_client, remove_item, select_client, update_item_field,
};

fn item(description: &str, quantity: f64, cost: f64) -> LineItem {
    let mut item = LineItem {
        description: description.to_string(),
        quantity,
        cost,
        ..LineItem::default()
    };
    item.recalculate();
    item
}

fn draft_with(items: Vec<LineItem>) -> InvoiceDraft {
    InvoiceDraft {
        client_id: Some("5".to_string()),
        line_items: items,
        ..InvoiceDraft::new(EntityKind::Invoice, "INV-0001")
    }
}

#[test]
fn removing_the_only_item_is_rejected() {
    let draft = draft_with(vec![item("A", 1.0, 10.0)]);
    let before = draft.clone();

    assert_eq!(remove_item(&draft, 0), Err(MutationError::LastLineItem));
    assert_eq!(draft, before);
}

#[test]
fn removing_keeps_the_order_of_the_rest() {
    let draft = draft_with(vec![item("A", 1.0, 1.0), item("B", 1.0, 2.0), item("C", 1.0, 3.0)]);
    let next = remove_item(&draft, 1).unwrap();

    let names: Vec<_> = next.line_items.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(names, ["A", "C"]);
    assert_eq!(draft.line_items.len(), 3);
}

#[test]
fn removing_past_the_end_is_rejected() {
    let draft = draft_with(vec![item("A", 1.0, 1.0), item("B", 1.0, 2.0)]);
    assert_eq!(
        remove_item(&draft, 2),
        Err(MutationError::IndexOutOfRange { index: 2, len: 2 })
    );
}

#[test]
fn appending_adds_a_blank_item_at_the_end() {
    let draft = draft_with(vec![item("A", 1.0, 10.0)]);
    let next = append_blank_item(&draft).unwrap();

    assert_eq!(next.client_id.as_deref(), Some("5"));
    assert_eq!(next.line_items.len(), 2);
    assert_eq!(next.line_items[0], draft.line_items[0]);
    let blank = &next.line_items[1];
    assert_eq!(blank.description, "");
    assert_eq!(blank.quantity, 0.0);
    assert_eq!(blank.cost, 0.0);
}

#[test]
fn appending_without_a_client_is_rejected() {
    let draft = InvoiceDraft::new(EntityKind::Invoice, "INV-0002");
    assert_eq!(append_blank_item(&draft), Err(MutationError::NoClientSelected));
}

#[test]
fn updating_cost_recomputes_the_line_total() {
    let draft = draft_with(vec![item("A", 2.0, 10.0)]);
    let next = update_item_field(&draft, 0, LineItemField::Cost, FieldValue::Number(20.0)).unwrap();

    assert_eq!(next.line_items[0].cost, 20.0);
    assert_eq!(next.line_items[0].line_total, 40.0);
    assert_eq!(draft.line_items[0].line_total, 20.0);
}

#[test]
fn updating_tax_rates_adds_tax_to_the_total() {
    let draft = draft_with(vec![item("A", 4.0, 25.0)]);
    let next = update_item_field(&draft, 0, LineItemField::TaxRate1, FieldValue::Number(10.0))
        .and_then(|d| update_item_field(&d, 0, LineItemField::TaxRate2, FieldValue::Number(5.0)))
        .unwrap();

    assert_eq!(next.line_items[0].line_total, 115.0);
}

#[test]
fn updating_text_fields() {
    let draft = draft_with(vec![item("A", 1.0, 1.0)]);
    let next = update_item_field(
        &draft,
        0,
        LineItemField::ProductKey,
        FieldValue::Text("consulting".to_string()),
    )
    .unwrap();
    assert_eq!(next.line_items[0].product_key, "consulting");
}

#[test]
fn updating_rejects_contract_breaches() {
    let draft = draft_with(vec![item("A", 1.0, 1.0)]);

    assert_eq!(
        update_item_field(&draft, 3, LineItemField::Cost, FieldValue::Number(1.0)),
        Err(MutationError::IndexOutOfRange { index: 3, len: 1 })
    );
    assert_eq!(
        update_item_field(&draft, 0, LineItemField::LineTotal, FieldValue::Number(1.0)),
        Err(MutationError::ReadOnlyField(LineItemField::LineTotal))
    );
    assert_eq!(
        update_item_field(&draft, 0, LineItemField::Quantity, FieldValue::Number(-2.0)),
        Err(MutationError::NegativeQuantity(-2.0))
    );
}

#[test]
fn selecting_a_client_seeds_one_blank_item() {
    let draft = InvoiceDraft::new(EntityKind::Quote, "QUO-0001");
    let next = select_client(&draft, "5".to_string());

    assert_eq!(next.client_id.as_deref(), Some("5"));
    assert_eq!(next.line_items, vec![LineItem::blank()]);

    let again = select_client(&next, "6".to_string());
    assert_eq!(again.line_items.len(), 1);
}

#[test]
fn clearing_the_client_keeps_items() {
    let draft = draft_with(vec![item("A", 1.0, 1.0), item("B", 1.0, 1.0)]);
    let next = clear_client(&draft);
    assert!(next.client_id.is_none());
    assert_eq!(next.line_items, draft.line_items);
}

#[test]
fn actions_apply_the_matching_edit() {
    let draft = draft_with(vec![item("A", 1.0, 10.0)]);
    let next = DraftAction::UpdateItemField {
        index: 0,
        field: LineItemField::Quantity,
        value: FieldValue::Number(3.0),
    }
    .apply(&draft)
    .unwrap();
    assert_eq!(next.line_items[0].line_total, 30.0);

    assert_eq!(
        DraftAction::RemoveItem { index: 0 }.apply(&draft),
        Err(MutationError::LastLineItem)
    );
}
