//! Properties of the mutation API over arbitrary drafts.

use proptest::prelude::*;

use invoice_draft::{
    ColumnConfig, EntityKind, FieldValue, InvoiceDraft, LineItem, LineItemField, MutationError,
    append_blank_item, remove_item, update_item_field,
};

fn arb_item() -> impl Strategy<Value = LineItem> {
    ("[a-z ]{0,12}", 0u32..1000, -10_000i32..10_000).prop_map(|(description, quantity, cents)| {
        let mut item = LineItem {
            description,
            quantity: f64::from(quantity),
            cost: f64::from(cents) / 100.0,
            ..LineItem::default()
        };
        item.recalculate();
        item
    })
}

fn arb_draft() -> impl Strategy<Value = InvoiceDraft> {
    prop::collection::vec(arb_item(), 1..8).prop_map(|line_items| InvoiceDraft {
        client_id: Some("5".to_string()),
        line_items,
        ..InvoiceDraft::new(EntityKind::Invoice, "INV-0001")
    })
}

fn arb_kind() -> impl Strategy<Value = EntityKind> {
    prop::sample::select(EntityKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn remove_shrinks_by_one_or_rejects(draft in arb_draft(), pick in any::<prop::sample::Index>()) {
        let n = draft.line_items.len();
        let index = pick.index(n);
        match remove_item(&draft, index) {
            Ok(next) => {
                prop_assert!(n > 1);
                prop_assert_eq!(next.line_items.len(), n - 1);
                let mut expected = draft.line_items.clone();
                expected.remove(index);
                prop_assert_eq!(next.line_items, expected);
            }
            Err(e) => {
                prop_assert_eq!(n, 1);
                prop_assert_eq!(e, MutationError::LastLineItem);
            }
        }
    }

    #[test]
    fn quantity_update_touches_only_the_target(
        draft in arb_draft(),
        pick in any::<prop::sample::Index>(),
        quantity in 0u32..500,
    ) {
        let index = pick.index(draft.line_items.len());
        let q = f64::from(quantity);
        let next = update_item_field(&draft, index, LineItemField::Quantity, FieldValue::Number(q)).unwrap();

        prop_assert_eq!(next.line_items.len(), draft.line_items.len());
        for (i, (before, after)) in draft.line_items.iter().zip(&next.line_items).enumerate() {
            if i == index {
                prop_assert_eq!(after.quantity, q);
                prop_assert_eq!(after.line_total, q * before.cost);
                prop_assert_eq!(&after.description, &before.description);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn append_grows_by_exactly_one_blank(draft in arb_draft()) {
        let next = append_blank_item(&draft).unwrap();
        prop_assert_eq!(next.line_items.len(), draft.line_items.len() + 1);
        prop_assert_eq!(next.line_items.last(), Some(&LineItem::blank()));
        prop_assert_eq!(&next.line_items[..draft.line_items.len()], &draft.line_items[..]);
    }

    #[test]
    fn column_order_is_deterministic(kind in arb_kind()) {
        let config = ColumnConfig::default();
        let first: Vec<_> = config.resolve_columns(kind).collect();
        let second: Vec<_> = config.resolve_columns(kind).collect();
        prop_assert!(!first.is_empty());
        prop_assert!(first.len() <= LineItemField::ALL.len());
        prop_assert_eq!(first, second);
    }
}
