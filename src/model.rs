use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, MutationError};

pub type ClientId = String;

/// Invoice-like documents that share the line item table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Invoice,
    Quote,
    Credit,
    RecurringInvoice,
    PurchaseOrder,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Invoice,
        EntityKind::Quote,
        EntityKind::Credit,
        EntityKind::RecurringInvoice,
        EntityKind::PurchaseOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Invoice => "invoice",
            EntityKind::Quote => "quote",
            EntityKind::Credit => "credit",
            EntityKind::RecurringInvoice => "recurring_invoice",
            EntityKind::PurchaseOrder => "purchase_order",
        }
    }

    /// Prefix used when numbering new drafts, e.g. `INV-0007`.
    pub fn number_prefix(self) -> &'static str {
        match self {
            EntityKind::Invoice => "INV",
            EntityKind::Quote => "QUO",
            EntityKind::Credit => "CRE",
            EntityKind::RecurringInvoice => "REC",
            EntityKind::PurchaseOrder => "PO",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => f.write_str("text"),
            FieldKind::Number => f.write_str("number"),
        }
    }
}

/// Every attribute of a [`LineItem`] a column can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemField {
    ProductKey,
    Description,
    Quantity,
    Cost,
    Discount,
    TaxRate1,
    TaxRate2,
    TaxRate3,
    LineTotal,
}

impl LineItemField {
    pub const ALL: [LineItemField; 9] = [
        LineItemField::ProductKey,
        LineItemField::Description,
        LineItemField::Quantity,
        LineItemField::Cost,
        LineItemField::Discount,
        LineItemField::TaxRate1,
        LineItemField::TaxRate2,
        LineItemField::TaxRate3,
        LineItemField::LineTotal,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LineItemField::ProductKey => "product_key",
            LineItemField::Description => "description",
            LineItemField::Quantity => "quantity",
            LineItemField::Cost => "cost",
            LineItemField::Discount => "discount",
            LineItemField::TaxRate1 => "tax_rate1",
            LineItemField::TaxRate2 => "tax_rate2",
            LineItemField::TaxRate3 => "tax_rate3",
            LineItemField::LineTotal => "line_total",
        }
    }

    /// Translation key for the column header.
    pub fn label_key(self) -> &'static str {
        match self {
            LineItemField::ProductKey => "item",
            LineItemField::Description => "description",
            LineItemField::Quantity => "quantity",
            LineItemField::Cost => "unit_cost",
            LineItemField::Discount => "discount",
            LineItemField::TaxRate1 => "tax",
            LineItemField::TaxRate2 => "tax_rate2",
            LineItemField::TaxRate3 => "tax_rate3",
            LineItemField::LineTotal => "line_total",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            LineItemField::ProductKey | LineItemField::Description => FieldKind::Text,
            _ => FieldKind::Number,
        }
    }

    pub fn is_editable(self) -> bool {
        self != LineItemField::LineTotal
    }
}

impl fmt::Display for LineItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LineItemField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        // The remote API calls the description `notes`.
        if key == "notes" {
            return Ok(LineItemField::Description);
        }
        LineItemField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| InputError::UnknownField(key.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One product or service row on an invoice.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LineItem {
    #[serde(default)]
    pub product_key: String,
    #[serde(default, alias = "notes")]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub tax_rate1: f64,
    #[serde(default)]
    pub tax_rate2: f64,
    #[serde(default)]
    pub tax_rate3: f64,
    // Derived from the fields above, see `compute_line_total`.
    #[serde(default)]
    pub line_total: f64,
}

impl LineItem {
    pub fn blank() -> Self {
        Self::default()
    }

    /// Quantity times cost after the percentage discount, before tax.
    pub fn amount(&self) -> f64 {
        let gross = self.quantity * self.cost;
        gross - gross * self.discount / 100.0
    }

    pub fn tax_amount(&self) -> f64 {
        self.amount() * (self.tax_rate1 + self.tax_rate2 + self.tax_rate3) / 100.0
    }

    pub fn compute_line_total(&self) -> f64 {
        self.amount() + self.tax_amount()
    }

    pub fn recalculate(&mut self) {
        self.line_total = self.compute_line_total();
    }

    pub fn get(&self, field: LineItemField) -> FieldValue {
        match field {
            LineItemField::ProductKey => FieldValue::Text(self.product_key.clone()),
            LineItemField::Description => FieldValue::Text(self.description.clone()),
            LineItemField::Quantity => FieldValue::Number(self.quantity),
            LineItemField::Cost => FieldValue::Number(self.cost),
            LineItemField::Discount => FieldValue::Number(self.discount),
            LineItemField::TaxRate1 => FieldValue::Number(self.tax_rate1),
            LineItemField::TaxRate2 => FieldValue::Number(self.tax_rate2),
            LineItemField::TaxRate3 => FieldValue::Number(self.tax_rate3),
            LineItemField::LineTotal => FieldValue::Number(self.line_total),
        }
    }

    /// Returns a copy with `field` set to `value` and the line total recomputed.
    pub fn with_field(&self, field: LineItemField, value: FieldValue) -> Result<Self, MutationError> {
        if !field.is_editable() {
            return Err(MutationError::ReadOnlyField(field));
        }
        if value.kind() != field.kind() {
            return Err(MutationError::TypeMismatch {
                field,
                expected: field.kind(),
            });
        }
        if let FieldValue::Number(n) = &value {
            if !n.is_finite() {
                return Err(MutationError::NonFiniteNumber(field));
            }
            if field == LineItemField::Quantity && *n < 0.0 {
                return Err(MutationError::NegativeQuantity(*n));
            }
        }

        let mut item = self.clone();
        match (field, value) {
            (LineItemField::ProductKey, FieldValue::Text(text)) => item.product_key = text,
            (LineItemField::Description, FieldValue::Text(text)) => item.description = text,
            (LineItemField::Quantity, FieldValue::Number(n)) => item.quantity = n,
            (LineItemField::Cost, FieldValue::Number(n)) => item.cost = n,
            (LineItemField::Discount, FieldValue::Number(n)) => item.discount = n,
            (LineItemField::TaxRate1, FieldValue::Number(n)) => item.tax_rate1 = n,
            (LineItemField::TaxRate2, FieldValue::Number(n)) => item.tax_rate2 = n,
            (LineItemField::TaxRate3, FieldValue::Number(n)) => item.tax_rate3 = n,
            _ => {
                return Err(MutationError::TypeMismatch {
                    field,
                    expected: field.kind(),
                });
            }
        }
        item.recalculate();
        Ok(item)
    }
}

/// The invoice currently open for editing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct InvoiceDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub entity: EntityKind,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub po_number: String,
    #[serde(default)]
    pub public_notes: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl InvoiceDraft {
    pub fn new(entity: EntityKind, number: impl Into<String>) -> Self {
        Self {
            entity,
            number: number.into(),
            ..Self::default()
        }
    }

    pub fn has_client(&self) -> bool {
        self.client_id.is_some()
    }

    pub fn subtotal(&self) -> f64 {
        self.line_items.iter().map(LineItem::amount).sum()
    }

    pub fn total(&self) -> f64 {
        self.line_items.iter().map(|i| i.line_total).sum()
    }

    /// Recomputes every line total; used on drafts coming from storage.
    pub fn recalculate(&mut self) {
        for item in &mut self.line_items {
            item.recalculate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_parse_back() {
        for field in LineItemField::ALL {
            assert_eq!(field.key().parse::<LineItemField>().unwrap(), field);
        }
        assert_eq!(
            "notes".parse::<LineItemField>().unwrap(),
            LineItemField::Description
        );
        assert_eq!(
            "colour".parse::<LineItemField>(),
            Err(InputError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn line_total_applies_discount_then_tax() {
        let item = LineItem {
            quantity: 2.0,
            cost: 50.0,
            discount: 10.0,
            tax_rate1: 10.0,
            ..LineItem::default()
        };
        assert_eq!(item.amount(), 90.0);
        assert_eq!(item.compute_line_total(), 99.0);
    }

    #[test]
    fn with_field_rejects_bad_values() {
        let item = LineItem::blank();
        assert_eq!(
            item.with_field(LineItemField::LineTotal, FieldValue::Number(1.0)),
            Err(MutationError::ReadOnlyField(LineItemField::LineTotal))
        );
        assert_eq!(
            item.with_field(LineItemField::Cost, FieldValue::Text("x".into())),
            Err(MutationError::TypeMismatch {
                field: LineItemField::Cost,
                expected: FieldKind::Number,
            })
        );
        assert_eq!(
            item.with_field(LineItemField::Quantity, FieldValue::Number(-1.0)),
            Err(MutationError::NegativeQuantity(-1.0))
        );
        assert_eq!(
            item.with_field(LineItemField::Cost, FieldValue::Number(f64::NAN)),
            Err(MutationError::NonFiniteNumber(LineItemField::Cost))
        );
    }

    #[test]
    fn credits_allow_negative_cost() {
        let item = LineItem {
            quantity: 3.0,
            ..LineItem::default()
        };
        let item = item
            .with_field(LineItemField::Cost, FieldValue::Number(-5.0))
            .unwrap();
        assert_eq!(item.line_total, -15.0);
    }

    #[test]
    fn notes_alias_deserializes_into_description() {
        let item: LineItem =
            serde_json::from_str(r#"{"notes":"Consulting","quantity":1,"cost":10}"#).unwrap();
        assert_eq!(item.description, "Consulting");
        assert_eq!(item.tax_rate1, 0.0);
    }
}
