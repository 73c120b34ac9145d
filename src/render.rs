use comfy_table::{Attribute, Cell, Color, Table};

use crate::columns::{ColumnSpec, InputBinding, resolve_input_binding, resolve_label};
use crate::error::Result;
use crate::i18n::Translator;
use crate::model::{FieldValue, InvoiceDraft, LineItemField};
use crate::store::DraftStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// No draft, or a draft without a client: nothing can be edited.
    NoClient,
    Editing,
}

pub fn table_state(draft: Option<&InvoiceDraft>) -> TableState {
    match draft {
        Some(draft) if draft.has_client() => TableState::Editing,
        _ => TableState::NoClient,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub cells: Vec<InputBinding>,
    /// Whether the delete control is shown for this row.
    pub removable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Footer {
    AddItem { label: String },
    Placeholder { message: String },
}

/// One render pass of the line item table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub state: TableState,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub footer: Footer,
    pub subtotal: Option<f64>,
    pub total: Option<f64>,
    pub subtotal_label: String,
    pub total_label: String,
}

/// Projects the store's draft onto `columns`.
pub fn render_table(
    store: &DraftStore,
    columns: impl Iterator<Item = ColumnSpec> + Clone,
    translator: &dyn Translator,
) -> Result<TableView> {
    let headers = columns
        .clone()
        .map(|column| resolve_label(&column, translator))
        .collect();
    let subtotal_label = translator.t("subtotal");
    let total_label = translator.t("total");

    let draft = match store.current() {
        Some(draft) if draft.has_client() => draft,
        _ => {
            return Ok(TableView {
                state: TableState::NoClient,
                headers,
                rows: Vec::new(),
                footer: Footer::Placeholder {
                    message: format!("{}.", translator.t("no_client_selected")),
                },
                subtotal: None,
                total: None,
                subtotal_label,
                total_label,
            });
        }
    };

    let removable = draft.line_items.len() > 1;
    let mut rows = Vec::with_capacity(draft.line_items.len());
    for index in 0..draft.line_items.len() {
        let cells = columns
            .clone()
            .map(|column| resolve_input_binding(store, &column, index))
            .collect::<Result<Vec<_>>>()?;
        rows.push(Row {
            index,
            cells,
            removable,
        });
    }

    Ok(TableView {
        state: TableState::Editing,
        headers,
        rows,
        footer: Footer::AddItem {
            label: translator.t("add_item"),
        },
        subtotal: Some(draft.subtotal()),
        total: Some(draft.total()),
        subtotal_label,
        total_label,
    })
}

fn format_value(field: LineItemField, value: &FieldValue) -> String {
    match (field, value) {
        (LineItemField::Cost | LineItemField::LineTotal, FieldValue::Number(n)) => {
            format!("{n:.2}")
        }
        _ => value.to_string(),
    }
}

impl TableView {
    /// Builds a terminal table with a leading row-number column.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        let mut header = vec![Cell::new("#")];
        header.extend(self.headers.iter().map(Cell::new));
        header.push(Cell::new(""));
        table.set_header(header);

        for row in &self.rows {
            let mut cells = vec![Cell::new(row.index)];
            for binding in &row.cells {
                let text = format_value(binding.column().field, binding.value());
                let cell = if binding.is_editable() {
                    Cell::new(text)
                } else {
                    Cell::new(text).add_attribute(Attribute::Bold)
                };
                cells.push(cell);
            }
            cells.push(if row.removable {
                Cell::new("🗑").fg(Color::Rgb { r: 185, g: 28, b: 28 })
            } else {
                Cell::new("")
            });
            table.add_row(cells);
        }

        match &self.footer {
            Footer::AddItem { label } => {
                table.add_row(vec![
                    Cell::new("+"),
                    Cell::new(label).fg(Color::Rgb { r: 4, g: 120, b: 87 }),
                ]);
            }
            Footer::Placeholder { message } => {
                table.add_row(vec![Cell::new(""), Cell::new(message)]);
            }
        }

        if let Some(subtotal) = self.subtotal {
            table.add_row(vec![
                Cell::new(""),
                Cell::new(&self.subtotal_label),
                Cell::new(format!("{subtotal:.2}")),
            ]);
        }
        if let Some(total) = self.total {
            table.add_row(vec![
                Cell::new(""),
                Cell::new(&self.total_label).add_attribute(Attribute::Bold),
                Cell::new(format!("{total:.2}")).add_attribute(Attribute::Bold),
            ]);
        }
        table
    }
}
