//! Invoice line item editing.
//!
//! A [`DraftStore`] owns the invoice being edited. Edits are [`DraftAction`]s
//! applied through the pure functions in [`mutation`]; the [`columns`] module
//! decides which line item fields are shown for each kind of document and
//! binds table cells to them, and [`render`] turns the store into a table.

pub mod columns;
pub mod config;
pub mod edits;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod mutation;
pub mod render;
pub mod repository;
pub mod store;

pub use columns::{ColumnConfig, ColumnSpec, InputBinding, resolve_input_binding, resolve_label};
pub use config::AppSettings;
pub use edits::{EditFlags, SetArg, parse_set_arg};
pub use error::{DraftError, InputError, MutationError, Result};
pub use i18n::{Translations, Translator};
pub use model::{ClientId, EntityKind, FieldKind, FieldValue, InvoiceDraft, LineItem, LineItemField};
pub use mutation::{
    DraftAction, append_blank_item, clear_client, remove_item, select_client, update_item_field,
};
pub use render::{Footer, Row, TableState, TableView, render_table, table_state};
pub use repository::{DraftRepository, JsonFileRepository};
pub use store::DraftStore;
