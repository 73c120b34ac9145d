use std::io::IsTerminal;
use std::process::ExitCode;

use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use comfy_table::{Cell, Table};
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use tracing::info;

use invoice_draft::config::{self, AppSettings};
use invoice_draft::logging::{LogConfig, init_logging};
use invoice_draft::{
    ColumnConfig, ColumnSpec, DraftAction, DraftError, DraftRepository, DraftStore, EditFlags,
    EntityKind, InvoiceDraft, JsonFileRepository, Result, TableState, Translations,
    render_table, resolve_input_binding, resolve_label, table_state,
};

// ==========================================
// Constants
// ==========================================
const EDIT_CELL_OPT: &str = "✏️  Edit cell";
const ADD_ITEM_OPT: &str = "➕ Add item";
const REMOVE_ITEM_OPT: &str = "🗑  Remove item";
const SELECT_CLIENT_OPT: &str = "👤 Select client";
const CLEAR_CLIENT_OPT: &str = "🚫 Clear client";
const SAVE_OPT: &str = "💾 Save";
const QUIT_OPT: &str = "🚪 Quit";

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "invoice-draft", about = "Edit invoice line items from the terminal")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new blank draft
    New {
        #[arg(long, value_enum, default_value = "invoice")]
        kind: EntityKind,
        /// Client to assign right away
        #[arg(long)]
        client: Option<String>,
    },
    /// Edit a draft's line items (interactive when no edit flags are given)
    Edit {
        number: String,
        #[arg(long, value_enum, default_value = "invoice")]
        kind: EntityKind,
        /// Assign a client before other edits
        #[arg(long)]
        client: Option<String>,
        /// Append a blank item (repeatable)
        #[arg(long, action = ArgAction::Count)]
        add: u8,
        /// Remove the item at ROW (repeatable)
        #[arg(long, value_name = "ROW")]
        remove: Vec<usize>,
        /// Set a field, e.g. `--set 0.cost=20`
        #[arg(long, value_name = "ROW.FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Print a draft's line item table
    Show {
        number: String,
        #[arg(long, value_enum, default_value = "invoice")]
        kind: EntityKind,
    },
    /// List stored drafts
    List {
        #[arg(long, value_enum)]
        kind: Option<EntityKind>,
    },
    /// Show the columns configured for a document kind
    Columns {
        #[arg(long, value_enum, default_value = "invoice")]
        kind: EntityKind,
    },
    /// Configure data directory and locale
    Config,
}

// ==========================================
// Main
// ==========================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_config =
        LogConfig::from_verbosity(cli.verbose).with_ansi(std::io::stderr().is_terminal());
    init_logging(&log_config);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open_workspace() -> Result<(AppSettings, JsonFileRepository)> {
    let settings = config::load_settings()?;
    let repo = JsonFileRepository::new(settings.data_dir());
    info!(root = %repo.root().display(), "using data directory");
    Ok((settings, repo))
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Config => {
            setup_config_wizard()?;
        }
        Commands::New { kind, client } => {
            let (settings, repo) = open_workspace()?;
            let translator = settings.translator();
            let number = repo.next_number(kind)?;
            let mut draft = InvoiceDraft::new(kind, &number);
            draft.date = Some(Local::now().date_naive());

            let mut store = DraftStore::with_draft(draft);
            if let Some(client_id) = client {
                store.dispatch(DraftAction::SelectClient(client_id))?;
            }
            submit_current(&store, &repo)?;
            println!("✅ Created {kind} {number}");
            print_table(&store, &settings.columns, &translator)?;
        }
        Commands::Edit {
            number,
            kind,
            client,
            add,
            remove,
            set,
        } => {
            let (settings, repo) = open_workspace()?;
            let translator = settings.translator();
            let mut store = DraftStore::with_draft(repo.fetch(kind, &number)?);
            let flags = EditFlags {
                client,
                add,
                remove,
                set,
            };
            if flags.is_empty() {
                edit_session(&mut store, &repo, &settings.columns, &translator)?;
            } else {
                flags.apply(&mut store)?;
                submit_current(&store, &repo)?;
                println!("✅ Saved {kind} {number}");
                print_table(&store, &settings.columns, &translator)?;
            }
        }
        Commands::Show { number, kind } => {
            let (settings, repo) = open_workspace()?;
            let translator = settings.translator();
            let store = DraftStore::with_draft(repo.fetch(kind, &number)?);
            print_table(&store, &settings.columns, &translator)?;
        }
        Commands::List { kind } => {
            let (_, repo) = open_workspace()?;
            list_drafts(&repo, kind)?;
        }
        Commands::Columns { kind } => {
            let (settings, _) = open_workspace()?;
            show_columns(&settings.columns, kind, &settings.translator());
        }
    }
    Ok(())
}

// ==========================================
// 1. Saving
// ==========================================

fn submit_current(store: &DraftStore, repo: &impl DraftRepository) -> Result<()> {
    let draft = store.current().ok_or(DraftError::NoDraftLoaded)?;
    repo.submit(draft)
}

// ==========================================
// 2. Interactive session
// ==========================================

fn edit_session(
    store: &mut DraftStore,
    repo: &impl DraftRepository,
    columns: &ColumnConfig,
    translator: &Translations,
) -> Result<()> {
    let mut saved_revision = store.revision();

    loop {
        print_table(store, columns, translator)?;

        let item_count = store.current().map_or(0, |d| d.line_items.len());
        let mut options = Vec::new();
        if table_state(store.current()) == TableState::Editing {
            options.push(EDIT_CELL_OPT);
            options.push(ADD_ITEM_OPT);
            if item_count > 1 {
                options.push(REMOVE_ITEM_OPT);
            }
            options.push(CLEAR_CLIENT_OPT);
        }
        options.push(SELECT_CLIENT_OPT);
        options.push(SAVE_OPT);
        options.push(QUIT_OPT);

        let choice = match Select::new("Action:", options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled) => continue,
            Err(InquireError::OperationInterrupted) => QUIT_OPT,
            Err(e) => return Err(e.into()),
        };

        let outcome = match choice {
            EDIT_CELL_OPT => edit_cell_wizard(store, columns, translator),
            ADD_ITEM_OPT => store.dispatch(DraftAction::AppendBlankItem).map(|_| ()),
            REMOVE_ITEM_OPT => remove_item_wizard(store, item_count),
            SELECT_CLIENT_OPT => select_client_wizard(store),
            CLEAR_CLIENT_OPT => store.dispatch(DraftAction::ClearClient).map(|_| ()),
            SAVE_OPT => {
                let result = submit_current(store, repo);
                if result.is_ok() {
                    saved_revision = store.revision();
                    println!("✅ Draft saved.");
                }
                result
            }
            _ => {
                if store.revision() != saved_revision {
                    let discard = match Confirm::new("Discard unsaved changes?")
                        .with_default(false)
                        .prompt()
                    {
                        Ok(discard) => discard,
                        Err(InquireError::OperationCanceled) => false,
                        Err(e) => return Err(e.into()),
                    };
                    if !discard {
                        continue;
                    }
                }
                return Ok(());
            }
        };

        match outcome {
            Ok(()) => {}
            Err(DraftError::Prompt(InquireError::OperationCanceled)) => println!("Cancelled"),
            Err(e) => println!("❌ {e}"),
        }
    }
}

fn edit_cell_wizard(
    store: &mut DraftStore,
    columns: &ColumnConfig,
    translator: &Translations,
) -> Result<()> {
    let draft = store.current().ok_or(DraftError::NoDraftLoaded)?;
    let kind = draft.entity;
    let row = prompt_row("Row #:", draft.line_items.len())?;

    let editable: Vec<ColumnSpec> = columns
        .resolve_columns(kind)
        .filter(|c| c.field.is_editable())
        .collect();
    let labels: Vec<String> = editable
        .iter()
        .map(|c| resolve_label(c, translator))
        .collect();
    let picked = Select::new("Column:", labels).raw_prompt()?;
    let column = &editable[picked.index];

    let binding = resolve_input_binding(store, column, row)?;
    let current = binding.value().to_string();
    let raw = Text::new(&format!("{}:", picked.value))
        .with_default(&current)
        .prompt()?;
    binding.on_change(store, &raw)?;
    Ok(())
}

fn remove_item_wizard(store: &mut DraftStore, item_count: usize) -> Result<()> {
    let index = prompt_row("Row # to remove:", item_count)?;
    store.dispatch(DraftAction::RemoveItem { index })?;
    Ok(())
}

fn select_client_wizard(store: &mut DraftStore) -> Result<()> {
    let client_id = Text::new("Client ID:").prompt()?;
    let client_id = client_id.trim();
    if client_id.is_empty() {
        println!("Cancelled");
        return Ok(());
    }
    store.dispatch(DraftAction::SelectClient(client_id.to_string()))?;
    Ok(())
}

fn prompt_row(message: &str, item_count: usize) -> Result<usize> {
    if item_count <= 1 {
        return Ok(0);
    }
    let help = format!("0-{}", item_count - 1);
    let row = CustomType::<usize>::new(message)
        .with_help_message(&help)
        .with_error_message("Please type a row number")
        .prompt()?;
    Ok(row)
}

// ==========================================
// 3. Display
// ==========================================

fn print_table(store: &DraftStore, columns: &ColumnConfig, translator: &Translations) -> Result<()> {
    let Some(draft) = store.current() else {
        println!("(No draft loaded)");
        return Ok(());
    };
    println!(
        "\n--- {} {} | client: {} | date: {} ---",
        draft.entity,
        draft.number,
        draft.client_id.as_deref().unwrap_or("-"),
        draft
            .date
            .map(|d| d.format("%m/%d/%Y").to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    let view = render_table(store, columns.resolve_columns(draft.entity), translator)?;
    println!("{}", view.to_table());
    Ok(())
}

fn list_drafts(repo: &impl DraftRepository, kind: Option<EntityKind>) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => EntityKind::ALL.to_vec(),
    };

    let mut count = 0;
    for kind in kinds {
        for number in repo.list(kind)? {
            println!("📄 {kind} {number}");
            count += 1;
        }
    }
    if count == 0 {
        println!("(None found)");
    }
    Ok(())
}

fn show_columns(columns: &ColumnConfig, kind: EntityKind, translator: &Translations) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Field"),
        Cell::new("Label"),
        Cell::new("Editable"),
    ]);
    for (position, column) in columns.resolve_columns(kind).enumerate() {
        table.add_row(vec![
            Cell::new(position),
            Cell::new(column.field_key()),
            Cell::new(resolve_label(&column, translator)),
            Cell::new(if column.field.is_editable() { "yes" } else { "no" }),
        ]);
    }
    println!("\n--- Columns for {kind} ---");
    println!("{table}");
}

// ==========================================
// 4. Config
// ==========================================

fn setup_config_wizard() -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let path = config::config_path();
    let mut settings = config::load_settings_from(&path)?.unwrap_or_default();

    settings.data_root = Text::new("Root Data Directory:")
        .with_default(&settings.data_root)
        .prompt()?;
    settings.locale = Text::new("Locale:")
        .with_default(&settings.locale)
        .prompt()?;

    config::save_settings_to(&path, &settings)?;
    println!("✅ Settings saved to {}", path.display());
    Ok(settings)
}
