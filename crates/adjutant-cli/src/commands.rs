//! Command execution.

use crate::cli::{ExtractArgs, IdArgs, ImportArgs, NotesArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use adjutant_domain::traits::ActionStore;
use adjutant_domain::ExternalId;
use adjutant_extractor::{EngineConfig, ExtractionEngine};
use adjutant_llm::OpenAiProvider;
use adjutant_pipeline::{ImportResult, Pipeline};
use adjutant_sources::{agenda, FsSource};
use adjutant_store::SqliteStore;
use adjutant_sync::NotionWorkspace;
use std::io::Read;

/// Open the merge store, creating its parent directory when needed.
fn open_store(config: &Config, db_override: Option<&str>) -> Result<SqliteStore> {
    let path = config.store_path(db_override)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(SqliteStore::new(path)?)
}

/// Build a full pipeline; requires the LLM API key.
fn build_pipeline(config: &Config, db_override: Option<&str>) -> Result<Pipeline<OpenAiProvider>> {
    let api_key = config.llm_api_key()?;
    let provider = OpenAiProvider::new(&config.llm.api_base, api_key, &config.llm.model);
    let engine = ExtractionEngine::new(provider, EngineConfig::default());
    Ok(Pipeline::new(engine, open_store(config, db_override)?))
}

/// Build the workspace client from the optional `[workspace]` section.
fn build_workspace(config: &Config) -> Result<NotionWorkspace> {
    let ws = config.workspace.as_ref().ok_or_else(|| {
        CliError::Config("no [workspace] section in the configuration".to_string())
    })?;
    let api_key =
        std::env::var(&ws.api_key_env).map_err(|_| CliError::MissingEnv(ws.api_key_env.clone()))?;
    Ok(NotionWorkspace::new(api_key, &ws.database_id)?.with_user_map_str(&ws.user_map))
}

/// Resolve a (possibly truncated) external id against the store.
fn resolve_id(store: &SqliteStore, prefix: &str) -> Result<ExternalId> {
    if prefix.is_empty() {
        return Err(CliError::InvalidInput("empty id".to_string()));
    }

    let mut matches: Vec<ExternalId> = store
        .flatten()?
        .into_iter()
        .map(|i| i.external_id)
        .filter(|id| id.as_str().starts_with(prefix))
        .collect();

    match matches.len() {
        0 => Err(CliError::InvalidInput(format!("no item matches id '{}'", prefix))),
        1 => Ok(matches.remove(0)),
        n => Err(CliError::InvalidInput(format!(
            "id '{}' is ambiguous ({} matches)",
            prefix, n
        ))),
    }
}

/// Runtime for the suspension points (LLM calls, document fetches).
///
/// Commands stay synchronous and block on the extraction phase, so the
/// blocking workspace client never runs on an async worker thread.
fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

/// Extract one local agenda document and merge its items.
pub fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let request = agenda::read_agenda(std::path::Path::new(&args.path))?;

    let mut pipeline = build_pipeline(config, db_override)?;
    let items = runtime()?.block_on(pipeline.run_document(&request))?;

    println!("{}", formatter.format_items(&items)?);
    println!("{}", formatter.success(&format!("Merged {} items from {}", items.len(), args.path)));

    if args.sync {
        let workspace = build_workspace(config)?;
        let report = pipeline.sync_to_workspace(&workspace)?;
        println!("{}", formatter.format_sync(&report));
    }
    Ok(())
}

/// Extract free-form notes (argument or stdin) and merge their items.
pub fn execute_notes(
    args: NotesArgs,
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let text = match args.text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut pipeline = build_pipeline(config, db_override)?;
    let items = runtime()?.block_on(pipeline.run_notes(&text))?;

    println!("{}", formatter.format_items(&items)?);
    println!("{}", formatter.success(&format!("Merged {} items", items.len())));
    Ok(())
}

/// Walk a local folder tree and import every agenda found.
pub fn execute_import(
    args: ImportArgs,
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let source = FsSource::new(&args.root);

    let mut pipeline = build_pipeline(config, db_override)?;
    let result = runtime()?.block_on(pipeline.import_folder(
        &source,
        source.root_id(),
        args.name_contains.as_deref(),
    ))?;

    println!("{}", formatter.format_import(&result)?);

    if args.sync {
        let workspace = build_workspace(config)?;
        let report = pipeline.sync_to_workspace(&workspace)?;
        println!("{}", formatter.format_sync(&report));
    }
    Ok(())
}

/// List all merged action items in presentation order.
pub fn execute_list(
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let store = open_store(config, db_override)?;
    let items = store.flatten()?;
    println!("{}", formatter.format_items(&items)?);
    Ok(())
}

/// Mark one item done.
pub fn execute_done(
    args: IdArgs,
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let mut store = open_store(config, db_override)?;
    let id = resolve_id(&store, &args.id)?;
    store.mark_done(&id)?;
    println!("{}", formatter.success(&format!("Marked done: {}", id)));
    Ok(())
}

/// Reopen one completed item.
pub fn execute_reopen(
    args: IdArgs,
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let mut store = open_store(config, db_override)?;
    let id = resolve_id(&store, &args.id)?;
    store.reopen(&id)?;
    println!("{}", formatter.success(&format!("Reopened: {}", id)));
    Ok(())
}

/// Show the stats of the last folder import.
pub fn execute_last_import(
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let store = open_store(config, db_override)?;
    match store.load_snapshot::<ImportResult>()? {
        Some(result) => println!("{}", formatter.format_import(&result)?),
        None => println!("{}", formatter.info("No import has run yet.")),
    }
    Ok(())
}

/// Mirror the whole store into the configured workspace.
pub fn execute_sync(
    config: &Config,
    db_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let store = open_store(config, db_override)?;
    let workspace = build_workspace(config)?;

    let items = store.flatten()?;
    let report = adjutant_sync::sync_all(&workspace, &items);
    println!("{}", formatter.format_sync(&report));
    Ok(())
}
