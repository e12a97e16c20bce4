use super::render::{
    print_config, print_document, print_document_list, print_environments, print_messages,
};
use super::setup::{Cli, Commands, DocCommands};
use clap::Parser;
use directories::ProjectDirs;
use envdeck::api::{ConfigAction, EnvDeckApi};
use envdeck::config::EnvDeckConfig;
use envdeck::error::{EnvDeckError, Result};
use envdeck::model::{EnvironmentEdit, EnvironmentPatch};
use envdeck::store::fs_backend::FsBackend;
use envdeck::validation::is_url_valid;
use std::fs;
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct AppContext {
    api: EnvDeckApi<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Init) => handle_init(&ctx),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Add {
            name,
            url,
            active,
            description,
        }) => handle_add(&ctx, &name, &url, active, description),
        Some(Commands::Remove { name }) => handle_remove(&ctx, &name),
        Some(Commands::Use { name }) => handle_use(&ctx, &name),
        Some(Commands::Unset) => handle_unset(&ctx),
        Some(Commands::Active) => handle_active(&ctx),
        Some(Commands::Update {
            name,
            rename,
            url,
            active,
            description,
            clear_description,
        }) => {
            let mut patch = EnvironmentPatch {
                name: rename,
                url,
                active,
                description: None,
            };
            if clear_description {
                patch.description = Some(None);
            } else if description.is_some() {
                patch.description = Some(description);
            }
            handle_update(&ctx, &name, patch)
        }
        Some(Commands::Edit {
            name,
            new_name,
            url,
            description,
            doc,
            doc_file,
        }) => {
            let doc = match doc_file {
                Some(path) => Some(read_body(&path)?),
                None => doc,
            };
            handle_edit(&ctx, &name, new_name, url, description, doc)
        }
        Some(Commands::Doc { action }) => match action {
            DocCommands::Show { name } => handle_doc_show(&ctx, &name),
            DocCommands::Set {
                name,
                content,
                file,
            } => {
                let body = match file {
                    Some(path) => read_body(&path)?,
                    None => content.unwrap_or_default(),
                };
                handle_doc_set(&ctx, &name, &body)
            }
            DocCommands::List => handle_doc_list(&ctx),
        },
        Some(Commands::CheckUrl { url }) => handle_check_url(&url),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let proj_dirs = ProjectDirs::from("com", "envdeck", "envdeck");

    let config_dir = match (&cli.config_dir, &proj_dirs) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dirs)) => dirs.config_dir().to_path_buf(),
        (None, None) => {
            return Err(EnvDeckError::Store(
                "Could not determine config dir".to_string(),
            ))
        }
    };
    let (config, config_error) = match EnvDeckConfig::load(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (EnvDeckConfig::default(), Some(e)),
    };

    init_logging(cli.verbose, &config.log_level);
    if let Some(e) = config_error {
        tracing::warn!(
            config_dir = %config_dir.display(),
            error = %e,
            "ignoring unreadable config, using defaults"
        );
    }

    let data_dir = match (&cli.data_dir, &config.data_dir, &proj_dirs) {
        (Some(dir), _, _) => dir.clone(),
        (None, Some(dir), _) => dir.clone(),
        (None, None, Some(dirs)) => dirs.data_dir().to_path_buf(),
        (None, None, None) => {
            return Err(EnvDeckError::Store("Could not determine data dir".to_string()))
        }
    };
    tracing::debug!(data_dir = %data_dir.display(), config_dir = %config_dir.display(), "starting");

    let api = EnvDeckApi::new(FsBackend::new(data_dir), config_dir);
    // Every start makes sure the collections exist and drops stale edits.
    api.init()?;

    Ok(AppContext { api })
}

fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        configured.parse().unwrap_or(LevelFilter::WARN)
    };

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .try_init();
}

fn read_body(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(EnvDeckError::Io)
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list()?;
    print_environments(&result.listed_environments);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    name: &str,
    url: &str,
    active: bool,
    description: Option<String>,
) -> Result<()> {
    let result = ctx
        .api
        .create_environment(url, name, active, description.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.remove_environment(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_use(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.switch_active(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_unset(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.clear_active()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_active(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.active()?;
    if !result.listed_environments.is_empty() {
        print_environments(&result.listed_environments);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(ctx: &AppContext, name: &str, patch: EnvironmentPatch) -> Result<()> {
    let result = ctx.api.update_environment(name, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &AppContext,
    name: &str,
    new_name: Option<String>,
    url: Option<String>,
    description: Option<String>,
    doc: Option<String>,
) -> Result<()> {
    let begun = ctx.api.begin_edit(name)?;
    let staged = begun
        .staged
        .ok_or_else(|| EnvDeckError::Store("Edit was not staged".to_string()))?;

    let replacement = EnvironmentEdit::new(
        new_name.unwrap_or_else(|| staged.item.name.clone()),
        url.unwrap_or_else(|| staged.item.url.clone()),
    )
    .with_description(description.or_else(|| staged.item.description.clone()));

    let result = ctx
        .api
        .commit_edit(&staged, replacement, doc.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doc_show(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.show_document(name)?;
    for doc in &result.documents {
        print_document(doc);
    }
    Ok(())
}

fn handle_doc_set(ctx: &AppContext, name: &str, body: &str) -> Result<()> {
    let result = ctx.api.set_document(name, body)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doc_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_documents()?;
    print_document_list(&result.documents);
    Ok(())
}

fn handle_check_url(url: &str) -> Result<()> {
    if is_url_valid(url) {
        println!("{} is a valid url", url);
        Ok(())
    } else {
        Err(EnvDeckError::validation(format!("{} is not a valid url", url)))
    }
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action.clone())?;
    if let (ConfigAction::ShowAll, Some(config)) = (&action, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

