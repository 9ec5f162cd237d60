//! # CLI Layer
//!
//! A terminal client for the filter model. Each command mounts a
//! [`FilterView`] on the query string it is given, exactly as a dashboard page
//! would on load, applies one change, and prints the result.
//!
//! This is the only place that:
//! - Reads the clock
//! - Touches stdout/stderr and installs the log subscriber
//! - Resolves where `config.json` lives

use super::render::{print_chips, print_json, print_operators, print_query};
use super::setup::{Cli, Commands};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use runfilter::api::FilterView;
use runfilter::config::FilterConfig;
use runfilter::context::FilterContext;
use runfilter::error::{FilterError, Result};
use runfilter::model::MULTI_SEPARATOR;
use runfilter::nav::memory::MemoryNavigator;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Project-local config directory, checked before the user config dir.
const PROJECT_DIR: &str = ".runfilter";
const LOG_ENV: &str = "RUNFILTER_LOG";

struct AppContext {
    config: FilterConfig,
    config_dir: PathBuf,
    filters: FilterContext,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Show { query, json } => handle_show(&ctx, &query, json),
        Commands::Api { query, joined } => handle_api(&ctx, &query, joined),
        Commands::Set {
            query,
            field,
            operator,
            values,
        } => handle_set(&ctx, &query, &field, &operator, &values),
        Commands::Remove { query, field } => handle_remove(&ctx, &query, &field),
        Commands::Clear { query } => handle_clear(&ctx, &query),
        Commands::Page { query, page, size } => handle_page(&ctx, &query, page, size),
        Commands::Operators { field } => handle_operators(&ctx, field.as_deref()),
        Commands::Config { save } => handle_config(&ctx, save),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests calling run twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = resolve_config_dir(cli)?;
    let mut config = FilterConfig::load(&config_dir)?;
    if let Some(project) = &cli.project {
        config.project_id = Some(project.clone());
    }
    tracing::debug!(dir = %config_dir.display(), "loaded config");

    let filters = FilterContext::from_config(&config);
    Ok(AppContext {
        config,
        config_dir,
        filters,
    })
}

fn resolve_config_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.config_dir {
        return Ok(dir.clone());
    }

    let local = std::env::current_dir()?.join(PROJECT_DIR);
    if local.is_dir() {
        return Ok(local);
    }

    ProjectDirs::from("dev", "runfilter", "runfilter")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FilterError::Config("could not determine a config directory".to_string()))
}

fn mount<'a>(ctx: &'a AppContext, query: &str) -> FilterView<'a, MemoryNavigator> {
    FilterView::mount(&ctx.filters, MemoryNavigator::new(query), Instant::now())
}

fn handle_show(ctx: &AppContext, query: &str, as_json: bool) -> Result<()> {
    let view = mount(ctx, query);
    if as_json {
        let filters: Vec<_> = view
            .filters()
            .filters()
            .iter()
            .map(|f| {
                json!({
                    "field": f.field(),
                    "operator": f.operator().name(),
                    "value": f.value(),
                })
            })
            .collect();
        let pagination = view.filters().pagination();
        return print_json(&json!({
            "filters": filters,
            "page": pagination.page,
            "pageSize": pagination.page_size,
            "query": view.query_string(),
        }));
    }
    print_chips(&view);
    Ok(())
}

fn handle_api(ctx: &AppContext, query: &str, joined: bool) -> Result<()> {
    let params = mount(ctx, query).request_params();
    if joined {
        return print_json(&json!({
            "filter": params.joined_filter(),
            "page": params.page,
            "pageSize": params.page_size,
        }));
    }
    print_json(&params)
}

fn handle_set(
    ctx: &AppContext,
    query: &str,
    field: &str,
    operator: &str,
    values: &[String],
) -> Result<()> {
    let mut view = mount(ctx, query);
    let separator = MULTI_SEPARATOR.to_string();
    let raw = match values {
        [] => None,
        values => Some(values.join(separator.as_str())),
    };
    view.update_named(field, operator, raw.as_deref(), Instant::now())?;
    print_query(&view.query_string());
    Ok(())
}

fn handle_remove(ctx: &AppContext, query: &str, field: &str) -> Result<()> {
    let mut view = mount(ctx, query);
    if !view.remove(field, Instant::now()) {
        let reason = if ctx.filters.policy.is_remove_blocked(field) {
            "is protected"
        } else {
            "is not set"
        };
        eprintln!("{}", format!("Filter on '{}' {}", field, reason).yellow());
    }
    print_query(&view.query_string());
    Ok(())
}

fn handle_clear(ctx: &AppContext, query: &str) -> Result<()> {
    let mut view = mount(ctx, query);
    view.clear_all(Instant::now());
    print_query(&view.query_string());
    Ok(())
}

fn handle_page(ctx: &AppContext, query: &str, page: u32, size: Option<u32>) -> Result<()> {
    let mut view = mount(ctx, query);
    let now = Instant::now();
    if let Some(size) = size {
        view.set_page_size(size, now);
    }
    view.set_page(page, now);
    print_query(&view.query_string());
    Ok(())
}

fn handle_operators(ctx: &AppContext, field: Option<&str>) -> Result<()> {
    let catalog = &ctx.filters.catalog;
    match field {
        Some(field) => {
            println!(
                "{} {}",
                field.bold(),
                format!("({})", catalog.family_of(field)).dimmed()
            );
            let operators: Vec<_> = catalog
                .legal_operators(field)
                .into_iter()
                .map(|op| op.descriptor())
                .collect();
            print_operators(&operators);
        }
        None => print_operators(&runfilter::operators::OPERATORS.iter().collect::<Vec<_>>()),
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, save: bool) -> Result<()> {
    if save {
        ctx.config.save(&ctx.config_dir)?;
        eprintln!(
            "{}",
            format!("Saved {}", ctx.config_dir.join("config.json").display()).green()
        );
    }
    print_json(&ctx.config)
}
