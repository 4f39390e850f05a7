use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use marquee_api::enrich::{self, EnrichSettings};
use marquee_api::tmdb::TmdbClient;
use marquee_core::catalog::{CatalogDocument, STDIN_PATH};
use marquee_core::config::AppConfig;
use marquee_core::models::EntryKind;
use marquee_core::session::EditSession;

use crate::cli::{Command, ConfigAction, FieldArgs, OutputArgs};
use crate::error::CliError;

/// Run one command. `config_path` is the `--config` override, if any.
pub async fn run(
    command: Command,
    config: &AppConfig,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    match command {
        Command::List { file } => {
            let catalog = CatalogDocument::read_from(&file)?;
            for (entry, kind) in catalog.list() {
                let id = entry.id().map_or_else(|| "-".to_string(), |id| id.to_string());
                println!(
                    "{:>6}  {:<8}  {}",
                    id,
                    kind,
                    entry.title().unwrap_or("(untitled)")
                );
            }
            Ok(())
        }
        Command::Show { file, target } => {
            let catalog = CatalogDocument::read_from(&file)?;
            let entry = catalog.get(target.id, target.kind)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
            Ok(())
        }
        Command::Add {
            file,
            kind,
            fields,
            output,
        } => {
            let mut catalog = CatalogDocument::read_from(&file)?;
            let session = EditSession::create(kind);
            let id = edit_and_commit(&mut catalog, session, &fields, &[], config).await?;
            println!("Added {kind} {id}");
            export(&catalog, &output, config)
        }
        Command::Edit {
            file,
            target,
            fields,
            remove_sources,
            output,
        } => {
            let mut catalog = CatalogDocument::read_from(&file)?;
            let session = EditSession::edit(&catalog, target.id, target.kind)?;
            let id =
                edit_and_commit(&mut catalog, session, &fields, &remove_sources, config).await?;
            println!("Updated {} {id}", target.kind);
            export(&catalog, &output, config)
        }
        Command::Delete {
            file,
            target,
            yes,
            output,
        } => {
            let mut catalog = CatalogDocument::read_from(&file)?;
            let title = catalog
                .get(target.id, target.kind)?
                .title()
                .unwrap_or("(untitled)")
                .to_string();
            if !yes {
                if file.as_os_str() == STDIN_PATH {
                    return Err(CliError::Usage(
                        "catalog read from stdin; pass --yes to confirm deletion".into(),
                    ));
                }
                let prompt = format!("Delete {} {} \"{title}\"?", target.kind, target.id);
                if !confirm(&prompt, &mut std::io::stdin().lock(), &mut std::io::stderr())? {
                    return Err(CliError::Aborted);
                }
            }
            catalog.delete(target.id, target.kind)?;
            println!("Deleted {} {}", target.kind, target.id);
            export(&catalog, &output, config)
        }
        Command::Enrich { tmdb, kind } => {
            let mut session = EditSession::create(kind.unwrap_or(EntryKind::Movie));
            let client = TmdbClient::from_config(config)?;
            enrich::enrich(
                &client,
                &EnrichSettings::from_config(config),
                &mut session,
                tmdb,
                kind,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&preview(&session))?);
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Init { force } => init_config(config_path, force),
            ConfigAction::Show => {
                print!("{}", config.to_toml()?);
                Ok(())
            }
        },
        Command::Export { file, output } => {
            let catalog = CatalogDocument::read_from(&file)?;
            export(&catalog, &output, config)
        }
    }
}

/// Apply removals, enrichment and flag overrides to `session`, then commit.
async fn edit_and_commit(
    catalog: &mut CatalogDocument,
    mut session: EditSession,
    fields: &FieldArgs,
    remove_sources: &[usize],
    config: &AppConfig,
) -> Result<i64, CliError> {
    // Indices refer to the stored list, so remove from the back first.
    let mut indices = remove_sources.to_vec();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    for index in indices {
        let removed = session.sources.remove_at(index)?;
        info!(index, url = removed.url(), "Removed source");
    }

    if let Some(tmdb_id) = fields.tmdb {
        if !session.kind.is_media() {
            return Err(CliError::Usage(
                "TMDb enrichment only applies to movies and series".into(),
            ));
        }
        let client = TmdbClient::from_config(config)?;
        let declared = Some(session.kind);
        let outcome = enrich::enrich(
            &client,
            &EnrichSettings::from_config(config),
            &mut session,
            tmdb_id,
            declared,
        )
        .await?;
        if !outcome.trailer_found {
            warn!(tmdb_id, "No trailer found");
        }
    }

    apply_fields(&mut session, fields);
    Ok(session.commit(catalog)?)
}

/// Overwrite session fields with the flags that were given.
fn apply_fields(session: &mut EditSession, args: &FieldArgs) {
    let form = &mut session.fields;
    let overrides = [
        (&args.title, &mut form.title),
        (&args.year, &mut form.year),
        (&args.description, &mut form.description),
        (&args.image, &mut form.image),
        (&args.cover, &mut form.cover),
        (&args.trailer, &mut form.trailer_url),
        (&args.rating, &mut form.rating),
        (&args.stream_url, &mut form.stream_url),
    ];
    for (value, field) in overrides {
        if let Some(value) = value {
            *field = value.clone();
        }
    }

    for arg in &args.sources {
        let (name, url) = parse_source(arg);
        if !session.sources.add(name, url) {
            warn!(source = %arg, "Ignoring source without a URL");
        }
    }
}

/// Split `NAME=URL`. A bare URL (which may itself contain `=`) has no name.
fn parse_source(arg: &str) -> (&str, &str) {
    match arg.split_once('=') {
        Some((name, url)) if !name.contains("://") && !name.contains('?') => (name, url),
        _ => ("", arg),
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm(
    prompt: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Write the default config, refusing to overwrite unless `force`.
fn init_config(path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let target = path.map_or_else(AppConfig::config_path, Path::to_path_buf);
    if target.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists; pass --force to overwrite it",
            target.display()
        )));
    }
    let defaults = AppConfig::default();
    match path {
        Some(path) => defaults.save_to(path)?,
        None => defaults.save()?,
    }
    println!("Wrote {}", target.display());
    Ok(())
}

fn export(
    catalog: &CatalogDocument,
    output: &OutputArgs,
    config: &AppConfig,
) -> Result<(), CliError> {
    let path = output_path(output, config);
    catalog.write_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn output_path(output: &OutputArgs, config: &AppConfig) -> PathBuf {
    output
        .output
        .clone()
        .unwrap_or_else(|| Path::new(&config.export.file_name).to_path_buf())
}

fn preview(session: &EditSession) -> serde_json::Value {
    serde_json::json!({
        "kind": session.kind,
        "title": session.fields.title,
        "year": session.fields.year,
        "description": session.fields.description,
        "image": session.fields.image,
        "cover": session.fields.cover,
        "trailer": session.fields.trailer_url,
        "sources": session.sources.as_slice(),
    })
}
