//! Command handlers.
//!
//! Every failure ends up as one `error: ..` line on stderr and a failing
//! exit code. Results go to stdout, progress to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::anyhow;
use aula_catalog::{Catalog, DiskSaver, Listing, local_file_name};
use aula_protocol::{CATEGORIES, Category};
use aula_storage_client::HttpStorageClient;
use aula_upload::{
    Progress, UploadOrchestrator, UploadOutcome, UploadRequest, detect_content_type,
};

use crate::Command;
use crate::config::Config;

pub async fn run(config: &Config, command: Command) -> anyhow::Result<ExitCode> {
    match execute(config, command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn execute(config: &Config, command: Command) -> anyhow::Result<()> {
    if let Command::Categories = command {
        print_categories(&config.category);
        return Ok(());
    }

    let client = HttpStorageClient::new(&config.endpoint)?;
    let category = Category::new(config.category.clone());

    match command {
        Command::List { filter } => list(config, client, &category, filter).await,
        Command::Download { file, out } => {
            let dir = out.unwrap_or_else(|| PathBuf::from(&config.download_dir));
            download(config, client, &category, &file, dir).await
        }
        Command::Upload {
            path,
            name,
            content_type,
        } => upload(config, client, category, &path, name, content_type).await,
        Command::Categories => Ok(()),
    }
}

fn print_categories(current: &str) {
    for name in CATEGORIES {
        let marker = if *name == current { "*" } else { " " };
        println!("{marker} {name}");
    }
}

async fn list(
    config: &Config,
    client: HttpStorageClient,
    category: &Category,
    filter: Option<String>,
) -> anyhow::Result<()> {
    let catalog = Catalog::new(client);
    let files = catalog.list_files(category, &config.api_key).await?;

    let mut listing = Listing::default();
    listing.replace(files);
    if let Some(term) = filter {
        listing.set_term(term);
    }

    let visible = listing.visible();
    if visible.is_empty() {
        println!("no files found");
    }
    for file in visible {
        println!("{file}");
    }
    Ok(())
}

async fn download(
    config: &Config,
    client: HttpStorageClient,
    category: &Category,
    file: &str,
    dir: PathBuf,
) -> anyhow::Result<()> {
    let saver = DiskSaver::new(client.clone(), dir);
    let catalog = Catalog::new(client);

    let slot = catalog
        .resolve_download(category, file, &config.api_key)
        .await?;

    let dest = saver.dir().join(local_file_name(file));
    let saved = saver
        .save(&slot, file)
        .await
        .map_err(|e| anyhow!("could not save {}: {e}", dest.display()))?;

    println!("{}", saved.display());
    Ok(())
}

async fn upload(
    config: &Config,
    client: HttpStorageClient,
    category: Category,
    path: &Path,
    name: Option<String>,
    content_type: Option<String>,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow!("cannot read {}: {e}", path.display()))?;

    let file_name = name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| local_file_name(&path.to_string_lossy()))
    });
    let content_type =
        content_type.unwrap_or_else(|| detect_content_type(&file_name).to_string());

    let request = UploadRequest {
        category,
        file_name,
        content_type,
        bytes,
    };

    let progress = Progress::new();
    let render = tokio::spawn(render_progress(progress.clone()));

    let orchestrator = UploadOrchestrator::new(client);
    let outcome = orchestrator.run(&config.api_key, request, &progress).await;

    render.abort();
    eprintln!();
    report(&outcome)
}

/// Redraws the percentage on stderr each time it changes.
async fn render_progress(progress: Progress) {
    let mut rx = progress.subscribe();
    loop {
        let value = *rx.borrow_and_update();
        eprint!("\ruploading... {value:>3}%");
        let _ = std::io::stderr().flush();
        if rx.changed().await.is_err() {
            break;
        }
    }
}

fn report(outcome: &UploadOutcome) -> anyhow::Result<()> {
    match &outcome.error {
        None if outcome.success => {
            println!("upload completed ({}%)", outcome.progress);
            Ok(())
        }
        Some(message) => Err(anyhow!("{message} (stopped at {}%)", outcome.progress)),
        None => Err(anyhow!("upload failed")),
    }
}
