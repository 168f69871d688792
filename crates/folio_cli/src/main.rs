//! Command-line driver for the folio core.
//!
//! # Responsibility
//! - Wire the listing and form screens to the in-memory backend.
//! - Run every screen on one single-threaded event loop.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_core::{
    core_version, init_logging, CoreConfig, DraftField, FieldValue, FormContext, FormError,
    FormSynchronizer, ListingConfig, ListingContext, LoadOutcome, LoggingConfig, MemoryBackend,
    PaginationController, PostSummary, RecordGateway, SearchCriteria, SortRank,
};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_POST_COUNT: usize = 42;

#[derive(Debug, Parser)]
#[command(name = "folio", about = "Drive folio listing and project form screens")]
struct Cli {
    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scroll through the sample post listing.
    List(ListArgs),
    /// Fill in and submit a new project.
    Edit(EditArgs),
    /// Print the core version.
    Version,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Page size (default 10, max 50).
    #[arg(long)]
    limit: Option<u32>,
    /// Number of pages to load, including the first.
    #[arg(long, default_value_t = 1)]
    pages: u32,
    #[arg(long)]
    tag: Option<String>,
    #[arg(long)]
    keyword: Option<String>,
}

#[derive(Debug, Args)]
struct EditArgs {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long)]
    source_url: Option<String>,
    #[arg(long)]
    sample_url: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Tag label to add; repeatable.
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Sort rank to delete after adding tags; repeatable.
    #[arg(long = "delete-rank")]
    delete_ranks: Vec<SortRank>,
}

impl Cli {
    fn core_config(&self) -> CoreConfig {
        let limit = match &self.command {
            Command::List(args) => args.limit,
            _ => None,
        };
        let logging = self.log_dir.as_ref().map(|dir| {
            let mut config = LoggingConfig::default_for(dir.clone());
            if let Some(level) = &self.log_level {
                config.level = level.clone();
            }
            config
        });
        CoreConfig {
            listing: ListingConfig::new(limit),
            logging,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.core_config();
    if let Some(logging) = &config.logging {
        init_logging(logging).map_err(|err| anyhow!(err))?;
    }

    let backend = Arc::new(MemoryBackend::sample(SAMPLE_POST_COUNT));
    match cli.command {
        Command::List(args) => run_list(backend, config.listing, args).await,
        Command::Edit(args) => run_edit(backend, args).await,
        Command::Version => {
            println!("folio_core version={}", core_version());
            Ok(())
        }
    }
}

async fn run_list(
    backend: Arc<MemoryBackend>,
    listing: ListingConfig,
    args: ListArgs,
) -> Result<()> {
    let mut controller: PaginationController<PostSummary> =
        PaginationController::new(ListingContext::new(backend, listing));

    let criteria = SearchCriteria::new(args.tag.as_deref(), args.keyword.as_deref());
    check_outcome(controller.bootstrap_with(criteria).await)?;

    for _ in 1..args.pages {
        match controller.request_next().await {
            Some(outcome) => check_outcome(Some(outcome))?,
            None => break,
        }
    }

    let state = controller.snapshot();
    for post in &state.items {
        println!("{} {} [{}]", post.id, post.title, post.tags.join(", "));
    }
    println!(
        "page={} limit={} total={} can_load_more={}",
        state.page,
        state.limit,
        state.total,
        controller.can_load_more()
    );
    info!(
        "event=cli_list module=cli status=ok items={} page={}",
        state.items.len(),
        state.page
    );
    Ok(())
}

fn check_outcome(outcome: Option<LoadOutcome>) -> Result<()> {
    match outcome {
        Some(LoadOutcome::Failed(err)) => {
            Err(anyhow!(err)).context("listing page failed to load")
        }
        _ => Ok(()),
    }
}

async fn run_edit(backend: Arc<MemoryBackend>, args: EditArgs) -> Result<()> {
    let mut form = FormSynchronizer::new(FormContext::new(backend.clone(), backend.clone()));
    form.activate(None).await?;
    println!("{}", form.heading());

    let edits = [
        (DraftField::Title, Some(args.title)),
        (DraftField::SourceUrl, args.source_url),
        (DraftField::SampleUrl, args.sample_url),
        (DraftField::Description, args.description),
    ];
    for (field, value) in edits {
        let (Some(value), Some(binding)) = (value, form.binding(field)) else {
            continue;
        };
        form.edit(binding.change(FieldValue::Text(value)))?;
    }

    for label in &args.tags {
        if let Err(err) = form.add_tag(label).await {
            eprintln!("tags: {err}");
        }
    }
    for rank in args.delete_ranks {
        if let Err(err) = form.delete_tag(rank).await {
            eprintln!("tags: {err}");
        }
    }

    let payload = match form.begin_submit() {
        Ok(payload) => payload,
        Err(FormError::Invalid(errors)) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!("{} field(s) need attention", errors.len());
        }
        Err(err) => return Err(err.into()),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let result = backend.persist_record(&payload).await;
    let id = form.complete_submit(result)?;
    println!("{} saved as {}", form.submit_label(), id);
    Ok(())
}
