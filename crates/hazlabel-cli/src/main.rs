//! hazlabel: command-line front end for the hazard labelling dashboard.

mod display;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hazlabel_core::{HazardReport, SystemClock, Taxonomy};
use hazlabel_engine::OverrideDraft;
use hazlabel_host::{Dashboard, DashboardConfig, spawn_sweeper};
use hazlabel_store::{
    ColumnKey, ConfidenceBand, FieldFilters, LabelFilter, LabelOrder, TaskStore, TimeLeftBand,
};

/// Review AI-proposed hazard labels, override them, and submit tasks.
#[derive(Parser)]
#[command(name = "hazlabel")]
#[command(about = "Hazard report labelling dashboard")]
#[command(version)]
struct Cli {
    /// Task store (JSON array of tasks)
    #[arg(long, global = true, default_value = "data/tasks.json")]
    tasks: PathBuf,

    /// Dashboard config (TOML)
    #[arg(long, global = true, env = "HAZLABEL_CONFIG")]
    config: Option<PathBuf>,

    /// Evaluator recorded on decisions and submissions
    #[arg(long, global = true, env = "HAZLABEL_EVALUATOR")]
    evaluator: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest AI-labelled reports into the task store
    Ingest {
        /// JSON array of reports
        reports: PathBuf,
    },

    /// List tasks through the dashboard filters
    List {
        /// Case-insensitive substring of the task id
        #[arg(long, default_value = "")]
        search: String,

        /// Keep only these sites (repeatable)
        #[arg(long)]
        site: Vec<String>,

        /// Keep only these locations (repeatable)
        #[arg(long)]
        location: Vec<String>,

        /// Keep only these detail locations (repeatable)
        #[arg(long)]
        detail_location: Vec<String>,

        /// Keep only these nonconformity types (repeatable)
        #[arg(long)]
        nonconformity: Vec<String>,

        /// Keep only these sub-nonconformity types (repeatable)
        #[arg(long)]
        sub_nonconformity: Vec<String>,

        /// Keep only these PIC companies (repeatable)
        #[arg(long)]
        pic_company: Vec<String>,

        /// Confidence band: 0-50, 50-70 or 70-100
        #[arg(long)]
        confidence: Option<ConfidenceBand>,

        /// Time-left band: <6h, <24h or >24h
        #[arg(long)]
        time_left: Option<TimeLeftBand>,

        /// Label state filter, e.g. tbc=waiting (repeatable)
        #[arg(long = "label", value_parser = parse_label_filter)]
        labels: Vec<(Taxonomy, LabelFilter)>,

        /// Displayed label value, e.g. "tbc=7. LOTO" (repeatable)
        #[arg(long = "label-value", value_parser = parse_label_value)]
        label_values: Vec<(Taxonomy, String)>,

        /// Sort by column; append :desc for descending
        #[arg(long, value_parser = parse_column_sort)]
        sort: Option<(ColumnKey, bool)>,

        /// Sort one taxonomy column, e.g. gr:sla_asc
        #[arg(long, value_parser = parse_label_sort, conflicts_with = "sort")]
        label_sort: Option<(Taxonomy, LabelOrder)>,

        /// Page number (clamped to the last page)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print the distinct filter values instead of the table
        #[arg(long)]
        options: bool,
    },

    /// Show one task in full
    Show {
        /// Task id
        id: String,
    },

    /// Decide a label field by picking an AI candidate or another label
    Annotate {
        /// Task id
        id: String,

        /// Taxonomy: tbc, pspp or gr
        taxonomy: Taxonomy,

        /// Choose the AI candidate at this rank: 2 or 3, as numbered by `show`
        #[arg(long, conflicts_with = "other")]
        rank: Option<usize>,

        /// Choose a label from the taxonomy options instead
        #[arg(long)]
        other: Option<String>,

        /// Justification for the decision
        #[arg(long)]
        note: String,
    },

    /// Mark a task as completed
    Submit {
        /// Task id
        id: String,

        /// Final justification
        #[arg(long)]
        justification: Option<String>,
    },

    /// Auto-confirm every field past its SLA deadline, once
    Sweep,

    /// Sweep on the configured interval until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("hazlabel=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref(), cli.evaluator)?;

    match cli.command {
        Commands::Ingest { reports } => {
            let store = if cli.tasks.exists() {
                open_store(&cli.tasks)?
            } else {
                TaskStore::new()
            };
            let mut dash = open_dashboard(store, config)?;
            let contents = std::fs::read_to_string(&reports)
                .with_context(|| format!("reading {}", reports.display()))?;
            let reports: Vec<HazardReport> = serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", reports.display()))?;
            let count = reports.len();
            for report in reports {
                let id = report.id.clone();
                dash.ingest_report(report)
                    .with_context(|| format!("ingesting report {id}"))?;
            }
            save(&dash, &cli.tasks)?;
            println!("Ingested {count} reports ({} tasks total)", dash.store().len());
        }

        Commands::List {
            search,
            site,
            location,
            detail_location,
            nonconformity,
            sub_nonconformity,
            pic_company,
            confidence,
            time_left,
            labels,
            label_values,
            sort,
            label_sort,
            page,
            options,
        } => {
            let mut dash = open_dashboard(open_store(&cli.tasks)?, config)?;
            if options {
                display::print_filter_options(&dash.filter_options());
                return Ok(());
            }

            dash.set_search(&search);
            let mut field_filters = FieldFilters {
                site: site.into_iter().collect(),
                location: location.into_iter().collect(),
                detail_location: detail_location.into_iter().collect(),
                nonconformity: nonconformity.into_iter().collect(),
                sub_nonconformity: sub_nonconformity.into_iter().collect(),
                pic_company: pic_company.into_iter().collect(),
                confidence,
                time_left,
                ..FieldFilters::default()
            };
            for (taxonomy, label) in label_values {
                field_filters.labels.entry(taxonomy).or_default().insert(label);
            }
            dash.set_field_filters(field_filters);
            for (taxonomy, filter) in labels {
                dash.set_label_filter(taxonomy, filter);
            }
            if let Some((key, descending)) = sort {
                dash.toggle_column_sort(key);
                if descending {
                    dash.toggle_column_sort(key);
                }
            }
            if let Some((taxonomy, order)) = label_sort {
                dash.set_label_sort(taxonomy, Some(order));
            }
            dash.set_page(page);
            display::print_table(&dash.view());
        }

        Commands::Show { id } => {
            let dash = open_dashboard(open_store(&cli.tasks)?, config)?;
            let task = dash.task(&id)?;
            display::print_task_card(&task, dash.now());
        }

        Commands::Annotate {
            id,
            taxonomy,
            rank,
            other,
            note,
        } => {
            let mut dash = open_dashboard(open_store(&cli.tasks)?, config)?;
            let mut draft = OverrideDraft::new();
            match (rank, other) {
                (Some(rank), _) => draft.select_candidate(rank.saturating_sub(1))?,
                (None, Some(label)) => draft.select_other(&label, taxonomy.options())?,
                (None, None) => bail!("pass --rank or --other"),
            }
            draft.set_note(note);

            dash.open_edit(&id, taxonomy)?;
            let result = dash.commit_override(&id, taxonomy, &draft);
            if result.is_err() {
                dash.close_edit(&id, taxonomy);
            }
            // An expired field may have been auto-confirmed on the way.
            save(&dash, &cli.tasks)?;
            let task = result?;
            let field = task.field(taxonomy);
            println!(
                "{id} {taxonomy}: {} ({})",
                field.display_label().unwrap_or_default(),
                task.status()
            );
            display::print_audit(dash.audit_log());
        }

        Commands::Submit { id, justification } => {
            let mut dash = open_dashboard(open_store(&cli.tasks)?, config)?;
            let next = dash.submit_task(&id, justification.as_deref())?;
            save(&dash, &cli.tasks)?;
            println!("{id} submitted");
            if let Some(next) = next {
                println!("Next task: {next}");
            }
        }

        Commands::Sweep => {
            let mut dash = open_dashboard(open_store(&cli.tasks)?, config)?;
            let report = dash.run_sweep();
            if !report.is_noop() {
                save(&dash, &cli.tasks)?;
            }
            println!(
                "Auto-confirmed {} fields across {} tasks ({} skipped)",
                report.confirmed.len(),
                report.changed.len(),
                report.skipped.len()
            );
            display::print_audit(dash.audit_log());
        }

        Commands::Watch => {
            let period = config.sweep_interval();
            let dash = open_dashboard(open_store(&cli.tasks)?, config)?;
            let mut updates = dash.subscribe();
            let dash = Arc::new(Mutex::new(dash));
            let sweeper = spawn_sweeper(Arc::clone(&dash), period);
            info!(period_secs = period.as_secs(), "watching for expired fields");

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let dash = dash.lock().unwrap_or_else(PoisonError::into_inner);
                        save(&dash, &cli.tasks)?;
                    }
                }
            }
            sweeper.abort();
            info!("watch stopped");
        }
    }

    Ok(())
}

// ── Setup ──

fn load_config(path: Option<&Path>, evaluator: Option<String>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(evaluator) = evaluator {
        config.evaluator = evaluator;
    }
    config.validate()?;
    Ok(config)
}

fn open_store(path: &Path) -> Result<TaskStore> {
    TaskStore::load_json(path).with_context(|| format!("loading tasks from {}", path.display()))
}

fn open_dashboard(store: TaskStore, config: DashboardConfig) -> Result<Dashboard> {
    Ok(Dashboard::new(store, config, Arc::new(SystemClock))?)
}

fn save(dash: &Dashboard, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    dash.store()
        .save_json(path)
        .with_context(|| format!("saving tasks to {}", path.display()))
}

// ── Argument parsers ──

fn parse_label_filter(s: &str) -> Result<(Taxonomy, LabelFilter), String> {
    let (taxonomy, filter) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TAXONOMY=FILTER, got '{s}'"))?;
    let taxonomy = taxonomy.parse::<Taxonomy>().map_err(|e| e.to_string())?;
    let filter = filter.parse::<LabelFilter>().map_err(|e| e.to_string())?;
    Ok((taxonomy, filter))
}

fn parse_label_value(s: &str) -> Result<(Taxonomy, String), String> {
    let (taxonomy, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TAXONOMY=LABEL, got '{s}'"))?;
    let taxonomy = taxonomy.parse::<Taxonomy>().map_err(|e| e.to_string())?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("empty label in '{s}'"));
    }
    Ok((taxonomy, label.to_string()))
}

fn parse_column_sort(s: &str) -> Result<(ColumnKey, bool), String> {
    let (key, descending) = match s.split_once(':') {
        Some((key, "asc")) => (key, false),
        Some((key, "desc")) => (key, true),
        Some((_, dir)) => return Err(format!("unknown sort direction '{dir}'")),
        None => (s, false),
    };
    let key = key.parse::<ColumnKey>().map_err(|e| e.to_string())?;
    Ok((key, descending))
}

fn parse_label_sort(s: &str) -> Result<(Taxonomy, LabelOrder), String> {
    let (taxonomy, order) = s
        .split_once(':')
        .ok_or_else(|| format!("expected TAXONOMY:ORDER, got '{s}'"))?;
    let taxonomy = taxonomy.parse::<Taxonomy>().map_err(|e| e.to_string())?;
    let order = order.parse::<LabelOrder>().map_err(|e| e.to_string())?;
    Ok((taxonomy, order))
}
