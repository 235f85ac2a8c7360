use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use tiendafix::config::{config_dir, init_config_dir, load_config, load_config_or_default};
use tiendafix::format::{add_summary_footer, format_money};
use tiendafix::{
    ApiClient, Config, CustomDateRange, CustomerSource, DateFilter, DemoFixtures, DetailView,
    FilterState, Result, StatusFilter, TiendaError, TypeFilter,
};

#[derive(Parser)]
#[command(name = "tiendafix")]
#[command(version, about = "Customer service history for phone-repair shops", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.tiendafix)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show configuration in use
    Status,

    /// List demo customers
    Customers {
        /// JSON file with customer fixtures (default: built-in sample data)
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Show a customer's filtered service history and totals
    History {
        /// Customer identifier
        customer: String,

        /// Date window: all, 7d, 30d, 3m, 6m, year, custom
        #[arg(short, long, value_name = "TOKEN")]
        date: Option<DateFilter>,

        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Custom range end, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Service type: all, repair, unlock, sale
        #[arg(short = 't', long = "type", default_value = "all")]
        service_type: TypeFilter,

        /// Status: all, pending, completed
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Use built-in demo data instead of the API
        #[arg(long)]
        demo: bool,

        /// JSON file with customer fixtures (implies --demo)
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let config = load_config_or_default(&cfg_dir)?;
    init_logging(&config.logging.level);
    debug!(config_dir = %cfg_dir.display(), "starting");

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Customers { fixtures } => cmd_customers(fixtures.as_deref()),
        Commands::History {
            customer,
            date,
            from,
            to,
            service_type,
            status,
            demo,
            fixtures,
        } => {
            let source = open_source(&cfg_dir, &config, demo, fixtures.as_deref())?;
            let date = match date {
                Some(d) => d,
                None if from.is_some() || to.is_some() => DateFilter::Custom,
                None => DateFilter::All,
            };
            if date != DateFilter::Custom && (from.is_some() || to.is_some()) {
                warn!(%date, "--from/--to only apply to --date custom; ignoring them");
            }
            let filters = FilterState {
                date,
                custom_range: CustomDateRange::new(from, to),
                service_type,
                status,
            };
            cmd_history(&*source, &config, &customer, filters)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Pick where customer details come from: fixtures, demo sample or the API
fn open_source(
    cfg_dir: &Path,
    config: &Config,
    demo: bool,
    fixtures: Option<&Path>,
) -> Result<Box<dyn CustomerSource>> {
    if let Some(path) = fixtures {
        return Ok(Box::new(DemoFixtures::from_path(path)?));
    }
    if demo {
        return Ok(Box::new(DemoFixtures::sample(Utc::now())));
    }
    if !cfg_dir.exists() {
        return Err(TiendaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(Box::new(ApiClient::new(&config.api)))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config_dir(cfg_dir)?;

    println!("Initialized tiendafix config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Point it at your dashboard:  $EDITOR {}", path.display());
    println!("  2. Look up a customer:          tiendafix history <customer-id>");
    println!();
    println!("Or try it with sample data:");
    println!("  tiendafix history c-001 --demo --date 30d");

    Ok(())
}

/// Show configuration in use
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(TiendaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;

    println!("TiendaFix Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("API base URL:     {}", config.api.base_url);
    println!("Timeout:          {}s", config.api.timeout_secs);
    println!(
        "Auth token:       {}",
        if config.api.token.is_some() { "set" } else { "not set" }
    );
    println!("Currency:         {}", config.display.currency_symbol);
    println!("Log level:        {}", config.logging.level);

    Ok(())
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "SERVICES")]
    services: usize,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TYPE")]
    service_type: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "COST")]
    cost: String,
}

/// List demo customers
fn cmd_customers(fixtures: Option<&Path>) -> Result<()> {
    let fixtures = match fixtures {
        Some(path) => DemoFixtures::from_path(path)?,
        None => DemoFixtures::sample(Utc::now()),
    };

    if fixtures.customers().is_empty() {
        println!("No customers in fixtures.");
        return Ok(());
    }

    let rows: Vec<CustomerRow> = fixtures
        .customers()
        .iter()
        .map(|c| CustomerRow {
            id: c.id.to_string(),
            name: c.name.clone(),
            phone: c.phone.clone().unwrap_or_else(|| "-".to_string()),
            services: c.services.len(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show a customer's filtered service history
fn cmd_history(
    source: &dyn CustomerSource,
    config: &Config,
    customer_id: &str,
    filters: FilterState,
) -> Result<()> {
    let now = Utc::now();
    let symbol = &config.display.currency_symbol;

    let mut view = DetailView::new();
    view.load(source, customer_id);
    if let Some(message) = view.error() {
        return Err(TiendaError::DetailUnavailable(message.to_string()));
    }

    view.set_filters(filters);

    let Some(detail) = view.detail() else {
        return Err(TiendaError::CustomerNotFound(customer_id.to_string()));
    };

    println!("{} ({})", detail.name, detail.id);
    if let Some(phone) = &detail.phone {
        println!("  Phone:  {phone}");
    }
    if let Some(email) = &detail.email {
        println!("  Email:  {email}");
    }
    if let Some(notes) = &detail.notes {
        println!("  Notes:  {notes}");
    }

    let active = view.filters();
    let mut filter_line = format!(
        "Filters: date={} type={} status={}",
        active.date, active.service_type, active.status
    );
    if active.date == DateFilter::Custom {
        let fmt_bound = |d: Option<NaiveDate>| d.map_or("*".to_string(), |d| d.to_string());
        filter_line.push_str(&format!(
            " range={}..{}",
            fmt_bound(active.custom_range.start),
            fmt_bound(active.custom_range.end)
        ));
    }
    println!("{filter_line}");
    println!();

    let services = view.services(now);
    let summary = view.summary(now);

    if services.is_empty() {
        println!("No services match the current filters.");
        println!(
            "Services: 0  Pending: 0  Completed: 0  Total spent: {}",
            format_money(summary.total_spent, symbol)
        );
        return Ok(());
    }

    let rows: Vec<ServiceRow> = services
        .iter()
        .enumerate()
        .map(|(idx, s)| ServiceRow {
            index: idx + 1,
            id: s.id.to_string(),
            date: s.created_at.format("%Y-%m-%d").to_string(),
            service_type: s.service_type.to_string(),
            status: s.status.to_string(),
            cost: format_money(s.cost(), symbol),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = add_summary_footer(
        &table,
        &[
            ("SERVICES", summary.total_services.to_string()),
            ("PENDING", summary.pending_services.to_string()),
            ("COMPLETED", summary.completed_services.to_string()),
            ("TOTAL SPENT", format_money(summary.total_spent, symbol)),
        ],
    );
    println!("{table}");

    Ok(())
}
