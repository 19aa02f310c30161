//! `bookstore` command-line client.
//!
//! Loads the endpoint configuration once, then runs a single command against
//! the backend services through the resilient request layer.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use bookstore_client::config::{self, ClientConfig};
use bookstore_client::lifecycle::{signals, Cancellation};
use bookstore_client::observability::logging;
use bookstore_client::registry;
use bookstore_client::{Bookstore, CallContext, ClientError};

#[derive(Parser)]
#[command(name = "bookstore")]
#[command(about = "Query the bookstore backend services with gateway failover", long_about = None)]
struct Cli {
    /// TOML configuration file (built-in defaults when omitted).
    #[arg(short, long, env = "BOOKSTORE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the environment (development | production).
    #[arg(short, long)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Service {
    Authors,
    Books,
    Customers,
    Orders,
    Inventory,
}

impl Service {
    fn name(self) -> &'static str {
        match self {
            Service::Authors => "authors",
            Service::Books => "books",
            Service::Customers => "customers",
            Service::Orders => "orders",
            Service::Inventory => "inventory",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every service concurrently
    Health,
    /// Probe each gateway/direct instance of one service
    Instances { service: Service },
    /// List registered services and their candidates
    Services,
    /// Fetch the whole collection of a service
    List { service: Service },
    /// Fetch one entity by id (ISBN for books and inventory)
    Get { service: Service, id: String },
    /// Authors of a book
    AuthorsByIsbn { isbn: String },
    /// Look up a customer by email
    CustomerByEmail { email: String },
    /// Orders of a customer
    OrdersByCustomer { customer_id: String },
}

#[derive(Serialize)]
struct CandidateView {
    role: &'static str,
    base_url: String,
    path_prefix: String,
}

#[derive(Serialize)]
struct ServiceView {
    name: String,
    timeout_ms: u64,
    candidates: Vec<CandidateView>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };
    if cli.env.is_some() {
        config = config::loader::finalize(config, cli.env.clone())?;
    }

    if let Err(e) = logging::init_tracing(&config.observability) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    tracing::info!(environment = %config.environment, "bookstore client starting");

    let store = build(&config)?;
    let cancellation = Arc::new(Cancellation::new());
    signals::cancel_on_ctrl_c(cancellation.clone());
    let store = store.with_context(CallContext::new().with_cancel(cancellation.token()));

    match run(&store, cli.command).await {
        Ok(()) => Ok(()),
        Err(ClientError::Aggregated(failure)) => {
            eprintln!("Error: {} {} failed", failure.service(), failure.operation());
            for attempt in failure.attempts() {
                eprintln!("  {}", attempt);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn build(config: &ClientConfig) -> Result<Bookstore, config::ConfigError> {
    let store = Bookstore::from_config(config)?;
    registry::install_global(store.registry().clone())?;
    Ok(store)
}

async fn run(store: &Bookstore, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Health => {
            let report = store.health().check_all().await;
            print_json(&report);
        }
        Commands::Instances { service } => {
            let instances = store.health().check_instances(service.name()).await?;
            print_json(&instances);
        }
        Commands::Services => {
            let registry = store.registry();
            let mut views = Vec::new();
            for name in registry.service_names() {
                let config = registry.resolve(&name)?;
                views.push(ServiceView {
                    name: config.name.clone(),
                    timeout_ms: config.timeout.as_millis() as u64,
                    candidates: config
                        .candidates()
                        .map(|c| CandidateView {
                            role: match c.role {
                                registry::CandidateRole::Gateway => "gateway",
                                registry::CandidateRole::Direct => "direct",
                            },
                            base_url: c.base_url.to_string(),
                            path_prefix: c.path_prefix.clone(),
                        })
                        .collect(),
                });
            }
            print_json(&views);
        }
        Commands::List { service } => {
            let payload = match service {
                Service::Authors => store.authors().get_all().await?,
                Service::Books => store.books().get_all().await?,
                Service::Customers => store.customers().get_all().await?,
                Service::Orders => store.orders().get_all().await?,
                Service::Inventory => store.inventory().get_all().await?,
            };
            print_json(&payload);
        }
        Commands::Get { service, id } => {
            let payload = match service {
                Service::Authors => store.authors().get_by_id(&id).await?,
                Service::Books => store.books().get_by_isbn(&id).await?,
                Service::Customers => store.customers().get_by_id(&id).await?,
                Service::Orders => store.orders().get_by_id(&id).await?,
                Service::Inventory => store.inventory().get_by_isbn(&id).await?,
            };
            print_json(&payload);
        }
        Commands::AuthorsByIsbn { isbn } => {
            print_json(&store.authors().get_by_book_isbn(&isbn).await?);
        }
        Commands::CustomerByEmail { email } => {
            print_json(&store.customers().get_by_email(&email).await?);
        }
        Commands::OrdersByCustomer { customer_id } => {
            print_json(&store.orders().get_all_by_customer_id(&customer_id).await?);
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to render output: {}", e),
    }
}
