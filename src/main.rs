use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{Environment, Settings};
use core_types::Employee;
use database::{connect, run_migrations, DbRepository};
use service::EmployeeService;
use std::sync::Arc;

/// The main entry point for the employee directory.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_settings().context("Failed to load settings")?;
    if let Some(environment) = cli.environment {
        settings.environment = environment;
    }
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            web_server::run_server(&settings).await
        }
        Commands::Migrate => {
            let pool = connect(&settings.database).await?;
            run_migrations(&pool).await?;
            println!("Migrations applied.");
            Ok(())
        }
        Commands::Stats => handle_stats(&settings).await,
        Commands::Search(args) => handle_search(&settings, &args.query).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small HTTP service for managing and searching employees.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides the `environment` setting.
    #[arg(long, value_enum, global = true)]
    environment: Option<Environment>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
    /// Print aggregate figures about the stored employees.
    Stats,
    /// Run a ranked search and print the matches.
    Search(SearchArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct SearchArgs {
    /// Free-text query matched against name, phone and city (2 to 100 characters).
    query: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn employee_service(settings: &Settings) -> anyhow::Result<EmployeeService> {
    let pool = connect(&settings.database).await?;
    Ok(EmployeeService::new(Arc::new(DbRepository::new(pool))))
}

async fn handle_stats(settings: &Settings) -> anyhow::Result<()> {
    let stats = employee_service(settings).await?.employee_stats().await?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Value"])
        .add_row(vec!["Employees".to_string(), stats.total_count.to_string()])
        .add_row(vec!["Cities".to_string(), stats.cities_count.to_string()])
        .add_row(vec![
            "Most common city".to_string(),
            stats.most_common_city.unwrap_or_else(|| "-".to_string()),
        ]);
    println!("{table}");
    Ok(())
}

async fn handle_search(settings: &Settings, query: &str) -> anyhow::Result<()> {
    let employees = employee_service(settings)
        .await?
        .search_employees(query)
        .await?;

    if employees.is_empty() {
        println!("No employees match '{}'.", query.trim());
        return Ok(());
    }
    println!("{}", employee_table(&employees));
    Ok(())
}

fn employee_table(employees: &[Employee]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Phone", "City"]);
    for employee in employees {
        table.add_row(vec![
            employee.id.to_string(),
            employee.name.clone(),
            employee.phone.clone(),
            employee.city.clone(),
        ]);
    }
    table
}
