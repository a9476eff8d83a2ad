use bmi_core::history::statistics;
use bmi_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "BMI and health metrics calculator with history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BMI, BMR and ideal weight, and record the result
    Calc {
        #[arg(long)]
        name: String,

        /// Age in years
        #[arg(long, allow_hyphen_values = true)]
        age: String,

        /// Male, Female or any other value (no BMR adjustment)
        #[arg(long, default_value = "Male")]
        gender: String,

        /// Weight in kg
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Height in cm
        #[arg(long, allow_hyphen_values = true)]
        height: String,

        /// Also show the diet plan
        #[arg(long)]
        plan: bool,

        /// Dry run - show results without recording them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show statistics and the full measurement history (default)
    History,

    /// Show summary statistics only
    Stats,

    /// Show the BMI trend over time
    Trend,

    /// Delete all recorded history
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Export the history table to CSV
    Export {
        /// Output CSV path
        path: PathBuf,
    },

    /// Show the configuration, or write the defaults with --init
    Config {
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    bmi_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_invalid_input() => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let history_path = config.history_path(&data_dir);
    tracing::debug!("Using history file {:?}", history_path);

    match cli.command {
        Some(Commands::Calc {
            name,
            age,
            gender,
            weight,
            height,
            plan,
            dry_run,
        }) => {
            let raw = RawMeasurement {
                name,
                age,
                gender,
                weight,
                height,
            };
            cmd_calc(&history_path, &raw, plan, dry_run)
        }
        Some(Commands::History) | None => cmd_history(&history_path),
        Some(Commands::Stats) => cmd_stats(&history_path),
        Some(Commands::Trend) => cmd_trend(&history_path),
        Some(Commands::Clear { yes }) => cmd_clear(&history_path, yes),
        Some(Commands::Export { path }) => cmd_export(&history_path, &path),
        Some(Commands::Config { init }) => cmd_config(&config, init),
    }
}

fn cmd_calc(history_path: &Path, raw: &RawMeasurement, plan: bool, dry_run: bool) -> Result<()> {
    let measurement = raw.validate()?;
    let assessment = assess(&measurement)?;

    display_assessment(&assessment);
    if plan {
        display_diet_plan(&assessment.diet_plan);
    }

    if dry_run {
        println!("\n[Dry run - not recording result]");
        return Ok(());
    }

    let entry = assessment.history_entry(chrono::Local::now().naive_local());
    let mut store = HistoryStore::open(history_path);
    match store.append(entry) {
        Ok(()) => {
            println!("\n✓ Saved to history ({} records)", store.len());
        }
        Err(e) if e.is_storage() => {
            // The result was still shown; only the record is missing on disk
            eprintln!("\n⚠ {}", e);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn cmd_history(history_path: &Path) -> Result<()> {
    let store = HistoryStore::open(history_path);

    if store.is_empty() {
        println!("No history recorded yet. Calculate your first BMI!");
        return Ok(());
    }

    display_statistics(&store.statistics());
    println!();
    println!("Full Measurement History");
    println!(
        "  {:<10}  {:<16}  {:>11}  {:>11}  {:>6}  {}",
        "Date", "Name", "Weight (kg)", "Height (cm)", "BMI", "Category"
    );
    for entry in store.entries() {
        let row = bmi_core::export::HistoryRow::from(entry);
        println!(
            "  {:<10}  {:<16}  {:>11}  {:>11}  {:>6}  {}",
            row.date, row.name, row.weight_kg, row.height_cm, row.bmi, row.category
        );
    }

    Ok(())
}

fn cmd_stats(history_path: &Path) -> Result<()> {
    let entries = bmi_core::history::load_history(history_path);
    display_statistics(&statistics(&entries));
    Ok(())
}

fn cmd_trend(history_path: &Path) -> Result<()> {
    const BAR_WIDTH: f64 = 40.0;

    let store = HistoryStore::open(history_path);
    let Some(trend) = bmi_trend(store.entries()) else {
        println!("Need at least 2 records to show a trend graph.");
        return Ok(());
    };

    println!("BMI Trend Over Time ({:.0} - {:.0})", trend.y_min, trend.y_max);
    println!();
    let span = (trend.y_max - trend.y_min).max(f64::EPSILON);
    for point in &trend.points {
        let len = (((point.bmi - trend.y_min) / span) * BAR_WIDTH).round().max(0.0) as usize;
        println!(
            "  {}  {:>6.2}  {:<40}  {}",
            point.date,
            point.bmi,
            "█".repeat(len),
            point.category
        );
    }
    println!();
    println!("  Change: {:+.2}", trend.change());
    println!();
    for zone in &trend.zones {
        println!("  {:>5.1} - {:<5.1} {}", zone.lower, zone.upper, zone.category);
    }

    Ok(())
}

fn cmd_clear(history_path: &Path, yes: bool) -> Result<()> {
    if !yes && !confirm_clear()? {
        println!("Cancelled - history kept.");
        return Ok(());
    }

    let mut store = HistoryStore::open(history_path);
    store.clear()?;
    println!("✓ All BMI history records have been successfully deleted.");
    Ok(())
}

fn cmd_export(history_path: &Path, csv_path: &Path) -> Result<()> {
    let store = HistoryStore::open(history_path);
    let count = export_csv(store.entries(), csv_path)?;
    println!("✓ Exported {} records to {}", count, csv_path.display());
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> Result<()> {
    let config_path = Config::default_config_path();

    if init {
        if config_path.exists() {
            println!("Config already exists at {}", config_path.display());
        } else {
            Config::default().save_to(&config_path)?;
            println!("✓ Wrote default config to {}", config_path.display());
        }
        return Ok(());
    }

    println!("# {}", config_path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

fn display_assessment(assessment: &Assessment) {
    let metrics = &assessment.metrics;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  BODY & HEALTH RESULTS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Name: {}", assessment.measurement.name());
    println!("  Your BMI: {}", metrics.bmi);
    println!("  Category: {}", metrics.category);
    println!("  {}", assessment.advice);
    println!();
    println!("  BMR: {} kcal/day", metrics.bmr);
    println!(
        "  Ideal Weight Range: {} - {} kg",
        metrics.ideal_weight_low, metrics.ideal_weight_high
    );
}

fn display_diet_plan(plan: &DietPlan) {
    println!();
    println!("  {}", plan.title);
    println!("  Daily Goal: {} kcal", plan.daily_goal_kcal);
    println!();
    println!("  {}", plan.focus);
    println!();
    println!("  Macros: {}", plan.macro_split);
    for suggestion in &plan.suggestions {
        println!("  → {}", suggestion);
    }
    println!();
    println!("  *Consult a healthcare professional before starting any new diet.");
}

fn display_statistics(stats: &HistoryStatistics) {
    println!("Summary Statistics");
    println!("  Total Records: {}", stats.count);
    println!(
        "  Average BMI:   {}",
        HistoryStatistics::display_value(stats.avg_bmi)
    );
    println!(
        "  Lowest BMI:    {}",
        HistoryStatistics::display_value(stats.min_bmi)
    );
    println!(
        "  Highest BMI:   {}",
        HistoryStatistics::display_value(stats.max_bmi)
    );
}

fn confirm_clear() -> Result<bool> {
    print!(
        "Are you sure you want to permanently delete ALL recorded history? \
         This action cannot be undone. [y/N] "
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
