//! Headless rating estimate for one category, printed as text.

use std::path::PathBuf;

use aelens::catalog;
use aelens::config::{self, AppSettings, StoreBackend};
use aelens::estimator::{UserQuery, format_estimate};
use aelens::logging::{self, ConsoleTarget, LogOptions};
use aelens::pipeline::{self, DashboardSnapshot};
use aelens::store;
use aelens::table::Column;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if options.list_categories {
        for entry in catalog::categories() {
            println!("{:<30} {}", entry.display_name, entry.collection_id);
        }
        return Ok(());
    }

    if let Err(err) = logging::init_with(LogOptions {
        default_directive: "warn".to_string(),
        console: ConsoleTarget::Stderr,
    }) {
        eprintln!("Logging disabled: {err}");
    }

    let mut settings = match &options.config {
        Some(path) => config::load_from_path(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    if let Some(dir) = &options.data_dir {
        settings.store.backend = StoreBackend::JsonDir;
        settings.store.data_dir = Some(dir.clone());
    }
    let query = options.query(&settings);
    let category = options
        .category
        .clone()
        .unwrap_or_else(|| catalog::default_category().display_name.to_string());

    let store = store::open_store(&settings.store).map_err(|err| err.to_string())?;
    let snapshot = pipeline::run(store.as_ref(), &settings, &category, &query)
        .map_err(|err| format!("{} ({})", err, err.kind()))?;
    print_estimate(&snapshot);
    if options.describe {
        print_description(&snapshot);
    }
    Ok(())
}

fn print_estimate(snapshot: &DashboardSnapshot) {
    println!("category: {}", snapshot.category.display_name);
    println!("rows: {}", snapshot.table.len());
    match &snapshot.fit {
        Ok(report) => {
            match report.score_percent {
                Some(score) => println!("score: {score}%"),
                None => println!("score: unavailable (held-out ratings do not vary)"),
            }
            println!(
                "test rows: {}  mae={:.4}  rmse={:.4}",
                report.split.test.len(),
                report.metrics.mae,
                report.metrics.rmse
            );
        }
        Err(err) => println!("score: unavailable ({err})"),
    }
    match &snapshot.estimate {
        Ok(value) => println!("estimated rating: {}", format_estimate(*value)),
        Err(err) => println!("estimated rating: unavailable ({err})"),
    }
}

fn print_description(snapshot: &DashboardSnapshot) {
    println!();
    println!("first rows:");
    let header: Vec<&str> = Column::ALL.iter().map(|column| column.name()).collect();
    println!("  {}", header.join(" | "));
    for row in snapshot.head() {
        let cells: Vec<String> = Column::ALL
            .iter()
            .map(|column| match column {
                Column::Text(text) => row.text(*text).unwrap_or("").to_string(),
                Column::Numeric(numeric) => {
                    row.numeric(*numeric).map(|v| v.to_string()).unwrap_or_default()
                }
            })
            .collect();
        println!("  {}", cells.join(" | "));
    }

    println!();
    println!(
        "{:<10} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for summary in &snapshot.description.summaries {
        let cell = |value: Option<f64>| {
            value
                .map(|v| format!("{v:.3}"))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:<10} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            summary.column.name(),
            summary.count,
            cell(summary.mean),
            cell(summary.std),
            cell(summary.min),
            cell(summary.q25),
            cell(summary.median),
            cell(summary.q75),
            cell(summary.max)
        );
    }

    println!();
    println!("missing values:");
    for count in &snapshot.description.null_counts {
        println!("  {:<10} {}", count.column.name(), count.missing);
    }

    println!();
    println!("correlation:");
    let matrix = &snapshot.description.correlation;
    let mut line = format!("  {:<10}", "");
    for column in &matrix.columns {
        line.push_str(&format!("{:>10}", column.name()));
    }
    println!("{line}");
    for (row, column) in matrix.columns.iter().enumerate() {
        let mut line = format!("  {:<10}", column.name());
        for col in 0..matrix.columns.len() {
            line.push_str(&format!("{:>10}", matrix.label(row, col)));
        }
        println!("{line}");
    }

    println!();
    println!("histograms:");
    for histogram in &snapshot.description.histograms {
        let counts: Vec<String> = histogram.bins.iter().map(|bin| bin.count.to_string()).collect();
        println!("  {:<10} [{}]", histogram.column.name(), counts.join(", "));
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    category: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    sold: Option<String>,
    shipping: Option<String>,
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    describe: bool,
    list_categories: bool,
}

impl CliOptions {
    /// Query from flags, falling back to the configured defaults.
    fn query(&self, settings: &AppSettings) -> UserQuery {
        let defaults = &settings.query;
        UserQuery::new(
            self.min_price.clone().unwrap_or_else(|| defaults.min_price.clone()),
            self.max_price.clone().unwrap_or_else(|| defaults.max_price.clone()),
            self.sold.clone().unwrap_or_else(|| defaults.sold.clone()),
            self.shipping.clone().unwrap_or_else(|| defaults.shipping.clone()),
        )
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => return Err(help_text()),
            "--describe" => options.describe = true,
            "--list-categories" => options.list_categories = true,
            "--category" | "--min-price" | "--max-price" | "--sold" | "--shipping"
            | "--config" | "--data-dir" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| format!("{flag} requires a value"))?;
                match flag {
                    "--category" => options.category = Some(value),
                    "--min-price" => options.min_price = Some(value),
                    "--max-price" => options.max_price = Some(value),
                    "--sold" => options.sold = Some(value),
                    "--shipping" => options.shipping = Some(value),
                    "--config" => options.config = Some(PathBuf::from(value)),
                    _ => options.data_dir = Some(PathBuf::from(value)),
                }
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "aelens-estimate",
        "",
        "Fit the rating model for one category and estimate a rating for a listing.",
        "",
        "Usage:",
        "  aelens-estimate [--category <name>] [--min-price <n>] [--max-price <n>]",
        "                  [--sold <n>] [--shipping <n>] [--describe]",
        "  aelens-estimate --list-categories",
        "",
        "Options:",
        "  --category <name>   Display name or collection id (default: Appliances).",
        "  --min-price <n>     Minimum listed price (default from config).",
        "  --max-price <n>     Maximum listed price (default from config).",
        "  --sold <n>          Units sold (default from config).",
        "  --shipping <n>      Shipping cost (default from config).",
        "  --describe          Also print the data description sections.",
        "  --list-categories   Print the category catalog and exit.",
        "  --config <path>     Read settings from this file instead of the app directory.",
        "  --data-dir <path>   Read exported collections from this folder.",
    ]
    .join("\n")
}
