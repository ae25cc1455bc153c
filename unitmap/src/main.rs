use clap::ArgMatches;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use unitmap::commands::command_argument_builder;
use unitmap::site;
use unitmap_core::crawl::{CrawlOptions, execute_crawl};
use unitmap_core::print_banner;
use unitmap_core::report::{ReportFormat, generate_crawl_report};
use unitmap_core::store::DatasetStore;
use unitmap_scraper::driver::Driver;
use unitmap_scraper::WebDriverSession;
use url::Url;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command).await,
        Some(("status", primary_command)) => handle_status(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_crawl(args: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let webdriver = args.get_one::<Url>("webdriver").unwrap();
    let target = args.get_one::<Url>("url");
    let dataset = args.get_one::<String>("dataset").unwrap();
    let all_regions = args.get_flag("all-regions");
    let headed = args.get_flag("headed");
    let output = args.get_one::<PathBuf>("output");
    let format = ReportFormat::from_str(args.get_one::<String>("format").unwrap())
        .expect("clap restricts format to known values");

    let mut site_spec = site::reference_site();
    if let Some(url) = target {
        site_spec.url = url.to_string();
    }

    let regions: Vec<String> = if all_regions {
        Vec::new()
    } else {
        args.get_many::<String>("region")
            .map(|values| values.cloned().collect())
            .unwrap_or_else(site::default_regions)
    };

    let expanded_dataset = shellexpand::tilde(dataset);
    let dataset_dir = PathBuf::from(expanded_dataset.as_ref());

    println!("\nCrawling {}", site_spec.url);
    println!("Dataset: {}", dataset_dir.display());
    match &regions[..] {
        [] => println!("Regions: all offered by the page\n"),
        names => println!("Regions: {}\n", names.join(", ")),
    }

    let session = match WebDriverSession::connect(webdriver.as_str(), !headed).await {
        Ok(session) => Arc::new(session),
        Err(e) => {
            eprintln!("✗ Could not reach WebDriver at {}: {}", webdriver, e);
            eprintln!("  Is geckodriver running?");
            std::process::exit(1);
        }
    };
    let driver: Arc<dyn Driver> = session.clone();

    let options = CrawlOptions {
        dataset_dir,
        regions,
        show_progress_bar: true,
    };

    match execute_crawl(driver, site_spec, options).await {
        Ok(outcome) => {
            if let Ok(session) = Arc::try_unwrap(session)
                && let Err(e) = session.close().await
            {
                tracing::warn!("could not close the browser session: {}", e);
            }

            println!("\n✓ Crawl complete!\n");
            let report = generate_crawl_report(&outcome, format);
            match output {
                Some(path) => {
                    if let Err(e) = fs::write(path, &report) {
                        eprintln!("✗ Could not write report to {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                    println!("✓ Report saved to {}", path.display());
                }
                None => print!("{}", report),
            }
        }
        Err(e) => {
            eprintln!("✗ Crawl failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn handle_status(args: &ArgMatches) {
    let dataset = args.get_one::<String>("dataset").unwrap();
    let expanded_dataset = shellexpand::tilde(dataset);
    let store = DatasetStore::new(PathBuf::from(expanded_dataset.as_ref()));

    match store.list_artifacts() {
        Ok(artifacts) if artifacts.is_empty() => {
            println!(
                "No artifacts under {} yet; a crawl would start from scratch.",
                store.root().display()
            );
        }
        Ok(artifacts) => {
            println!(
                "{} artifacts under {}:\n",
                artifacts.len(),
                store.root().display()
            );
            let mut current_region: Option<&String> = None;
            for (region, project) in &artifacts {
                if current_region != Some(region) {
                    println!("  {}", region);
                    current_region = Some(region);
                }
                println!("    {}", project);
            }
            println!("\nA resumed crawl skips all of the above.");
        }
        Err(e) => {
            eprintln!("✗ Could not read dataset root: {}", e);
            std::process::exit(1);
        }
    }
}
