use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("unitmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("unitmap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Walk the catalog's cascading selection widget and persist one CSV \
                artifact per project. Already-persisted projects are skipped.",
                )
                .arg(
                    arg!(-w --"webdriver" <URL>)
                        .required(false)
                        .help("WebDriver endpoint driving the browser session")
                        .value_parser(clap::value_parser!(Url))
                        .default_value("http://localhost:4444"),
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Catalog page to crawl (default: the built-in reference site)")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"dataset" <PATH>)
                        .required(false)
                        .help("Dataset root; artifact existence here is the resume checkpoint")
                        .default_value("./dataset"),
                )
                .arg(
                    arg!(-r --"region" <NAME>)
                        .required(false)
                        .help("Region label to crawl; repeat for several (default: the site's reference region)")
                        .action(clap::ArgAction::Append)
                        .conflicts_with("all-regions"),
                )
                .arg(
                    arg!(--"all-regions")
                        .required(false)
                        .help("Enumerate every region offered by the page instead")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("region"),
                )
                .arg(
                    arg!(--"headed")
                        .required(false)
                        .help("Run the browser with a visible window")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("status")
                .about("List persisted artifacts: everything a resumed crawl would skip")
                .arg(
                    arg!(-d --"dataset" <PATH>)
                        .required(false)
                        .help("Dataset root to inspect")
                        .default_value("./dataset"),
                ),
        )
}
