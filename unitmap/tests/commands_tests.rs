use unitmap::commands::command_argument_builder;
use unitmap::site;
use unitmap_scraper::ExtractStrategy;
use url::Url;

#[test]
fn test_command_tree_is_well_formed() {
    command_argument_builder().debug_assert();
}

#[test]
fn test_crawl_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["unitmap", "crawl"])
        .unwrap();
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "crawl");
    assert_eq!(
        sub.get_one::<Url>("webdriver").unwrap().as_str(),
        "http://localhost:4444/"
    );
    assert_eq!(sub.get_one::<String>("dataset").unwrap(), "./dataset");
    assert_eq!(sub.get_one::<String>("format").unwrap(), "text");
    assert!(!sub.get_flag("all-regions"));
    assert!(!sub.get_flag("headed"));
    assert!(sub.get_many::<String>("region").is_none());
}

#[test]
fn test_region_flag_is_repeatable() {
    let matches = command_argument_builder()
        .try_get_matches_from(["unitmap", "crawl", "-r", "TP.Hà Nội", "-r", "TP.Hồ Chí Minh"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    let regions: Vec<&str> = sub
        .get_many::<String>("region")
        .unwrap()
        .map(String::as_str)
        .collect();
    assert_eq!(regions, ["TP.Hà Nội", "TP.Hồ Chí Minh"]);
}

#[test]
fn test_region_conflicts_with_all_regions() {
    let result = command_argument_builder().try_get_matches_from([
        "unitmap",
        "crawl",
        "-r",
        "TP.Hà Nội",
        "--all-regions",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_format_rejects_unknown_values() {
    let result =
        command_argument_builder().try_get_matches_from(["unitmap", "crawl", "-f", "parquet"]);
    assert!(result.is_err());
}

#[test]
fn test_reference_site_levels_are_consistent() {
    let spec = site::reference_site();

    // Exactly one virtualized level, the project list.
    let virtualized: Vec<&str> = spec
        .levels()
        .iter()
        .filter(|level| matches!(level.strategy, ExtractStrategy::Virtualized { .. }))
        .map(|level| level.name)
        .collect();
    assert_eq!(virtualized, ["project"]);

    // One leaf level at the bottom, and every selection level has a filter.
    let leaves: Vec<&str> = spec
        .levels()
        .iter()
        .filter(|level| level.is_leaf)
        .map(|level| level.name)
        .collect();
    assert_eq!(leaves, ["apartment"]);
    for level in spec.levels().iter().filter(|level| !level.is_leaf) {
        assert!(!level.filter_label.is_empty(), "{} has no filter", level.name);
    }

    assert!(!site::default_regions().is_empty());
}
