//! Selector configuration for the reference deployment.
//!
//! These address one specific page layout and are pure data to the engine.
//! The absolute XPaths are brittle on purpose: the site offers no stable ids
//! for the selection boxes, only for the virtualized list internals.

use unitmap_scraper::{ExtractStrategy, LevelSpec, Selector, SiteSpec};

const CATALOG_URL: &str = "https://onehousing.vn/cong-cu/dinh-gia";

const FORM: &str = "/html/body/div[2]/div[4]/div[2]/div/div[2]/div/div[2]/div[1]/div[1]/form";

pub fn reference_site() -> SiteSpec {
    SiteSpec {
        url: CATALOG_URL.to_string(),
        region: LevelSpec {
            name: "region",
            trigger: Selector::xpath(format!("{FORM}/div/div[1]/div/div")),
            options: Selector::xpath(format!("{FORM}/div/div[1]/div/div[2]/div/ul/li")),
            filter_label: "Tỉnh/thành phố".to_string(),
            strategy: ExtractStrategy::Static,
            is_leaf: false,
        },
        project: LevelSpec {
            name: "project",
            trigger: Selector::xpath(format!("{FORM}/div/div[2]/div/div")),
            options: Selector::xpath(format!("{FORM}/div/div[2]/div/div[2]/div/ul/div/div/div/div")),
            filter_label: "Tìm dự án".to_string(),
            strategy: ExtractStrategy::Virtualized {
                viewport: Selector::css(r#"[data-test-id="virtuoso-scroller"]"#),
                rows: Selector::css(r#"li[role="option"] div.text-om-t16"#),
            },
            is_leaf: false,
        },
        building: LevelSpec {
            name: "building",
            trigger: Selector::xpath(format!("{FORM}/div/div[3]/div/div")),
            options: Selector::xpath(format!("{FORM}/div/div[3]/div/div[2]/div/ul/li")),
            filter_label: "Tìm toà/khu".to_string(),
            strategy: ExtractStrategy::Static,
            is_leaf: false,
        },
        floor: LevelSpec {
            name: "floor",
            trigger: Selector::xpath(format!("{FORM}/div/div[4]/div/div")),
            options: Selector::xpath(format!("{FORM}/div/div[4]/div/div[2]/div/ul/li")),
            filter_label: "Tầng".to_string(),
            strategy: ExtractStrategy::Static,
            is_leaf: false,
        },
        apartment: LevelSpec {
            name: "apartment",
            trigger: Selector::xpath(format!("{FORM}/div/div[5]/div/div")),
            options: Selector::xpath(format!("{FORM}/div/div[5]/div/div[2]/div/ul/li")),
            filter_label: String::new(),
            strategy: ExtractStrategy::Static,
            is_leaf: true,
        },
    }
}

/// The reference run deliberately restricts the region loop to one label.
/// `--all-regions` or explicit `--region` flags override this.
pub fn default_regions() -> Vec<String> {
    vec!["TP.Hồ Chí Minh".to_string()]
}
