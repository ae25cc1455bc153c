use crate::extract::ExtractStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an element is addressed on the page. The reference site's selection
/// boxes are only reachable by absolute XPath; the virtualized list internals
/// expose stable CSS hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    XPath(String),
    Css(String),
}

impl Selector {
    pub fn xpath(s: impl Into<String>) -> Self {
        Selector::XPath(s.into())
    }

    pub fn css(s: impl Into<String>) -> Self {
        Selector::Css(s.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::XPath(s) => write!(f, "xpath={}", s),
            Selector::Css(s) => write!(f, "css={}", s),
        }
    }
}

/// One level of the cascading widget.
///
/// `trigger` is the closed box control, `options` the option-list container
/// that opens under it, `filter_label` the accessible label of the level's
/// search field. Leaf levels are extraction-only: no trigger, no filter, no
/// further descent.
#[derive(Debug, Clone)]
pub struct LevelSpec {
    pub name: &'static str,
    pub trigger: Selector,
    pub options: Selector,
    pub filter_label: String,
    pub strategy: ExtractStrategy,
    pub is_leaf: bool,
}

/// Full per-site configuration: the page URL plus the five level descriptors,
/// outermost first. The traversal engine treats all of this as opaque data.
#[derive(Debug, Clone)]
pub struct SiteSpec {
    pub url: String,
    pub region: LevelSpec,
    pub project: LevelSpec,
    pub building: LevelSpec,
    pub floor: LevelSpec,
    pub apartment: LevelSpec,
}

impl SiteSpec {
    /// Levels in descent order. Depth indexes into this.
    pub fn levels(&self) -> [&LevelSpec; 5] {
        [
            &self.region,
            &self.project,
            &self.building,
            &self.floor,
            &self.apartment,
        ]
    }

    pub fn level(&self, depth: usize) -> &LevelSpec {
        self.levels()[depth]
    }

    pub fn depth(&self) -> usize {
        self.levels().len()
    }
}
