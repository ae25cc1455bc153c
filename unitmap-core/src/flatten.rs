use serde::{Deserialize, Serialize};
use unitmap_scraper::Project;

/// One persisted row: a full leaf path through a project subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRow {
    pub project: String,
    pub building: String,
    pub floor: String,
    pub apartment: String,
}

/// Flatten a project subtree into one row per reachable
/// (building, floor, apartment) triple. Buildings or floors without
/// children contribute nothing.
pub fn flatten_project(project: &Project) -> Vec<UnitRow> {
    let mut rows = Vec::new();
    for building in &project.buildings {
        for floor in &building.floors {
            for apartment in &floor.apartments {
                rows.push(UnitRow {
                    project: project.name.clone(),
                    building: building.name.clone(),
                    floor: floor.name.clone(),
                    apartment: apartment.name.clone(),
                });
            }
        }
    }
    rows
}
