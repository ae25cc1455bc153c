use serde::{Deserialize, Serialize};

/// What the generic traversal engine produces: a label and whatever was
/// reachable beneath it. Converted into the typed catalog at the project
/// boundary, where persistence happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(label: impl Into<String>) -> Self {
        Node {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(label: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            label: label.into(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apartment {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub name: String,
    pub apartments: Vec<Apartment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub floors: Vec<Floor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub buildings: Vec<Building>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub projects: Vec<Project>,
}

impl From<Node> for Apartment {
    fn from(node: Node) -> Self {
        Apartment { name: node.label }
    }
}

impl From<Node> for Floor {
    fn from(node: Node) -> Self {
        Floor {
            name: node.label,
            apartments: node.children.into_iter().map(Apartment::from).collect(),
        }
    }
}

impl From<Node> for Building {
    fn from(node: Node) -> Self {
        Building {
            name: node.label,
            floors: node.children.into_iter().map(Floor::from).collect(),
        }
    }
}

impl From<Node> for Project {
    fn from(node: Node) -> Self {
        Project {
            name: node.label,
            buildings: node.children.into_iter().map(Building::from).collect(),
        }
    }
}

impl From<Node> for Region {
    fn from(node: Node) -> Self {
        Region {
            name: node.label,
            projects: node.children.into_iter().map(Project::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_conversion_keeps_nesting() {
        let node = Node::branch(
            "Sunrise",
            vec![Node::branch(
                "T1",
                vec![Node::branch("01", vec![Node::leaf("101"), Node::leaf("102")])],
            )],
        );

        let project = Project::from(node);
        assert_eq!(project.name, "Sunrise");
        assert_eq!(project.buildings.len(), 1);
        assert_eq!(project.buildings[0].floors[0].apartments.len(), 2);
        assert_eq!(project.buildings[0].floors[0].apartments[1].name, "102");
    }

    #[test]
    fn empty_subtrees_are_preserved() {
        let project = Project::from(Node::branch("Bare", vec![Node::leaf("T2")]));
        assert_eq!(project.buildings.len(), 1);
        assert!(project.buildings[0].floors.is_empty());
    }
}
