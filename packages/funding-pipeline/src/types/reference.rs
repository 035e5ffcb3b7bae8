//! Reference projects: the past work the judge compares listings against.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadResult;
use crate::export;

/// A past project used as a comparison anchor in the judge prompt.
///
/// Aliases accept the column names of the reference dataset export
/// (`Project Name`, `Description`, `Axes / Thematic Areas`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceProject {
    #[serde(alias = "Project Name")]
    pub name: String,

    #[serde(alias = "Description")]
    pub description: String,

    #[serde(alias = "Axes / Thematic Areas")]
    pub thematic_areas: String,
}

impl ReferenceProject {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        thematic_areas: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            thematic_areas: thematic_areas.into(),
        }
    }

    /// The built-in reference set.
    pub fn defaults() -> Vec<ReferenceProject> {
        vec![
            ReferenceProject::new(
                "FACTORIAT",
                "Support Deeptech & Hardware startups in prototyping and tech maturation with technical and financial help.",
                "Deeptech, Hardware, Incubation, Prototyping, Acceleration",
            ),
            ReferenceProject::new(
                "National Entrepreneurship Program",
                "Design and implementation of Lesotho's national entrepreneurship ecosystem.",
                "Capacity building, Strategy, Startup Ecosystem",
            ),
            ReferenceProject::new(
                "MDBAN – Business Angels Network",
                "Support early-stage Maghreb startups via diaspora angel investment.",
                "Startup Support, Investment, Diaspora Engagement",
            ),
        ]
    }

    /// Load a reference set from a JSON array file.
    pub fn load_json(path: &Path) -> LoadResult<Vec<ReferenceProject>> {
        export::load_json(path)
    }
}
