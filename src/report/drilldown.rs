//! The drill-down state of the category breakdown.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Which level of the category breakdown is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "DrilldownQuery")]
pub enum Drilldown {
    /// Expenses grouped by category.
    #[default]
    Category,
    /// Expenses in `parent` grouped by sub-category.
    Subcategory {
        /// The category that was drilled into.
        parent: String,
    },
}

impl Drilldown {
    /// Drill into the category `label`.
    ///
    /// Does nothing if a category has already been selected.
    pub fn select(self, label: &str) -> Self {
        match self {
            Drilldown::Category => Drilldown::Subcategory {
                parent: label.to_owned(),
            },
            subcategory => subcategory,
        }
    }

    /// Go back up to the categories.
    pub fn back(self) -> Self {
        Drilldown::Category
    }
}

/// The level names used in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrilldownLevel {
    /// Show categories.
    #[default]
    Category,
    /// Show the sub-categories of the parent.
    Subcategory,
}

/// The drill-down state as it is sent over HTTP, e.g. `?level=subcategory&parent=Food`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrilldownQuery {
    /// Defaults to categories.
    #[serde(default)]
    pub level: DrilldownLevel,
    /// Required when `level` is sub-category.
    #[serde(default)]
    pub parent: Option<String>,
}

impl TryFrom<DrilldownQuery> for Drilldown {
    type Error = Error;

    fn try_from(query: DrilldownQuery) -> Result<Self, Self::Error> {
        match query.level {
            DrilldownLevel::Category => Ok(Drilldown::Category),
            DrilldownLevel::Subcategory => {
                let parent = query
                    .parent
                    .map(|parent| parent.trim().to_owned())
                    .filter(|parent| !parent.is_empty())
                    .ok_or(Error::MissingParentCategory)?;

                Ok(Drilldown::Subcategory { parent })
            }
        }
    }
}

impl From<Drilldown> for DrilldownQuery {
    fn from(drilldown: Drilldown) -> Self {
        match drilldown {
            Drilldown::Category => DrilldownQuery {
                level: DrilldownLevel::Category,
                parent: None,
            },
            Drilldown::Subcategory { parent } => DrilldownQuery {
                level: DrilldownLevel::Subcategory,
                parent: Some(parent),
            },
        }
    }
}

#[cfg(test)]
mod drilldown_tests {
    use serde_json::json;

    use crate::{
        Error,
        report::{Drilldown, DrilldownLevel, DrilldownQuery},
    };

    #[test]
    fn select_then_back_returns_to_categories() {
        let drilldown = Drilldown::default();
        assert_eq!(drilldown, Drilldown::Category);

        let drilldown = drilldown.select("Food");
        assert_eq!(
            drilldown,
            Drilldown::Subcategory {
                parent: "Food".to_owned()
            }
        );

        let drilldown = drilldown.back();
        assert_eq!(drilldown, Drilldown::Category);

        let drilldown = drilldown.back();
        assert_eq!(drilldown, Drilldown::Category);
    }

    #[test]
    fn select_at_subcategory_does_nothing() {
        let drilldown = Drilldown::Category.select("Food").select("Rent");

        assert_eq!(
            drilldown,
            Drilldown::Subcategory {
                parent: "Food".to_owned()
            }
        );
    }

    #[test]
    fn query_without_parent_fails() {
        let query = DrilldownQuery {
            level: DrilldownLevel::Subcategory,
            parent: None,
        };

        assert_eq!(Drilldown::try_from(query), Err(Error::MissingParentCategory));
    }

    #[test]
    fn query_with_blank_parent_fails() {
        let query = DrilldownQuery {
            level: DrilldownLevel::Subcategory,
            parent: Some("  ".to_owned()),
        };

        assert_eq!(Drilldown::try_from(query), Err(Error::MissingParentCategory));
    }

    #[test]
    fn category_query_ignores_parent() {
        let query = DrilldownQuery {
            level: DrilldownLevel::Category,
            parent: Some("Food".to_owned()),
        };

        assert_eq!(Drilldown::try_from(query), Ok(Drilldown::Category));
    }

    #[test]
    fn serializes_as_level_and_parent() {
        let drilldown = Drilldown::Subcategory {
            parent: "Food".to_owned(),
        };

        assert_eq!(
            serde_json::to_value(drilldown).unwrap(),
            json!({ "level": "subcategory", "parent": "Food" })
        );
        assert_eq!(
            serde_json::to_value(Drilldown::Category).unwrap(),
            json!({ "level": "category", "parent": null })
        );
    }
}
