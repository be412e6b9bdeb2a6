//! Subcategory (cohort) partitions of a category

use serde::{Deserialize, Serialize};

/// One of the five partitions of a category's entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subcategory {
    All,
    Freshmen,
    Sophomores,
    Juniors,
    Seniors,
}

impl Subcategory {
    pub const ALL: [Subcategory; 5] = [
        Subcategory::All,
        Subcategory::Freshmen,
        Subcategory::Sophomores,
        Subcategory::Juniors,
        Subcategory::Seniors,
    ];

    /// Class year an entry must have to belong to this subcategory.
    ///
    /// `current_year` is the class year of the incoming freshmen. `All` has no filter.
    pub fn class_year(&self, current_year: i32) -> Option<i32> {
        match self {
            Subcategory::All => None,
            Subcategory::Freshmen => Some(current_year),
            Subcategory::Sophomores => Some(current_year - 1),
            Subcategory::Juniors => Some(current_year - 2),
            Subcategory::Seniors => Some(current_year - 3),
        }
    }

    /// Whether an entry with `class_year` is part of this subcategory's pool
    pub fn contains(&self, class_year: i32, current_year: i32) -> bool {
        self.class_year(current_year)
            .map_or(true, |year| year == class_year)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subcategory::All => "All",
            Subcategory::Freshmen => "Freshmen",
            Subcategory::Sophomores => "Sophomores",
            Subcategory::Juniors => "Juniors",
            Subcategory::Seniors => "Seniors",
        }
    }
}

impl Default for Subcategory {
    fn default() -> Self {
        Subcategory::All
    }
}

impl std::fmt::Display for Subcategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Subcategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Subcategory::All),
            "freshmen" => Ok(Subcategory::Freshmen),
            "sophomores" => Ok(Subcategory::Sophomores),
            "juniors" => Ok(Subcategory::Juniors),
            "seniors" => Ok(Subcategory::Seniors),
            _ => Err(format!("Unknown subcategory: {}", s)),
        }
    }
}
