// 📍 Location - the four store cities

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "New York")]
    NewYork,
    #[serde(rename = "Los Angeles")]
    LosAngeles,
    Chicago,
    Houston,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::NewYork,
        Location::LosAngeles,
        Location::Chicago,
        Location::Houston,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::NewYork => "New York",
            Location::LosAngeles => "Los Angeles",
            Location::Chicago => "Chicago",
            Location::Houston => "Houston",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s.trim())
            .ok_or_else(|| PipelineError::InvalidValue {
                column: "location".to_string(),
                value: s.to_string(),
            })
    }
}
