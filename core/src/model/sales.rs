use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesChannel {
    Ebay,
    Amazon,
    Direct,
}

impl SalesChannel {
    pub const ALL: [SalesChannel; 3] = [
        SalesChannel::Ebay,
        SalesChannel::Amazon,
        SalesChannel::Direct,
    ];
}

impl fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SalesChannel::Ebay => "eBay",
            SalesChannel::Amazon => "Amazon",
            SalesChannel::Direct => "Direct",
        };
        f.write_str(label)
    }
}

impl FromStr for SalesChannel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ebay" => Ok(SalesChannel::Ebay),
            "amazon" => Ok(SalesChannel::Amazon),
            "direct" => Ok(SalesChannel::Direct),
            other => Err(PlannerError::invalid(format!("unknown sales channel '{}'", other))),
        }
    }
}

/// Dispatch pipeline stages, in the order orders move through them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchStage {
    ToProcess,
    InProgress,
    Completed,
}

impl DispatchStage {
    pub const ALL: [DispatchStage; 3] = [
        DispatchStage::ToProcess,
        DispatchStage::InProgress,
        DispatchStage::Completed,
    ];

    pub fn next(&self) -> Option<DispatchStage> {
        match self {
            DispatchStage::ToProcess => Some(DispatchStage::InProgress),
            DispatchStage::InProgress => Some(DispatchStage::Completed),
            DispatchStage::Completed => None,
        }
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DispatchStage::ToProcess => "To Process",
            DispatchStage::InProgress => "In Progress",
            DispatchStage::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl FromStr for DispatchStage {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "toprocess" | "todo" => Ok(DispatchStage::ToProcess),
            "inprogress" | "wip" => Ok(DispatchStage::InProgress),
            "completed" | "done" => Ok(DispatchStage::Completed),
            other => Err(PlannerError::invalid(format!("unknown dispatch stage '{}'", other))),
        }
    }
}
