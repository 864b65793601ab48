use crate::error::{Error, Result};
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Tree,
    Force,
}

impl LayoutKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "tree" => Ok(Self::Tree),
            "force" => Ok(Self::Force),
            other => Err(Error::UnknownLayout {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Force => "force",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user selected: a filter and a layout strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub filter: Filter,
    pub layout: LayoutKind,
}

impl ViewRequest {
    pub fn new(filter: Filter, layout: LayoutKind) -> Self {
        Self { filter, layout }
    }

    /// Parses the three control values (`filter type`, `filter value`, `layout`).
    pub fn parse(filter_type: &str, filter_value: &str, layout: &str) -> Result<Self> {
        Ok(Self {
            filter: Filter::parse(filter_type, filter_value)?,
            layout: LayoutKind::parse(layout)?,
        })
    }
}
