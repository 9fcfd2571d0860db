//! URN builders and a minimal parser for `urn:li:<entityType>:<id>`.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ENV: &str = "PROD";

const URN_PREFIX: &str = "urn:li:";

pub fn make_data_platform_urn(platform: &str) -> String {
    if platform.starts_with("urn:li:dataPlatform:") {
        return platform.to_string();
    }
    format!("urn:li:dataPlatform:{platform}")
}

pub fn make_dataset_urn(platform: &str, name: &str, env: &str) -> String {
    format!(
        "urn:li:dataset:({},{name},{env})",
        make_data_platform_urn(platform)
    )
}

pub fn make_user_urn(username: &str) -> String {
    format!("urn:li:corpuser:{username}")
}

pub fn make_group_urn(groupname: &str) -> String {
    format!("urn:li:corpGroup:{groupname}")
}

pub fn make_tag_urn(tag: &str) -> String {
    format!("urn:li:tag:{tag}")
}

pub fn make_term_urn(term: &str) -> String {
    format!("urn:li:glossaryTerm:{term}")
}

pub fn make_chart_urn(platform: &str, name: &str) -> String {
    format!("urn:li:chart:({platform},{name})")
}

pub fn make_dashboard_urn(platform: &str, name: &str) -> String {
    format!("urn:li:dashboard:({platform},{name})")
}

/// A parsed URN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn {
    entity_type: String,
    id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid urn '{urn}': {reason}")]
pub struct UrnParseError {
    pub urn: String,
    pub reason: &'static str,
}

impl Urn {
    pub fn parse(s: &str) -> Result<Self, UrnParseError> {
        let err = |reason| UrnParseError {
            urn: s.to_string(),
            reason,
        };
        let rest = s
            .strip_prefix(URN_PREFIX)
            .ok_or_else(|| err("missing 'urn:li:' prefix"))?;
        let (entity_type, id) = rest
            .split_once(':')
            .ok_or_else(|| err("missing entity id"))?;
        if entity_type.is_empty() {
            return Err(err("empty entity type"));
        }
        if id.is_empty() {
            return Err(err("empty entity id"));
        }
        Ok(Self {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Components of a tuple id such as `(urn:li:dataPlatform:hive,db.t,PROD)`.
    ///
    /// Commas nested inside parentheses do not split.
    pub fn tuple_parts(&self) -> Option<Vec<&str>> {
        let inner = self.id.strip_prefix('(')?.strip_suffix(')')?;
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, c) in inner.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        parts.push(&inner[start..]);
        Some(parts)
    }
}

impl FromStr for Urn {
    type Err = UrnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{URN_PREFIX}{}:{}", self.entity_type, self.id)
    }
}
