use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical release cohort an instance belongs to
///
/// Assigned once at startup and immutable for the lifetime of the instance.
/// Control commands may target a single cohort or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeploymentVersion {
    /// Production rollout
    Prod,
    /// Pre-production rollout receiving the same traffic shape
    Staging,
}

impl fmt::Display for DeploymentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentVersion::Prod => write!(f, "PROD"),
            DeploymentVersion::Staging => write!(f, "STAGING"),
        }
    }
}

impl FromStr for DeploymentVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PROD" => Ok(DeploymentVersion::Prod),
            "STAGING" => Ok(DeploymentVersion::Staging),
            other => Err(format!("unknown deployment version '{}'", other)),
        }
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn serialize_uppercase() {
        assert_eq!(
            serde_json::to_string(&DeploymentVersion::Prod).unwrap(),
            "\"PROD\""
        );
        assert_eq!(
            serde_json::from_str::<DeploymentVersion>("\"STAGING\"").unwrap(),
            DeploymentVersion::Staging
        );
    }

    #[test]
    fn parse_case_insensitively() {
        assert_eq!("prod".parse::<DeploymentVersion>(), Ok(DeploymentVersion::Prod));
        assert!("canary".parse::<DeploymentVersion>().is_err());
    }
}
