//! Entitlement tier definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Entitlement tier.
///
/// Exactly one tier applies to a principal at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Metered tier - usage counted against the free quota.
    Free,

    /// Paid, time-limited tier. Always carries an expiry.
    Periodic,

    /// Paid, unlimited-duration tier. Never expires.
    Perpetual,
}

impl Tier {
    /// Returns true if this tier is a paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Tier::Free)
    }

    /// Returns true if usage on this tier is counted against a quota.
    pub fn is_metered(&self) -> bool {
        matches!(self, Tier::Free)
    }

    /// Returns the storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Periodic => "periodic",
            Tier::Perpetual => "perpetual",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Tier::Free),
            "periodic" => Ok(Tier::Periodic),
            "perpetual" => Ok(Tier::Perpetual),
            other => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_free_is_metered() {
        assert!(Tier::Free.is_metered());
        assert!(!Tier::Periodic.is_metered());
        assert!(!Tier::Perpetual.is_metered());
    }

    #[test]
    fn paid_tiers_are_paid() {
        assert!(!Tier::Free.is_paid());
        assert!(Tier::Periodic.is_paid());
        assert!(Tier::Perpetual.is_paid());
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Periodic).unwrap();
        assert_eq!(json, "\"periodic\"");
    }

    #[test]
    fn tier_parses_from_storage_value() {
        for tier in [Tier::Free, Tier::Periodic, Tier::Perpetual] {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("monthly".parse::<Tier>().is_err());
    }
}
