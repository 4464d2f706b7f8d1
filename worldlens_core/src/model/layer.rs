use serde::{Deserialize, Serialize};

/// Abstraction level at which a claim is expressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Concrete events and explicit claims.
    Surface,
    /// Assumptions the author takes for granted.
    Implicit,
    /// Foundational beliefs.
    Deep,
}

impl Layer {
    pub const ALL: [Self; 3] = [Self::Surface, Self::Implicit, Self::Deep];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::Implicit => "implicit",
            Self::Deep => "deep",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "surface" => Ok(Self::Surface),
            "implicit" => Ok(Self::Implicit),
            "deep" => Ok(Self::Deep),
            _ => Err(anyhow::anyhow!("unknown pattern layer: {s}")),
        }
    }
}

/// Lifecycle state of a pattern row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternStatus {
    Active,
    Fading,
    Dead,
}

impl PatternStatus {
    /// Statuses that take part in matching and decay.
    pub const LIVE: [Self; 2] = [Self::Active, Self::Fading];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Fading => "fading",
            Self::Dead => "dead",
        }
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Fading)
    }
}

impl std::fmt::Display for PatternStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PatternStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "fading" => Ok(Self::Fading),
            "dead" => Ok(Self::Dead),
            _ => Err(anyhow::anyhow!("unknown pattern status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_round_trips_through_str() {
        for layer in Layer::ALL {
            assert_eq!(layer.as_str().parse::<Layer>().ok(), Some(layer));
        }
        assert!("core".parse::<Layer>().is_err());
    }

    #[test]
    fn only_active_and_fading_are_live() {
        assert!(PatternStatus::Active.is_live());
        assert!(PatternStatus::Fading.is_live());
        assert!(!PatternStatus::Dead.is_live());
    }
}
