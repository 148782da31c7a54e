//! Cone and objective-sense vocabulary
//!
//! Both enums map one-to-one onto the tokens used in the text format.
//! `token()` is the only place where those spellings live; `from_token`
//! searches it, so the two directions cannot disagree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownToken;

/// Domain of a contiguous block of scalar variables or constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cone {
    /// Unrestricted (`F`)
    #[serde(rename = "F")]
    Free,
    /// Nonnegative orthant (`L+`)
    #[serde(rename = "L+")]
    NonNegative,
    /// Nonpositive orthant (`L-`)
    #[serde(rename = "L-")]
    NonPositive,
    /// Fixed at zero (`L=`)
    #[serde(rename = "L=")]
    Zero,
    /// Second-order cone (`Q`)
    #[serde(rename = "Q")]
    Quadratic,
    /// Rotated second-order cone (`QR`)
    #[serde(rename = "QR")]
    RotatedQuadratic,
    /// Primal exponential cone (`EXP`)
    #[serde(rename = "EXP")]
    Exponential,
    /// Dual exponential cone (`EXP*`)
    #[serde(rename = "EXP*")]
    DualExponential,
}

impl Cone {
    /// All cone kinds in token order
    pub const ALL: [Cone; 8] = [
        Cone::Free,
        Cone::NonNegative,
        Cone::NonPositive,
        Cone::Zero,
        Cone::Quadratic,
        Cone::RotatedQuadratic,
        Cone::Exponential,
        Cone::DualExponential,
    ];

    /// Look up a cone by its token. Tokens are case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cone| cone.token() == token)
    }

    /// The token this cone is written as
    pub fn token(self) -> &'static str {
        match self {
            Cone::Free => "F",
            Cone::NonNegative => "L+",
            Cone::NonPositive => "L-",
            Cone::Zero => "L=",
            Cone::Quadratic => "Q",
            Cone::RotatedQuadratic => "QR",
            Cone::Exponential => "EXP",
            Cone::DualExponential => "EXP*",
        }
    }
}

impl FromStr for Cone {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cone::from_token(s).ok_or_else(|| UnknownToken::cone(s))
    }
}

impl fmt::Display for Cone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectiveSense {
    /// `MIN`
    #[default]
    #[serde(rename = "MIN")]
    Minimize,
    /// `MAX`
    #[serde(rename = "MAX")]
    Maximize,
}

impl ObjectiveSense {
    pub const ALL: [ObjectiveSense; 2] = [ObjectiveSense::Minimize, ObjectiveSense::Maximize];

    /// Look up a sense by its token (`MIN` or `MAX`)
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sense| sense.token() == token)
    }

    pub fn token(self) -> &'static str {
        match self {
            ObjectiveSense::Minimize => "MIN",
            ObjectiveSense::Maximize => "MAX",
        }
    }
}

impl FromStr for ObjectiveSense {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectiveSense::from_token(s).ok_or_else(|| UnknownToken::sense(s))
    }
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_tokens_are_inverse() {
        for cone in Cone::ALL {
            assert_eq!(Cone::from_token(cone.token()), Some(cone));
        }
    }

    #[test]
    fn test_cone_tokens_are_distinct() {
        let mut tokens: Vec<&str> = Cone::ALL.iter().map(|c| c.token()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), Cone::ALL.len());
    }

    #[test]
    fn test_serde_names_match_tokens() {
        for cone in Cone::ALL {
            let json = serde_json::to_string(&cone).unwrap();
            assert_eq!(json, format!("\"{}\"", cone.token()));
        }
        for sense in ObjectiveSense::ALL {
            let json = serde_json::to_string(&sense).unwrap();
            assert_eq!(json, format!("\"{}\"", sense.token()));
            assert_eq!(ObjectiveSense::from_token(sense.token()), Some(sense));
        }
    }

    #[test]
    fn test_cone_tokens_case_sensitive() {
        assert_eq!(Cone::from_token("q"), None);
        assert_eq!(Cone::from_token("exp"), None);
        assert_eq!(Cone::from_token("L"), None);
    }

    #[test]
    fn test_cone_from_str_error() {
        let err = "L*".parse::<Cone>().unwrap_err();
        assert_eq!(err.token, "L*");
        assert!(err.to_string().contains("cone"));
    }

    #[test]
    fn test_sense_tokens() {
        assert_eq!("MIN".parse::<ObjectiveSense>().unwrap(), ObjectiveSense::Minimize);
        assert_eq!("MAX".parse::<ObjectiveSense>().unwrap(), ObjectiveSense::Maximize);
        assert!("min".parse::<ObjectiveSense>().is_err());
        assert_eq!(ObjectiveSense::Maximize.to_string(), "MAX");
    }

    #[test]
    fn test_cone_serializes_as_token() {
        let json = serde_json::to_string(&Cone::NonNegative).unwrap();
        assert_eq!(json, "\"L+\"");
        let cone: Cone = serde_json::from_str("\"EXP*\"").unwrap();
        assert_eq!(cone, Cone::DualExponential);
    }
}
