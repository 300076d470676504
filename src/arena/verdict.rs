use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// An accepted deviation with the verified payoff that beat the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub params: Params,
    pub payoff: Utility,
}

/// How a testing step ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// A strictly improving deviation was accepted.
    Deviated(Deviation),
    /// The whole trial budget failed to improve on the baseline.
    Confirmed,
}

impl Verdict {
    pub fn deviation(&self) -> Option<&Deviation> {
        match self {
            Self::Deviated(d) => Some(d),
            Self::Confirmed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let verdict = Verdict::Deviated(Deviation {
            params: Params::try_from(vec![0.1, 0.2, 0.3]).unwrap(),
            payoff: 1.25,
        });
        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(json, r#"{"verdict":"deviated","params":[0.1,0.2,0.3],"payoff":1.25}"#);
        assert_eq!(serde_json::from_str::<Verdict>(&json).unwrap(), verdict);
        assert_eq!(
            serde_json::from_str::<Verdict>(r#"{"verdict":"confirmed"}"#).unwrap(),
            Verdict::Confirmed
        );
    }
}
