use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Deviations accepted in one round, one per step, in step order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(Vec<Params>);

impl Sequence {
    pub fn push(&mut self, params: Params) {
        self.0.push(params);
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Params> {
        self.0.iter()
    }
}

impl From<Vec<Params>> for Sequence {
    fn from(params: Vec<Params>) -> Self {
        Self(params)
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items = self.0.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ");
        write!(f, "[{}]", items)
    }
}
