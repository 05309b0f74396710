//! Wire format for the relay endpoint.

use serde::{Deserialize, Serialize};

use crate::acquisition::JoinedSample;

/// JSON body posted to the relay endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub heart_rate: f64,
    pub steps: f64,
}

impl From<JoinedSample> for RelayPayload {
    fn from(sample: JoinedSample) -> Self {
        Self {
            heart_rate: sample.heart_rate,
            steps: sample.steps,
        }
    }
}

impl RelayPayload {
    /// Encode as the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
