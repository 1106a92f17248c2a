//! Service offering domain model.
//!
//! # Invariants
//! - `total_cost()` is always `cost + labor_cost`; it is never stored.

use super::RecordId;
use crate::repo::record_store::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tile service the contractor sells (e.g. "Ceramic Install").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: RecordId,
    pub name: String,
    /// Category label. Serialized as `type` to match the stored payload.
    #[serde(rename = "type")]
    pub kind: String,
    /// Flat service cost.
    pub cost: f64,
    pub labor_cost: f64,
    /// Free-text estimate such as "2 days".
    pub time_required: String,
    pub description: String,
    pub material: String,
}

impl ServiceOffering {
    /// Creates an offering without an id; the store assigns one on add.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        cost: f64,
        labor_cost: f64,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            kind: kind.into(),
            cost,
            labor_cost,
            time_required: String::new(),
            description: String::new(),
            material: String::new(),
        }
    }

    /// Sum of flat cost and labor cost, computed on every read.
    pub fn total_cost(&self) -> f64 {
        self.cost + self.labor_cost
    }
}

impl Record for ServiceOffering {
    const SLOT: &'static str = "services";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn amounts(&self) -> Vec<(&'static str, f64)> {
        vec![("cost", self.cost), ("labor_cost", self.labor_cost)]
    }
}
