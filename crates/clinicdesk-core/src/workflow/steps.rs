//! Consultation entry steps and the context carried between them.

use serde::{Deserialize, Serialize};

use crate::models::ConsultationKey;

/// One step of the consultation entry sequence.
///
/// ```text
/// Soap ──auto──► Nurses ──link──► Diagnostic ──auto──► Prescription{id}
///                                     ▲                     │
///                                     └──────── link ───────┘
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConsultationStep {
    Soap,
    Nurses,
    Diagnostic,
    Prescription { diagnostic_id: i64 },
}

impl ConsultationStep {
    /// Step offered as the manual "continue" link from this one.
    ///
    /// `Diagnostic` has none: prescription entry needs the id produced by a
    /// successful diagnostic submission.
    pub fn next(self) -> Option<Self> {
        match self {
            ConsultationStep::Soap => Some(ConsultationStep::Nurses),
            ConsultationStep::Nurses => Some(ConsultationStep::Diagnostic),
            ConsultationStep::Diagnostic => None,
            ConsultationStep::Prescription { .. } => Some(ConsultationStep::Diagnostic),
        }
    }
}

/// Context of the prescription step: a consultation plus one of its diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionContext {
    pub consultation: ConsultationKey,
    pub diagnostic_id: i64,
}

impl PrescriptionContext {
    pub fn step(&self) -> ConsultationStep {
        ConsultationStep::Prescription {
            diagnostic_id: self.diagnostic_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_links() {
        assert_eq!(ConsultationStep::Soap.next(), Some(ConsultationStep::Nurses));
        assert_eq!(ConsultationStep::Nurses.next(), Some(ConsultationStep::Diagnostic));
        assert_eq!(ConsultationStep::Diagnostic.next(), None);
        assert_eq!(
            ConsultationStep::Prescription { diagnostic_id: 3 }.next(),
            Some(ConsultationStep::Diagnostic)
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ConsultationStep::Prescription { diagnostic_id: 7 }).unwrap();
        assert_eq!(json["step"], "prescription");
        assert_eq!(json["diagnostic_id"], 7);
    }
}
