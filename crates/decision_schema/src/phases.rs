//! Phase-based process definitions.
//!
//! A process is an ordered list of phases. Position is significant: the first
//! phase is the initial phase, the last is the final phase, everything in
//! between is intermediate. Transitions between phases are driven externally;
//! this module only answers what each phase permits.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Submit/edit permissions for one activity within a phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePermissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

impl PhasePermissions {
    pub fn new(submit: bool, edit: bool) -> Self {
        Self {
            submit: Some(submit),
            edit: Some(edit),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<PhasePermissions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting: Option<PhasePermissions>,
}

/// One stage of a decision process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: PhaseRules,
    /// Filter/reduce steps applied when leaving this phase. Carried, not executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_pipeline: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl PhaseDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rules: PhaseRules::default(),
            selection_pipeline: None,
            settings: None,
        }
    }

    pub fn with_proposals(mut self, permissions: PhasePermissions) -> Self {
        self.rules.proposals = Some(permissions);
        self
    }

    pub fn with_voting(mut self, permissions: PhasePermissions) -> Self {
        self.rules.voting = Some(permissions);
        self
    }

    pub fn with_selection_pipeline(mut self, pipeline: Value) -> Self {
        self.selection_pipeline = Some(pipeline);
        self
    }
}

/// Where a phase sits in its process, inferred from list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhasePosition {
    Initial,
    Intermediate,
    Final,
}

/// A phase-based decision process definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub phases: Vec<PhaseDefinition>,
}

impl ProcessDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phases: Vec<PhaseDefinition>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            phases,
        }
    }

    /// Phases must be non-empty with unique ids.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.phases.is_empty() {
            return Err(SchemaError::EmptyPhases);
        }
        let mut seen = HashSet::new();
        for phase in &self.phases {
            if !seen.insert(phase.id.as_str()) {
                return Err(SchemaError::DuplicatePhaseId(phase.id.clone()));
            }
        }
        Ok(())
    }

    pub fn phase(&self, phase_id: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    pub fn initial_phase(&self) -> Option<&PhaseDefinition> {
        self.phases.first()
    }

    pub fn final_phase(&self) -> Option<&PhaseDefinition> {
        self.phases.last()
    }

    /// A single-phase process reports `Initial`; use [`Self::is_final`] to
    /// check the other end.
    pub fn position_of(&self, phase_id: &str) -> Result<PhasePosition, SchemaError> {
        let index = self.index_of(phase_id)?;
        Ok(if index == 0 {
            PhasePosition::Initial
        } else if index + 1 == self.phases.len() {
            PhasePosition::Final
        } else {
            PhasePosition::Intermediate
        })
    }

    pub fn is_final(&self, phase_id: &str) -> Result<bool, SchemaError> {
        Ok(self.index_of(phase_id)? + 1 == self.phases.len())
    }

    pub fn can_submit_proposals(&self, phase_id: &str) -> Result<bool, SchemaError> {
        self.permission(phase_id, |r| r.proposals.and_then(|p| p.submit))
    }

    pub fn can_edit_proposals(&self, phase_id: &str) -> Result<bool, SchemaError> {
        self.permission(phase_id, |r| r.proposals.and_then(|p| p.edit))
    }

    pub fn can_vote(&self, phase_id: &str) -> Result<bool, SchemaError> {
        self.permission(phase_id, |r| r.voting.and_then(|p| p.submit))
    }

    pub fn can_edit_votes(&self, phase_id: &str) -> Result<bool, SchemaError> {
        self.permission(phase_id, |r| r.voting.and_then(|p| p.edit))
    }

    fn index_of(&self, phase_id: &str) -> Result<usize, SchemaError> {
        self.phases
            .iter()
            .position(|p| p.id == phase_id)
            .ok_or_else(|| SchemaError::UnknownPhase(phase_id.to_string()))
    }

    // Absent rules deny.
    fn permission(
        &self,
        phase_id: &str,
        rule: impl Fn(&PhaseRules) -> Option<bool>,
    ) -> Result<bool, SchemaError> {
        let phase = self
            .phase(phase_id)
            .ok_or_else(|| SchemaError::UnknownPhase(phase_id.to_string()))?;
        Ok(rule(&phase.rules).unwrap_or(false))
    }
}
