//! Participant resolution shared by the create use cases.
//!
//! Turns command-line [`MemberSpec`]s into [`Agent`]s: validates backends and
//! personas, fills in default models and rotation personas, and gives every
//! participant a unique display name.

use crate::config::ModelCatalog;
use crate::ports::generation_gateway::GenerationGateway;
use crate::ports::templates::TemplateCatalog;
use colloquy_domain::{Agent, MemberSpec, disambiguate_names};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Persona used when neither the spec nor the rotation provides one
pub const DEFAULT_PERSONA: &str = "neutral";

/// Configuration errors detected while resolving participants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),
}

pub(crate) struct ParticipantResolver<'a, G: ?Sized, T: ?Sized> {
    pub gateway: &'a G,
    pub templates: &'a T,
    pub models: &'a ModelCatalog,
}

impl<G, T> ParticipantResolver<'_, G, T>
where
    G: GenerationGateway + ?Sized,
    T: TemplateCatalog + ?Sized,
{
    /// Check that every backend in `specs` is known and reachable.
    ///
    /// Each distinct backend is probed once.
    pub async fn check_backends<'s>(
        &self,
        specs: impl IntoIterator<Item = &'s MemberSpec>,
    ) -> Result<(), ParticipantError> {
        let mut checked = HashSet::new();
        for spec in specs {
            if !checked.insert(spec.backend.as_str()) {
                continue;
            }
            if !self.gateway.knows_backend(&spec.backend) {
                return Err(ParticipantError::UnknownBackend(spec.backend.clone()));
            }
            if !self.gateway.is_available(&spec.backend).await {
                return Err(ParticipantError::BackendUnavailable(spec.backend.clone()));
            }
        }
        Ok(())
    }

    /// Check that every explicitly requested persona exists.
    pub fn check_personas<'s>(
        &self,
        specs: impl IntoIterator<Item = &'s MemberSpec>,
    ) -> Result<(), ParticipantError> {
        for spec in specs {
            if let Some(persona) = &spec.persona
                && self.templates.persona(persona).is_none()
            {
                return Err(ParticipantError::UnknownPersona(persona.clone()));
            }
        }
        Ok(())
    }

    /// Resolve participants in order.
    ///
    /// Specs without a persona take the next persona from the catalog
    /// rotation; specs without a model take the backend's default model.
    pub fn resolve(&self, specs: &[MemberSpec]) -> Vec<Agent> {
        let rotation = self.templates.persona_rotation();
        let mut next_rotation = 0usize;

        let names: Vec<String> = specs.iter().map(base_name).collect();
        let names = disambiguate_names(&names);

        specs
            .iter()
            .zip(names)
            .map(|(spec, name)| {
                let persona = match &spec.persona {
                    Some(persona) => persona.clone(),
                    None => {
                        let persona = rotation
                            .get(next_rotation % rotation.len().max(1))
                            .cloned()
                            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());
                        next_rotation += 1;
                        persona
                    }
                };
                let model = spec
                    .model
                    .clone()
                    .or_else(|| self.models.default_model(&spec.backend).map(str::to_string));
                debug!(
                    "Resolved participant {} -> backend={} model={:?} persona={}",
                    name, spec.backend, model, persona
                );
                Agent::new(name, spec.backend.clone(), model, persona)
            })
            .collect()
    }

    /// The chairman: the explicit spec if given, otherwise the first member's
    /// backend upgraded to its best configured model.
    pub fn resolve_chairman(&self, explicit: Option<&MemberSpec>, first_member: &MemberSpec) -> Agent {
        let (backend, model) = match explicit {
            Some(spec) => (
                spec.backend.clone(),
                spec.model
                    .clone()
                    .or_else(|| self.models.default_model(&spec.backend).map(str::to_string)),
            ),
            None => (
                first_member.backend.clone(),
                self.models
                    .best_model(&first_member.backend)
                    .map(str::to_string),
            ),
        };
        let persona = explicit
            .and_then(|s| s.persona.clone())
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());
        let name = match &model {
            Some(model) => format!("{}:{} (chairman)", backend, model),
            None => format!("{} (chairman)", backend),
        };
        Agent::new(name, backend, model, persona)
    }
}

/// Display name before disambiguation: `backend` or `backend:model`
fn base_name(spec: &MemberSpec) -> String {
    match &spec.model {
        Some(model) => format!("{}:{}", spec.backend, model),
        None => spec.backend.clone(),
    }
}
