//! Persona registry - single source of truth for system prompts

use serde::{Deserialize, Serialize};

/// One persona's metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSpec {
    pub id: String,
    pub display_name: String,
    pub system_prompt: String,
}

/// Registry of available personas
pub struct PersonaRegistry {
    personas: Vec<PersonaSpec>,
}

impl PersonaRegistry {
    /// Create a new registry with the built-in personas
    pub fn new() -> Self {
        let yaml = include_str!("personas.yaml");
        let personas = serde_yaml::from_str(yaml).expect("Failed to parse built-in personas");
        Self { personas }
    }

    /// Get all persona specs
    pub fn all(&self) -> &[PersonaSpec] {
        &self.personas
    }

    /// Find a persona by id
    pub fn find(&self, id: &str) -> Option<&PersonaSpec> {
        self.personas.iter().find(|spec| spec.id == id)
    }

    /// The system prompt for a persona id, if known
    pub fn system_prompt(&self, id: &str) -> Option<&str> {
        self.find(id).map(|spec| spec.system_prompt.as_str())
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_personas_parse() {
        let registry = PersonaRegistry::new();
        assert!(registry.all().len() >= 2);
    }

    #[test]
    fn test_find_default_persona() {
        let registry = PersonaRegistry::new();
        let spec = registry.find("coach").unwrap();
        assert_eq!(spec.display_name, "Sustainability Coach");
        assert!(spec.system_prompt.contains("sustainability coach"));
    }

    #[test]
    fn test_unknown_persona_is_none() {
        let registry = PersonaRegistry::new();
        assert!(registry.find("astronaut").is_none());
        assert!(registry.system_prompt("astronaut").is_none());
    }
}
