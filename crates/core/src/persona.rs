//! Persona catalog — response-styling profiles.
//!
//! A persona steers vocabulary and analogy choice in responses. The set is
//! closed: a fixed enumeration, each bound to a one-sentence descriptor.
//! Exactly one is active per session; `General` is the neutral default and
//! injects no instruction text at all.

use serde::{Deserialize, Serialize};

/// A named response-styling profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Neutral — no style steering
    #[default]
    General,
    Electrician,
    Plumber,
    Carpenter,
    Mechanic,
    Chef,
}

impl Persona {
    /// The full fixed catalog, neutral member first.
    pub fn all() -> &'static [Persona] {
        &[
            Persona::General,
            Persona::Electrician,
            Persona::Plumber,
            Persona::Carpenter,
            Persona::Mechanic,
            Persona::Chef,
        ]
    }

    /// The identifier used for selection and display.
    pub fn id(&self) -> &'static str {
        match self {
            Persona::General => "general",
            Persona::Electrician => "electrician",
            Persona::Plumber => "plumber",
            Persona::Carpenter => "carpenter",
            Persona::Mechanic => "mechanic",
            Persona::Chef => "chef",
        }
    }

    /// The descriptor string used to steer response style.
    ///
    /// Empty for the neutral member — the assembler injects nothing for it.
    pub fn descriptor(&self) -> &'static str {
        match self {
            Persona::General => "",
            Persona::Electrician => {
                "an electrician who explains ideas through circuits, wiring, and electrical systems"
            }
            Persona::Plumber => {
                "a plumber who explains ideas through pipes, pressure, and water flow"
            }
            Persona::Carpenter => {
                "a carpenter who explains ideas through joinery, framing, and building materials"
            }
            Persona::Mechanic => {
                "a mechanic who explains ideas through engines, gears, and moving parts"
            }
            Persona::Chef => {
                "a chef who explains ideas through recipes, ingredients, and kitchen technique"
            }
        }
    }

    /// Whether this is the neutral member.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Persona::General)
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Persona::General),
            "electrician" => Ok(Persona::Electrician),
            "plumber" => Ok(Persona::Plumber),
            "carpenter" => Ok(Persona::Carpenter),
            "mechanic" => Ok(Persona::Mechanic),
            "chef" => Ok(Persona::Chef),
            other => Err(format!("Unknown persona: {other}")),
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral() {
        assert_eq!(Persona::default(), Persona::General);
        assert!(Persona::default().is_neutral());
        assert!(Persona::default().descriptor().is_empty());
    }

    #[test]
    fn every_named_persona_has_a_descriptor() {
        for persona in Persona::all() {
            if !persona.is_neutral() {
                assert!(
                    !persona.descriptor().is_empty(),
                    "{} has no descriptor",
                    persona.id()
                );
            }
        }
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("electrician".parse::<Persona>().unwrap(), Persona::Electrician);
        assert_eq!("  Chef ".parse::<Persona>().unwrap(), Persona::Chef);
        assert!("astronaut".parse::<Persona>().is_err());
    }

    #[test]
    fn catalog_is_closed_and_starts_neutral() {
        let all = Persona::all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Persona::General);
    }
}
