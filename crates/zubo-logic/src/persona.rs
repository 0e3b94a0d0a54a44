//! Personas: the "who you are" result of the personality questions.
//!
//! Personality questions bind each option to a persona and a weight. The
//! weights accumulate in a [`PersonaTally`]; at the end of a run
//! [`resolve_persona`] picks the persona with the highest total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::persona_labels;

/// A persona a player can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Persona {
    Achiever,
    Analyst,
    Creative,
    Empathetic,
    Explorer,
    Leader,
}

/// Persona shown when no personality question has been answered.
pub const DEFAULT_PERSONA: Persona = Persona::Analyst;

/// Accumulated weight per persona.
pub type PersonaTally = BTreeMap<Persona, u32>;

/// Display copy for a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub traits: [&'static str; 4],
}

impl Persona {
    pub const ALL: [Persona; 6] = [
        Persona::Achiever,
        Persona::Analyst,
        Persona::Creative,
        Persona::Empathetic,
        Persona::Explorer,
        Persona::Leader,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Persona::Achiever => persona_labels::ACHIEVER,
            Persona::Analyst => persona_labels::ANALYST,
            Persona::Creative => persona_labels::CREATIVE,
            Persona::Empathetic => persona_labels::EMPATHETIC,
            Persona::Explorer => persona_labels::EXPLORER,
            Persona::Leader => persona_labels::LEADER,
        }
    }

    /// Look a persona up by its label (case-sensitive).
    pub fn from_label(label: &str) -> Option<Persona> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    pub fn info(self) -> PersonaInfo {
        match self {
            Persona::Analyst => PersonaInfo {
                title: "The Strategic Analyst",
                description: "You approach life with careful analysis and logical thinking. \
                    You excel at breaking down complex problems and making data-driven decisions.",
                traits: ["Logical", "Methodical", "Detail-oriented", "Strategic"],
            },
            Persona::Creative => PersonaInfo {
                title: "The Innovative Creator",
                description: "You see the world through a lens of possibility and imagination. \
                    Your strength lies in generating original ideas and artistic expression.",
                traits: ["Imaginative", "Original", "Artistic", "Visionary"],
            },
            Persona::Leader => PersonaInfo {
                title: "The Natural Leader",
                description: "You inspire others and naturally take charge in group situations. \
                    People look to you for direction and motivation.",
                traits: ["Charismatic", "Decisive", "Motivating", "Confident"],
            },
            Persona::Empathetic => PersonaInfo {
                title: "The Compassionate Connector",
                description: "You understand and connect with others on a deep level. \
                    Your emotional intelligence helps you build strong relationships.",
                traits: ["Understanding", "Supportive", "Intuitive", "Caring"],
            },
            Persona::Explorer => PersonaInfo {
                title: "The Adventurous Explorer",
                description: "You thrive on new experiences and discoveries. \
                    Your curiosity drives you to constantly seek out adventure and learning.",
                traits: ["Curious", "Adventurous", "Open-minded", "Energetic"],
            },
            Persona::Achiever => PersonaInfo {
                title: "The Driven Achiever",
                description: "You are goal-oriented and persistent in pursuing success. \
                    Your determination helps you overcome obstacles and reach new heights.",
                traits: ["Ambitious", "Persistent", "Goal-focused", "Disciplined"],
            },
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Add `weight` to `persona`'s running total.
pub fn add_weight(tally: &mut PersonaTally, persona: Persona, weight: u32) {
    let entry = tally.entry(persona).or_insert(0);
    *entry = entry.saturating_add(weight);
}

/// Pick the persona with the largest accumulated weight.
///
/// Ties go to the lexicographically smallest label. An empty tally resolves
/// to [`DEFAULT_PERSONA`].
pub fn resolve_persona(tally: &PersonaTally) -> Persona {
    tally
        .iter()
        .max_by(|(pa, va), (pb, vb)| va.cmp(vb).then_with(|| pb.label().cmp(pa.label())))
        .map(|(p, _)| *p)
        .unwrap_or(DEFAULT_PERSONA)
}
