// src/persona/mod.rs
// Persona templates selectable through the chat request's `mode` field.
// Unknown or missing modes fall back to the baseline persona.

pub mod default;
pub mod filosofi;
pub mod kankkarankka;
pub mod sitsikapteeni;

pub use default::DEFAULT_PERSONA_PROMPT;
pub use filosofi::FILOSOFI_PERSONA_PROMPT;
pub use kankkarankka::KANKKARANKKA_PERSONA_PROMPT;
pub use sitsikapteeni::SITSIKAPTEENI_PERSONA_PROMPT;

/// Tone/style overlays for PPO-AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persona {
    #[default]
    Default,      // Warm, funny, northern
    Kankkarankka, // Grumpy uncle
    Sitsikapteeni,
    Filosofi,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Default,
        Persona::Kankkarankka,
        Persona::Sitsikapteeni,
        Persona::Filosofi,
    ];

    /// Resolve a request mode. Never fails: anything unrecognized is `Default`.
    pub fn from_mode(mode: Option<&str>) -> Self {
        mode.and_then(|m| m.parse().ok()).unwrap_or_default()
    }

    /// Mode identifier the widget sends for this persona
    pub fn mode(&self) -> &'static str {
        match self {
            Persona::Default => "default",
            Persona::Kankkarankka => "kankkarankka",
            Persona::Sitsikapteeni => "sitsikapteeni",
            Persona::Filosofi => "filosofi",
        }
    }

    /// Instruction text injected ahead of the user's message.
    pub fn prompt(&self) -> &'static str {
        match self {
            Persona::Default => DEFAULT_PERSONA_PROMPT,
            Persona::Kankkarankka => KANKKARANKKA_PERSONA_PROMPT,
            Persona::Sitsikapteeni => SITSIKAPTEENI_PERSONA_PROMPT,
            Persona::Filosofi => FILOSOFI_PERSONA_PROMPT,
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mode())
    }
}

impl std::str::FromStr for Persona {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Persona::ALL
            .into_iter()
            .find(|p| p.mode() == wanted)
            .ok_or(())
    }
}
