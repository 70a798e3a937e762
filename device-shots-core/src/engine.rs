use serde::{Deserialize, Serialize};

/// Image search engines a crawler can be pointed at.
///
/// This enum centralizes engine identity (short names, display names and
/// aliases) so settings files, CLI arguments and working-directory names all
/// agree on one spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Bing image search. Global index, good for English press photos.
    Bing,
    /// Baidu image search. Stronger for Asian-market listings and press kits.
    Baidu,
}

/// All engine variants in declaration order.
const ALL_ENGINES: &[Engine] = &[Engine::Bing, Engine::Baidu];

impl Engine {
    /// Canonical short name used for settings, CLI and directory names.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Bing => "bing",
            Self::Baidu => "baidu",
        }
    }

    /// Full display name for the engine.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bing => "Bing Images",
            Self::Baidu => "Baidu Images",
        }
    }

    /// All accepted names for this engine (case-insensitive matching).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Bing => &["bing", "bing images", "microsoft"],
            Self::Baidu => &["baidu", "baidu images", "百度"],
        }
    }

    /// All engine variants.
    pub fn all() -> &'static [Engine] {
        ALL_ENGINES
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Error returned when a string cannot be parsed into an `Engine`.
#[derive(Debug, Clone)]
pub struct EngineParseError(pub String);

impl std::fmt::Display for EngineParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown search engine: '{}'", self.0)
    }
}

impl std::error::Error for EngineParseError {}

impl std::str::FromStr for Engine {
    type Err = EngineParseError;

    /// Parse an engine from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        for &engine in Self::all() {
            if engine.short_name() == lower || engine.aliases().contains(&lower.as_str()) {
                return Ok(engine);
            }
        }
        Err(EngineParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
