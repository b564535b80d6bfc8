//! Precision modes and the mandate each one selects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How strictly the reference hairstyle must be reproduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionMode {
    /// Reference is inspiration; shape and volume may be adapted.
    Auto,
    /// Close replication of structure, shape and texture.
    #[default]
    Moderate,
    /// Near-exact replication; may override hair color preservation.
    Precise,
}

const AUTO_MANDATE: &str = "**PRECISION MANDATE: CREATIVE ADAPTATION.** Use the STYLE REFERENCE as a strong inspiration. Your goal is to create a natural and flattering hairstyle that incorporates the key elements of the reference. You have creative freedom to adapt the length, volume, and flow to better suit the individual in the BASE image.";

const MODERATE_MANDATE: &str = "**PRECISION MANDATE: FAITHFUL REPLICATION.** You must closely replicate the overall structure, shape, and texture of the hairstyle in the STYLE REFERENCE. The final result must be immediately recognizable as the reference style, adapted realistically to the BASE image's head and lighting.";

const PRECISE_MANDATE: &str = "**PRECISION MANDATE: FORENSIC REPLICATION (OVERRIDE).** This rule has the highest priority and overrides rule #2 (ORIGINAL HAIR COLOR PRESERVATION) if there is a conflict. Your absolute top command is to perform a forensic-level, near pixel-perfect replication of the hairstyle's SHAPE and TEXTURE from the STYLE REFERENCE. To achieve this, you MUST prioritize replicating the lighting, highlights, and shadows of the reference hair, even if it requires subtle, necessary adjustments to the base hair color. The goal is an exact structural and textural duplicate; shape and texture accuracy are more important than perfect color matching in this mode. No creative interpretation is permitted.";

impl PrecisionMode {
    /// All modes, in selector order.
    pub const ALL: [Self; 3] = [Self::Auto, Self::Moderate, Self::Precise];

    /// Parse a user-supplied mode name.
    ///
    /// Matching is trimmed and case-insensitive. Anything other than `auto`,
    /// `moderate` or `precise`, including an empty string, yields
    /// [`PrecisionMode::Moderate`] with a warning.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "auto" => Self::Auto,
            "precise" => Self::Precise,
            "moderate" => Self::Moderate,
            _ => {
                tracing::warn!(mode = value, "unrecognized precision mode, using moderate");
                Self::Moderate
            }
        }
    }

    /// Lowercase name as accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Moderate => "moderate",
            Self::Precise => "precise",
        }
    }

    /// One-line description shown by `--list-modes`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Auto => "AI blends the style for a natural fit.",
            Self::Moderate => "Closely matches the reference style.",
            Self::Precise => "Attempts an exact replica of the style.",
        }
    }

    /// The mandate text interpolated as rule #3 of the instruction.
    #[must_use]
    pub fn mandate(self) -> &'static str {
        match self {
            Self::Auto => AUTO_MANDATE,
            Self::Moderate => MODERATE_MANDATE,
            Self::Precise => PRECISE_MANDATE,
        }
    }

    /// Whether this mode's mandate takes priority over hair color preservation.
    #[must_use]
    pub fn overrides_color_preservation(self) -> bool {
        matches!(self, Self::Precise)
    }
}

impl fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
