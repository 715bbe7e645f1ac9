//! Decoration catalogue and type-specific prompt templates.
//!
//! Every generation request names one or more decoration types. Each type
//! maps to its own prompt template so that, for example, a cake topper is
//! framed as a small printable cut-out while a backdrop is framed as a wide
//! wall piece.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// A decoration category the generator knows how to prompt for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorationType {
    #[serde(rename = "Cake topper")]
    CakeTopper,
    #[serde(rename = "Banner")]
    Banner,
    #[serde(rename = "Balloon arrangement")]
    BalloonArrangement,
    #[serde(rename = "Table centerpiece")]
    TableCenterpiece,
    #[serde(rename = "Backdrop")]
    Backdrop,
    #[serde(rename = "Invitation")]
    Invitation,
    #[serde(rename = "Cupcake toppers")]
    CupcakeToppers,
    #[serde(rename = "Party favors")]
    PartyFavors,
}

impl DecorationType {
    /// Every supported decoration type, in display order.
    pub const ALL: [DecorationType; 8] = [
        DecorationType::CakeTopper,
        DecorationType::Banner,
        DecorationType::BalloonArrangement,
        DecorationType::TableCenterpiece,
        DecorationType::Backdrop,
        DecorationType::Invitation,
        DecorationType::CupcakeToppers,
        DecorationType::PartyFavors,
    ];

    /// Human-readable label, as sent and received over the API.
    pub fn label(self) -> &'static str {
        match self {
            DecorationType::CakeTopper => "Cake topper",
            DecorationType::Banner => "Banner",
            DecorationType::BalloonArrangement => "Balloon arrangement",
            DecorationType::TableCenterpiece => "Table centerpiece",
            DecorationType::Backdrop => "Backdrop",
            DecorationType::Invitation => "Invitation",
            DecorationType::CupcakeToppers => "Cupcake toppers",
            DecorationType::PartyFavors => "Party favors",
        }
    }

    /// Resolve a label against the whitelist.
    ///
    /// Matching ignores surrounding whitespace and ASCII case.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown decoration type '{wanted}'. Must be one of: {}",
                    Self::ALL.map(DecorationType::label).join(", ")
                ))
            })
    }

    /// The framing sentence that opens this type's prompt.
    fn framing(self) -> &'static str {
        match self {
            DecorationType::CakeTopper => {
                "Design a decorative cake topper, shown as a single printable cut-out \
                 centred on a plain white background"
            }
            DecorationType::Banner => {
                "Design a wide festive party banner with bunting or lettering, \
                 photographed hanging across a wall"
            }
            DecorationType::BalloonArrangement => {
                "Design a balloon arrangement such as an arch or garland, \
                 photographed in a styled party room"
            }
            DecorationType::TableCenterpiece => {
                "Design a table centerpiece, photographed at eye level on a \
                 dressed party table"
            }
            DecorationType::Backdrop => {
                "Design a photo backdrop for guests to pose in front of, \
                 filling the whole frame"
            }
            DecorationType::Invitation => {
                "Design a printed party invitation card laid flat, leaving clear \
                 space for the event text"
            }
            DecorationType::CupcakeToppers => {
                "Design a matching set of cupcake toppers arranged in a grid on a \
                 plain white background"
            }
            DecorationType::PartyFavors => {
                "Design a set of party favor bags and small gifts, photographed \
                 together on a table"
            }
        }
    }
}

impl fmt::Display for DecorationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the upstream prompt for one decoration type.
///
/// `details` is appended only when it contains something other than
/// whitespace.
pub fn build_prompt(decoration_type: DecorationType, theme: &str, details: Option<&str>) -> String {
    let mut prompt = format!(
        "{} for a party with the theme \"{}\". Use a cohesive colour palette and a \
         polished, high-quality look.",
        decoration_type.framing(),
        theme.trim()
    );

    if let Some(details) = details.map(str::trim).filter(|d| !d.is_empty()) {
        prompt.push_str(" Additional details: ");
        prompt.push_str(details);
    }

    prompt.push_str(" Do not include any watermarks.");
    prompt
}
