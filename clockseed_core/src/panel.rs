//! Scene properties panel, described for the host's UI layer to render.

use crate::addon::GENERATE_OPERATOR;
use clockseed_env::SeedField;
use serde::Serialize;

/// One row inside a panel section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PanelItem {
    /// Static text line
    Label(String),

    /// Button invoking an operator by id
    Operator {
        idname: &'static str,
        label: &'static str,
    },
}

/// A boxed group of rows with a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSection {
    pub title: &'static str,
    pub icon: &'static str,
    pub items: Vec<PanelItem>,
}

/// The "Random Seed Generator" panel in the scene properties tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedPanel {
    pub label: &'static str,
    pub context: &'static str,
    pub sections: Vec<PanelSection>,
}

fn label(text: impl Into<String>) -> PanelItem {
    PanelItem::Label(text.into())
}

impl SeedPanel {
    /// Builds the panel layout.
    pub fn layout() -> Self {
        let dynamic = SeedField::DynamicSeed.property_name();
        let fixed = SeedField::StaticSeed.property_name();

        Self {
            label: "Random Seed Generator",
            context: "scene",
            sections: vec![
                PanelSection {
                    title: "Dynamic Seed",
                    icon: "TIME",
                    items: vec![
                        label("• Updates each time you play (spacebar)"),
                        label(format!("• Use as driver: {}", dynamic)),
                    ],
                },
                PanelSection {
                    title: "Static Seed",
                    icon: "DECORATE_LOCKED",
                    items: vec![
                        PanelItem::Operator {
                            idname: GENERATE_OPERATOR.idname,
                            label: GENERATE_OPERATOR.label,
                        },
                        label("• Set when file loads"),
                        label("• Click button to generate new"),
                        label(format!("• Use as driver: {}", fixed)),
                    ],
                },
                PanelSection {
                    title: "Setup Instructions:",
                    icon: "HELP",
                    items: vec![
                        label("1. Right-click property → Add Driver"),
                        label("2. Type: Sum Values"),
                        label("3. Variable: Single Property"),
                        label("4. ID: Scene"),
                        label(format!("5. Path: {} or {}", dynamic, fixed)),
                    ],
                },
            ],
        }
    }
}
