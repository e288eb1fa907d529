pub mod registry;

use crate::action::Instruction;
use crate::config::schema::{MacroEntry, MacroFile};
use crate::render::Rgb;

/// Grid keys plus the encoder push-button.
pub const MAX_MACROS: usize = 13;

/// Macro index bound to the encoder push-button.
pub const ENCODER_KEY: usize = 12;

/// A key binding: idle indicator color, label and decoded sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub color: Rgb,
    pub label: String,
    pub sequence: Vec<Instruction>,
}

impl From<MacroEntry> for Macro {
    fn from(entry: MacroEntry) -> Self {
        Self {
            color: entry.color,
            label: entry.label,
            sequence: entry.sequence.into_iter().map(Instruction::from).collect(),
        }
    }
}

/// A named macro set for one host application.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub name: String,
    pub macros: Vec<Macro>,
}

impl Application {
    pub fn new(name: impl Into<String>, macros: Vec<Macro>) -> Self {
        Self {
            name: name.into(),
            macros,
        }
    }

    pub fn macro_for(&self, key: usize) -> Option<&Macro> {
        self.macros.get(key)
    }

    pub fn has_encoder_macro(&self) -> bool {
        self.macros.len() > ENCODER_KEY
    }
}

impl From<MacroFile> for Application {
    fn from(file: MacroFile) -> Self {
        Self::new(file.name, file.macros.into_iter().map(Macro::from).collect())
    }
}
