//! Cell model: typed content, styling, and the lock flag.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Text color, CSS-style string ("#1a1a2e"). None means the theme default.
    pub color: Option<String>,
    pub background: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub align: Alignment,
    pub valign: VerticalAlignment,
}

/// Partial style update. Only the fields that are Some are applied,
/// so one patch can bold a range without clobbering its colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub align: Option<Alignment>,
    pub valign: Option<VerticalAlignment>,
}

impl CellStyle {
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(underline) = patch.underline {
            self.underline = underline;
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(background) = &patch.background {
            self.background = Some(background.clone());
        }
        if let Some(font_family) = &patch.font_family {
            self.font_family = Some(font_family.clone());
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = Some(font_size);
        }
        if let Some(align) = patch.align {
            self.align = align;
        }
        if let Some(valign) = patch.valign {
            self.valign = valign;
        }
    }
}

/// What a cell holds. Formulas keep their source text plus the display
/// string cached at entry time; they are never re-evaluated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Formula { source: String, cached: String },
}

impl CellContent {
    /// Classify raw user input. Formula results are cached later by the
    /// sheet, which owns the grid the formula reads from.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            CellContent::Empty
        } else if trimmed.starts_with('=') {
            CellContent::Formula {
                source: trimmed.to_string(),
                cached: String::new(),
            }
        } else if let Ok(n) = trimmed.parse::<f64>() {
            CellContent::Number(n)
        } else {
            CellContent::Text(input.to_string())
        }
    }

    /// The string the grid renders.
    pub fn display(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Number(n) => {
                if *n == n.trunc() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellContent::Formula { cached, .. } => cached.clone(),
        }
    }

    /// The string the editor seeds from: formula source for formulas,
    /// display value otherwise.
    pub fn raw(&self) -> String {
        match self {
            CellContent::Formula { source, .. } => source.clone(),
            other => other.display(),
        }
    }

    /// Numeric view for formula evaluation. Non-numeric reads as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            CellContent::Empty => 0.0,
            CellContent::Number(n) => *n,
            CellContent::Text(s) => s.trim().parse().unwrap_or(0.0),
            CellContent::Formula { cached, .. } => cached.trim().parse().unwrap_or(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub content: CellContent,
    #[serde(default)]
    pub style: CellStyle,
    #[serde(default)]
    pub locked: bool,
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Cell {
            content,
            style: CellStyle::default(),
            locked: false,
        }
    }

    /// A cell that carries no data, style, or lock and can be dropped
    /// from sparse storage.
    pub fn is_default(&self) -> bool {
        self.content.is_empty() && self.style == CellStyle::default() && !self.locked
    }
}
