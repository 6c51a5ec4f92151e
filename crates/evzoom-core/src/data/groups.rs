//! Amino-acid classes
//!
//! Logo letters, legend glyphs and matrix labels are coloured by the
//! biochemical class of their residue.
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AaGroup {
    Hydrophobic,
    Aromatic,
    Positive,
    Negative,
    Polar,
    Cysteine,
    Gap,
}

impl AaGroup {
    #[rustfmt::skip]
    pub fn of(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'G' | 'A' | 'I' | 'V' | 'L' | 'M' | 'P' => AaGroup::Hydrophobic,
            'F' | 'Y' | 'W'                         => AaGroup::Aromatic,
            'H' | 'K' | 'R'                         => AaGroup::Positive,
            'D' | 'E'                               => AaGroup::Negative,
            'Q' | 'N' | 'S' | 'T'                   => AaGroup::Polar,
            'C'                                     => AaGroup::Cysteine,
            _                                       => AaGroup::Gap,
        }
    }

    /// Same as [`AaGroup::of`] for a label string; the first character decides.
    pub fn of_label(label: &str) -> Self {
        label.chars().next().map_or(AaGroup::Gap, AaGroup::of)
    }

    /// Legend text.
    pub fn label(&self) -> &'static str {
        match self {
            AaGroup::Hydrophobic => "Hydrophobic",
            AaGroup::Aromatic => "Aromatic",
            AaGroup::Positive => "Positive",
            AaGroup::Negative => "Negative",
            AaGroup::Polar => "Polar",
            AaGroup::Cysteine => "Cysteine",
            AaGroup::Gap => "Gap",
        }
    }
}

/// Represents the colour scheme used for residue classes.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorScheme {
    /// A solid, single colour for every residue.
    Solid(String),
    /// Colours residues by their biochemical class.
    ByGroup,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::ByGroup
    }
}

impl ColorScheme {
    pub fn group_color(&self, group: AaGroup) -> String {
        match self {
            ColorScheme::Solid(color) => color.clone(),
            ColorScheme::ByGroup => match group {
                AaGroup::Hydrophobic => "#888888",
                AaGroup::Aromatic => "#404040",
                AaGroup::Cysteine => "#9E9D24",
                AaGroup::Positive => "#F61C76",
                AaGroup::Negative => "#03A9F4",
                AaGroup::Polar => "#1565C0",
                AaGroup::Gap => "none",
            }
            .to_string(),
        }
    }

    pub fn get_color(&self, code: char) -> String {
        self.group_color(AaGroup::of(code))
    }

    pub fn label_color(&self, label: &str) -> String {
        self.group_color(AaGroup::of_label(label))
    }
}
