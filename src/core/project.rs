use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, validate_project_icon, validate_project_input};

/// The fixed palette projects are colored from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectColor {
    BerryRed,
    Red,
    Orange,
    Yellow,
    OliveGreen,
    LimeGreen,
    Green,
    MintGreen,
    Teal,
    SkyBlue,
    LightBlue,
    #[default]
    Blue,
    Grape,
    Violet,
    Lavender,
    Magenta,
    Salmon,
    Charcoal,
    Grey,
    Taupe,
}

impl ProjectColor {
    pub const ALL: [ProjectColor; 20] = [
        Self::BerryRed,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::OliveGreen,
        Self::LimeGreen,
        Self::Green,
        Self::MintGreen,
        Self::Teal,
        Self::SkyBlue,
        Self::LightBlue,
        Self::Blue,
        Self::Grape,
        Self::Violet,
        Self::Lavender,
        Self::Magenta,
        Self::Salmon,
        Self::Charcoal,
        Self::Grey,
        Self::Taupe,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::BerryRed => "Berry Red",
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
            Self::OliveGreen => "Olive Green",
            Self::LimeGreen => "Lime Green",
            Self::Green => "Green",
            Self::MintGreen => "Mint Green",
            Self::Teal => "Teal",
            Self::SkyBlue => "Sky Blue",
            Self::LightBlue => "Light Blue",
            Self::Blue => "Blue",
            Self::Grape => "Grape",
            Self::Violet => "Violet",
            Self::Lavender => "Lavender",
            Self::Magenta => "Magenta",
            Self::Salmon => "Salmon",
            Self::Charcoal => "Charcoal",
            Self::Grey => "Grey",
            Self::Taupe => "Taupe",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::BerryRed => "#b8256f",
            Self::Red => "#db4035",
            Self::Orange => "#ff9933",
            Self::Yellow => "#fad000",
            Self::OliveGreen => "#afb83b",
            Self::LimeGreen => "#7ecc49",
            Self::Green => "#299438",
            Self::MintGreen => "#6accbc",
            Self::Teal => "#158fad",
            Self::SkyBlue => "#14aaf5",
            Self::LightBlue => "#96c3eb",
            Self::Blue => "#4073ff",
            Self::Grape => "#884dff",
            Self::Violet => "#af38eb",
            Self::Lavender => "#eb96eb",
            Self::Magenta => "#e05194",
            Self::Salmon => "#ff8d85",
            Self::Charcoal => "#808080",
            Self::Grey => "#b8b8b8",
            Self::Taupe => "#ccac93",
        }
    }

    /// Look up a palette entry by hex value or label, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
    }
}

/// A named grouping of tasks. Tasks without one live in the Inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: ProjectColor,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: ProjectColor::default(),
            icon: None,
        }
    }

    /// Case-insensitive name comparison, as used by `#project` references.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Fields for a project that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub color: ProjectColor,
    pub icon: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: ProjectColor::default(),
            icon: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_project_input(&self.name)?;
        if let Some(icon) = &self.icon {
            validate_project_icon(icon)?;
        }
        Ok(())
    }

    pub fn into_project(self, id: impl Into<String>) -> Project {
        Project {
            id: id.into(),
            name: self.name.trim().to_string(),
            color: self.color,
            icon: self.icon,
        }
    }
}

/// Display name for a task's project reference; unknown ids read as "Inbox".
pub fn project_label<'a>(project_id: Option<&str>, projects: &'a [Project]) -> &'a str {
    project_id
        .and_then(|id| projects.iter().find(|p| p.id == id))
        .map(|p| p.name.as_str())
        .unwrap_or("Inbox")
}
