//! The renderer contract.

use nicebrick_core::{HexColor, RenderError, SubjectId};

/// Inputs to a BearBrick render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearBrickOptions {
    pub subject_id: SubjectId,
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

impl BearBrickOptions {
    /// Options with the default palette and no names.
    pub fn new(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            primary_color: HexColor::default_primary(),
            secondary_color: HexColor::default_secondary(),
            username: None,
            display_name: None,
        }
    }

    pub fn with_colors(mut self, primary: HexColor, secondary: HexColor) -> Self {
        self.primary_color = primary;
        self.secondary_color = secondary;
        self
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    pub(crate) fn username(&self) -> Option<&str> {
        non_blank(self.username.as_deref())
    }

    pub(crate) fn display_name(&self) -> Option<&str> {
        non_blank(self.display_name.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Turns [`BearBrickOptions`] into SVG markup.
///
/// Implementations must be pure: the same options always produce the same
/// markup. An implementation that cannot produce usable output returns
/// an error rather than an empty string.
pub trait BearBrickRenderer: Send + Sync {
    fn render(&self, options: &BearBrickOptions) -> Result<String, RenderError>;

    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Render and reject empty output.
    fn render_checked(&self, options: &BearBrickOptions) -> Result<String, RenderError> {
        let markup = self.render(options)?;
        if markup.trim().is_empty() {
            return Err(RenderError::EmptyOutput {
                renderer: self.name().to_string(),
            });
        }
        Ok(markup)
    }
}
