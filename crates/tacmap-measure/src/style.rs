//! Global style control.

use tacmap_core::{Color, LineStyle, Result, Style, WidthLevel};

use crate::shape_store::ShapeStore;

/// Holds the active style and pushes every change to all stored shapes.
///
/// There is no per-shape styling: a change here recolours, re-thickens and
/// re-dashes every committed shape, its label and its arrow head at once.
/// New shapes are committed with the active style.
#[derive(Debug, Clone, Default)]
pub struct StyleBroadcaster {
    active: Style,
}

impl StyleBroadcaster {
    pub fn new(initial: Style) -> Self {
        Self { active: initial }
    }

    /// The style new shapes are committed with.
    pub fn active(&self) -> Style {
        self.active
    }

    /// Replaces the whole style and restyles `store`.
    ///
    /// The active style only changes if the store accepted the restyle.
    pub fn set_style(&mut self, style: Style, store: &mut ShapeStore) -> Result<()> {
        store.restyle(style)?;
        if style != self.active {
            tracing::debug!(
                "Style set to {} width {} {}",
                style.color,
                style.width_level.get(),
                style.line_style
            );
        }
        self.active = style;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color, store: &mut ShapeStore) -> Result<()> {
        self.set_style(Style { color, ..self.active }, store)
    }

    pub fn set_width_level(&mut self, width_level: WidthLevel, store: &mut ShapeStore) -> Result<()> {
        self.set_style(
            Style {
                width_level,
                ..self.active
            },
            store,
        )
    }

    pub fn set_line_style(&mut self, line_style: LineStyle, store: &mut ShapeStore) -> Result<()> {
        self.set_style(
            Style {
                line_style,
                ..self.active
            },
            store,
        )
    }
}
