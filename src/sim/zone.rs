//! Landing zone classification

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::FieldGeometry;

/// Where a batted ball came down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneLabel {
    Infield,
    LeftField,
    CenterField,
    RightField,
    HomeRun,
    Foul,
}

impl ZoneLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneLabel::Infield => "Infield",
            ZoneLabel::LeftField => "Left Field",
            ZoneLabel::CenterField => "Center Field",
            ZoneLabel::RightField => "Right Field",
            ZoneLabel::HomeRun => "Home Run",
            ZoneLabel::Foul => "Foul",
        }
    }

    /// Whether the ball stays in play for the fielders
    pub fn is_in_play(&self) -> bool {
        !matches!(self, ZoneLabel::HomeRun | ZoneLabel::Foul)
    }
}

impl fmt::Display for ZoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a landing point.
///
/// Foul lines win over everything; then the diamond and the left, center and
/// right sectors in that order; fair balls beyond second base's depth that miss
/// every sector cleared the fence.
pub fn classify(point: Vec2, field: &FieldGeometry) -> ZoneLabel {
    if field.is_foul(point) {
        return ZoneLabel::Foul;
    }

    let sectors = [
        (&field.infield, ZoneLabel::Infield),
        (&field.left_field, ZoneLabel::LeftField),
        (&field.center_field, ZoneLabel::CenterField),
        (&field.right_field, ZoneLabel::RightField),
    ];
    if let Some((_, label)) = sectors.iter().find(|(poly, _)| poly.contains(point)) {
        return *label;
    }

    if field.depth(point) > field.diamond_height() {
        return ZoneLabel::HomeRun;
    }

    ZoneLabel::Foul
}
