//! Field geometry: bases, the infield diamond, outfield sectors and foul lines
//!
//! Geometry is recomputed by the layout routine whenever the viewport changes;
//! the rest of the engine only reads it. Runners and fielders refer to bases by
//! [`BaseName`] and look positions up here.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{Fielder, FielderRole};
use crate::Settings;
use crate::cross;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

/// The four bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseName {
    Home,
    First,
    Second,
    Third,
}

impl BaseName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseName::Home => "Home",
            BaseName::First => "1st Base",
            BaseName::Second => "2nd Base",
            BaseName::Third => "3rd Base",
        }
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A base: named point with a radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub name: BaseName,
    pub pos: Vec2,
    pub radius: f32,
}

/// Simple polygon with a fixed winding order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPolygon {
    points: Vec<Vec2>,
}

impl FieldPolygon {
    pub fn new(points: Vec<Vec2>) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewVertices(points.len()));
        }
        Ok(Self { points })
    }

    fn quad(points: [Vec2; 4]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Even-odd ray casting (horizontal ray toward +x)
    pub fn contains(&self, p: Vec2) -> bool {
        let vs = &self.points;
        let mut inside = false;
        let mut j = vs.len() - 1;
        for i in 0..vs.len() {
            let (vi, vj) = (vs[i], vs[j]);
            let crosses = (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if crosses {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Average of the vertices
    pub fn centroid(&self) -> Vec2 {
        self.points.iter().copied().sum::<Vec2>() / self.points.len() as f32
    }
}

/// Complete field layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub home: Base,
    pub first: Base,
    pub second: Base,
    pub third: Base,
    /// Pitcher's mound
    pub pitch: Vec2,
    pub infield: FieldPolygon,
    pub left_field: FieldPolygon,
    pub center_field: FieldPolygon,
    pub right_field: FieldPolygon,
    /// Swing timing rings around home plate (good, okay, poor)
    pub accuracy_rings: [f32; 3],
}

impl FieldGeometry {
    /// Build the field from the four base positions.
    ///
    /// The outfield sectors extend the diamond outward: center field is the
    /// diamond shifted by `second - home`, left and right field stretch the
    /// third-to-second and first-to-second edges along their foul lines.
    pub fn new(home: Vec2, first: Vec2, second: Vec2, third: Vec2, base_radius: f32) -> Self {
        let up = second - home;
        let to_first = first - home;
        let to_third = third - home;

        let infield = FieldPolygon::quad([home, first, second, third]);
        let center_field =
            FieldPolygon::quad([second, first + up, second + up, third + up]);
        let left_field =
            FieldPolygon::quad([third, second, second + to_third, third + to_third]);
        let right_field =
            FieldPolygon::quad([first, second, second + to_first, first + to_first]);

        let base = |name, pos| Base {
            name,
            pos,
            radius: base_radius,
        };

        Self {
            home: base(BaseName::Home, home),
            first: base(BaseName::First, first),
            second: base(BaseName::Second, second),
            third: base(BaseName::Third, third),
            pitch: (home + second) / 2.0,
            infield,
            left_field,
            center_field,
            right_field,
            accuracy_rings: [base_radius * 2.0, base_radius * 3.0, base_radius * 4.0],
        }
    }

    /// Lay the field out for a viewport: 5% side padding, square diamond,
    /// home plate at 85% of the height
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let padding = width * 0.05;
        let diamond = width - 2.0 * padding;
        let home = Vec2::new(width / 2.0, height * 0.85);
        let half = diamond / 2.0;

        let first = home + Vec2::new(half, -half);
        let second = home + Vec2::new(0.0, -diamond);
        let third = home + Vec2::new(-half, -half);
        let base_radius = (width * 0.015).max(10.0);

        log::info!("Field layout {width}x{height}: diamond {diamond}, base radius {base_radius}");
        Self::new(home, first, second, third, base_radius)
    }

    pub fn base(&self, name: BaseName) -> &Base {
        match name {
            BaseName::Home => &self.home,
            BaseName::First => &self.first,
            BaseName::Second => &self.second,
            BaseName::Third => &self.third,
        }
    }

    pub fn base_pos(&self, name: BaseName) -> Vec2 {
        self.base(name).pos
    }

    /// Home plate to second base
    pub fn diamond_height(&self) -> f32 {
        self.home.pos.distance(self.second.pos)
    }

    /// Unit vector from home toward second (straight up the middle)
    pub fn up_field(&self) -> Vec2 {
        (self.second.pos - self.home.pos).normalize_or_zero()
    }

    /// Signed distances from the third- and first-base foul lines.
    /// Positive is fair territory, zero is on the line.
    pub fn foul_line_offsets(&self, p: Vec2) -> (f32, f32) {
        let home = self.home.pos;
        let second = self.second.pos;
        let side = |base: Vec2| {
            let line = home - base;
            let fair_sign = cross(line, second - base).signum();
            cross(line, p - base) * fair_sign / line.length().max(f32::EPSILON)
        };
        (side(self.third.pos), side(self.first.pos))
    }

    pub fn is_foul(&self, p: Vec2) -> bool {
        let (left, right) = self.foul_line_offsets(p);
        left < 0.0 || right < 0.0
    }

    /// Distance of `p` from home plate measured along the home-to-second axis
    pub fn depth(&self, p: Vec2) -> f32 {
        (p - self.home.pos).dot(self.up_field())
    }
}

/// Place the eight fielders the way a pitch starts: pitcher on the mound,
/// catcher behind the outer timing ring, basemen a quarter of the way along the
/// base path, outfielders deep in their sectors
pub fn default_roster(field: &FieldGeometry, settings: &Settings) -> Vec<Fielder> {
    let home = field.home.pos;
    let first = field.first.pos;
    let second = field.second.pos;
    let third = field.third.pos;

    let behind_home = -field.up_field();
    let catcher = home + behind_home * (field.accuracy_rings[2] + settings.fielder_radius);

    let spots = [
        (FielderRole::Pitcher, field.pitch),
        (FielderRole::Catcher, catcher),
        (FielderRole::FirstBaseman, first.lerp(second, 0.25)),
        (FielderRole::SecondBaseman, second.lerp(first, 0.25)),
        (FielderRole::ThirdBaseman, third.lerp(second, 0.25)),
        (FielderRole::LeftFielder, field.left_field.centroid()),
        (FielderRole::CenterFielder, second + (second - home) * 0.5),
        (FielderRole::RightFielder, field.right_field.centroid()),
    ];

    spots
        .into_iter()
        .map(|(role, pos)| Fielder::new(role, pos, settings.fielder_speed, settings.fielder_radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldGeometry {
        FieldGeometry::new(
            Vec2::new(200.0, 400.0),
            Vec2::new(300.0, 300.0),
            Vec2::new(200.0, 200.0),
            Vec2::new(100.0, 300.0),
            12.0,
        )
    }

    #[test]
    fn test_polygon_needs_three_points() {
        assert_eq!(
            FieldPolygon::new(vec![Vec2::ZERO, Vec2::ONE]),
            Err(GeometryError::TooFewVertices(2))
        );
        assert!(FieldPolygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y]).is_ok());
    }

    #[test]
    fn test_polygon_contains() {
        let square = FieldPolygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(square.contains(Vec2::new(5.0, 5.0)));
        assert!(!square.contains(Vec2::new(15.0, 5.0)));
        assert!(!square.contains(Vec2::new(5.0, -1.0)));
    }

    #[test]
    fn test_sectors_meet_at_second() {
        let f = field();
        assert_eq!(f.center_field.points()[0], f.second.pos);
        assert_eq!(f.left_field.points()[1], f.second.pos);
        assert_eq!(f.right_field.points()[1], f.second.pos);
        assert!(f.center_field.contains(Vec2::new(200.0, 100.0)));
        assert!(f.left_field.contains(Vec2::new(100.0, 200.0)));
        assert!(f.right_field.contains(Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn test_foul_lines() {
        let f = field();
        // Up the middle is fair on both sides
        let (l, r) = f.foul_line_offsets(Vec2::new(200.0, 300.0));
        assert!(l > 0.0 && r > 0.0);

        // Beyond third base line
        assert!(f.is_foul(Vec2::new(50.0, 360.0)));
        // Beyond first base line
        assert!(f.is_foul(Vec2::new(350.0, 360.0)));
        // Exactly on the first base line is fair
        let (_, r) = f.foul_line_offsets(Vec2::new(350.0, 250.0));
        assert_eq!(r, 0.0);
        assert!(!f.is_foul(Vec2::new(350.0, 250.0)));
    }

    #[test]
    fn test_from_viewport() {
        let f = FieldGeometry::from_viewport(800.0, 600.0);
        assert_eq!(f.home.pos, Vec2::new(400.0, 510.0));
        assert_eq!(f.second.pos, Vec2::new(400.0, -210.0));
        assert_eq!(f.first.pos, Vec2::new(760.0, 150.0));
        assert_eq!(f.third.pos, Vec2::new(40.0, 150.0));
        assert_eq!(f.home.radius, 12.0);
        assert_eq!(f.pitch, Vec2::new(400.0, 150.0));
        assert_eq!(f.diamond_height(), 720.0);

        // Small screens keep a minimum base size
        assert_eq!(FieldGeometry::from_viewport(320.0, 480.0).home.radius, 10.0);
    }

    #[test]
    fn test_default_roster() {
        let f = FieldGeometry::from_viewport(800.0, 600.0);
        let roster = default_roster(&f, &Settings::default());
        assert_eq!(roster.len(), 8);

        let catcher = roster.iter().find(|o| o.role == FielderRole::Catcher).unwrap();
        // Behind home by the outer ring plus a fielder radius
        assert_eq!(catcher.pos, Vec2::new(400.0, 510.0 + 48.0 + 12.0));

        let first_baseman = roster
            .iter()
            .find(|o| o.role == FielderRole::FirstBaseman)
            .unwrap();
        let base_path = f.first.pos.distance(f.second.pos);
        assert!((first_baseman.pos.distance(f.first.pos) - base_path * 0.25).abs() < 1e-3);
        assert_eq!(first_baseman.pos, first_baseman.rest_pos);
        assert_eq!(first_baseman.role.assigned_base(), Some(BaseName::First));

        let left = roster
            .iter()
            .find(|o| o.role == FielderRole::LeftFielder)
            .unwrap();
        assert!(f.left_field.contains(left.pos));
    }
}
