//! Shape descriptions.
//!
//! External callers describe shapes with a free-form `{name, properties}`
//! payload. It is decoded exactly once, here, into [`ShapeKind`]; nothing
//! downstream looks at shape names again.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ChamberError, Result};

/// Named formations a chamber can be asked to morph into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Formation {
    Sphere,
    Cube,
    Torus,
    Helix,
    Spiral,
    Dna,
    Fractal,
    Star,
    Polygon,
    Scatter,
}

impl Formation {
    pub const ALL: [Formation; 10] = [
        Formation::Sphere,
        Formation::Cube,
        Formation::Torus,
        Formation::Helix,
        Formation::Spiral,
        Formation::Dna,
        Formation::Fractal,
        Formation::Star,
        Formation::Polygon,
        Formation::Scatter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Formation::Sphere => "sphere",
            Formation::Cube => "cube",
            Formation::Torus => "torus",
            Formation::Helix => "helix",
            Formation::Spiral => "spiral",
            Formation::Dna => "dna",
            Formation::Fractal => "fractal",
            Formation::Star => "star",
            Formation::Polygon => "polygon",
            Formation::Scatter => "scatter",
        }
    }

    /// Shape used when the formation is requested by name alone.
    pub fn default_shape(self) -> ShapeKind {
        match self {
            Formation::Sphere => ShapeKind::Sphere,
            Formation::Cube => ShapeKind::Cube,
            Formation::Torus => ShapeKind::Torus,
            Formation::Helix => ShapeKind::Helix {
                turns: 3.0,
                point_count: 60,
            },
            Formation::Spiral => ShapeKind::Spiral {
                turns: 3.0,
                point_count: 80,
                spiral_type: SpiralType::Archimedean,
            },
            Formation::Dna => ShapeKind::Dna {
                turns: 2.0,
                point_count: 40,
            },
            Formation::Fractal => ShapeKind::Fractal { iterations: 3 },
            Formation::Star => ShapeKind::Star { points: 5 },
            Formation::Polygon => ShapeKind::Polygon { sides: 6 },
            Formation::Scatter => ShapeKind::Scatter,
        }
    }

    /// Helical shapes present themselves by drilling around the vertical axis.
    pub fn is_helical(self) -> bool {
        matches!(self, Formation::Helix | Formation::Dna | Formation::Spiral)
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Formation {
    type Err = ChamberError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Formation::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| ChamberError::UnknownFormation(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpiralType {
    #[default]
    Archimedean,
    Logarithmic,
    Fermat,
}

impl SpiralType {
    fn parse(s: &str) -> SpiralType {
        let s = s.to_ascii_lowercase();
        if s.contains("log") || s.contains("golden") {
            SpiralType::Logarithmic
        } else if s.contains("fermat") || s.contains("parabolic") {
            SpiralType::Fermat
        } else {
            SpiralType::Archimedean
        }
    }
}

/// Upper bound on `point_count` for helical shapes.
pub const MAX_SHAPE_POINTS: usize = 2048;
/// Upper bound on `turns`; past this the strands alias into noise anyway.
pub const MAX_TURNS: f32 = 64.0;
/// Upper bound on polygon sides and star points.
pub const MAX_SIDES: usize = 64;

/// A fully decoded shape with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    Sphere,
    Cube,
    Torus,
    Helix { turns: f32, point_count: usize },
    Dna { turns: f32, point_count: usize },
    Spiral { turns: f32, point_count: usize, spiral_type: SpiralType },
    Star { points: usize },
    Polygon { sides: usize },
    Fractal { iterations: u32 },
    Scatter,
}

impl ShapeKind {
    pub fn formation(&self) -> Formation {
        match self {
            ShapeKind::Sphere => Formation::Sphere,
            ShapeKind::Cube => Formation::Cube,
            ShapeKind::Torus => Formation::Torus,
            ShapeKind::Helix { .. } => Formation::Helix,
            ShapeKind::Dna { .. } => Formation::Dna,
            ShapeKind::Spiral { .. } => Formation::Spiral,
            ShapeKind::Star { .. } => Formation::Star,
            ShapeKind::Polygon { .. } => Formation::Polygon,
            ShapeKind::Fractal { .. } => Formation::Fractal,
            ShapeKind::Scatter => Formation::Scatter,
        }
    }

    /// Decode an external shape description.
    ///
    /// The name is matched word by word so synonyms such as "ball" or
    /// "double helix" resolve; missing properties take the formation's
    /// defaults, degenerate ones are rejected.
    pub fn from_payload(payload: &ShapePayload) -> Result<ShapeKind> {
        let name = payload.name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(ChamberError::MalformedShape("empty shape name".into()));
        }
        let formation = match_formation(&name)
            .ok_or_else(|| ChamberError::MalformedShape(format!("no shape matches '{name}'")))?;
        let props = &payload.properties;

        let kind = match formation.default_shape() {
            ShapeKind::Helix { turns, point_count } => ShapeKind::Helix {
                turns: props.turns.unwrap_or(turns),
                point_count: props.point_count.unwrap_or(point_count),
            },
            ShapeKind::Dna { turns, point_count } => ShapeKind::Dna {
                turns: props.turns.unwrap_or(turns),
                point_count: props.point_count.unwrap_or(point_count),
            },
            ShapeKind::Spiral {
                turns,
                point_count,
                spiral_type,
            } => ShapeKind::Spiral {
                turns: props.turns.unwrap_or(turns),
                point_count: props.point_count.unwrap_or(point_count),
                spiral_type: props
                    .spiral_type
                    .as_deref()
                    .map(SpiralType::parse)
                    .unwrap_or(spiral_type),
            },
            ShapeKind::Star { points } => ShapeKind::Star {
                points: props.points.or(props.sides).unwrap_or(points),
            },
            ShapeKind::Polygon { sides } => ShapeKind::Polygon {
                sides: props.sides.or_else(|| implied_sides(&name)).unwrap_or(sides),
            },
            ShapeKind::Fractal { iterations } => ShapeKind::Fractal {
                iterations: props.iterations.unwrap_or(iterations),
            },
            other => other,
        };
        kind.validate()?;
        Ok(kind)
    }

    /// Decode a JSON `{ "name": ..., "properties": {...} }` payload.
    pub fn from_json(json: &str) -> Result<ShapeKind> {
        let payload: ShapePayload = serde_json::from_str(json)?;
        ShapeKind::from_payload(&payload)
    }

    fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(ChamberError::MalformedShape(msg));
        match *self {
            ShapeKind::Helix { turns, point_count }
            | ShapeKind::Dna { turns, point_count }
            | ShapeKind::Spiral {
                turns, point_count, ..
            } => {
                if !(turns.is_finite() && turns > 0.0 && turns <= MAX_TURNS) {
                    return bad(format!("turns must be in (0, {MAX_TURNS}], got {turns}"));
                }
                if !(1..=MAX_SHAPE_POINTS).contains(&point_count) {
                    return bad(format!(
                        "point_count must be in 1..={MAX_SHAPE_POINTS}, got {point_count}"
                    ));
                }
            }
            ShapeKind::Star { points } if !(3..=MAX_SIDES).contains(&points) => {
                return bad(format!("a star needs 3..={MAX_SIDES} points, got {points}"));
            }
            ShapeKind::Polygon { sides } if !(3..=MAX_SIDES).contains(&sides) => {
                return bad(format!("a polygon needs 3..={MAX_SIDES} sides, got {sides}"));
            }
            ShapeKind::Fractal { iterations } if iterations == 0 => {
                return bad("fractal needs at least one iteration".into());
            }
            _ => {}
        }
        Ok(())
    }
}

/// Order matters: "dna double helix" must hit DNA before helix.
const SYNONYMS: &[(&[&str], Formation)] = &[
    (&["dna", "double helix"], Formation::Dna),
    (&["helix", "coil"], Formation::Helix),
    (&["spiral", "vortex", "whirlpool", "galaxy"], Formation::Spiral),
    (&["torus", "donut", "doughnut", "ring"], Formation::Torus),
    (&["cube", "box"], Formation::Cube),
    (&["sphere", "ball", "circle", "orb", "globe"], Formation::Sphere),
    (&["star"], Formation::Star),
    (&["fractal", "sierpinski", "koch"], Formation::Fractal),
    (
        &[
            "polygon", "triangle", "square", "pentagon", "hexagon", "heptagon", "octagon",
        ],
        Formation::Polygon,
    ),
    (&["scatter", "cloud", "dust"], Formation::Scatter),
];

/// Lower-case alphanumeric words of a shape name; "double-helix" is two words.
fn words(name: &str) -> Vec<&str> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// True when `phrase` occurs in `name` as whole words. A trailing plural
/// "s" on the name's word is accepted.
fn has_phrase(name: &[&str], phrase: &str) -> bool {
    let phrase = words(phrase);
    if phrase.is_empty() || phrase.len() > name.len() {
        return false;
    }
    name.windows(phrase.len()).any(|window| {
        window
            .iter()
            .zip(&phrase)
            .all(|(w, p)| w == p || w.strip_suffix('s') == Some(*p))
    })
}

fn match_formation(name: &str) -> Option<Formation> {
    let name = words(name);
    SYNONYMS
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| has_phrase(&name, p)))
        .map(|&(_, f)| f)
}

fn implied_sides(name: &str) -> Option<usize> {
    const NAMED: [(&str, usize); 6] = [
        ("triangle", 3),
        ("square", 4),
        ("pentagon", 5),
        ("hexagon", 6),
        ("heptagon", 7),
        ("octagon", 8),
    ];
    let name = words(name);
    NAMED
        .iter()
        .find(|(word, _)| has_phrase(&name, word))
        .map(|&(_, n)| n)
}

/// External shape description, as found in a `shape_data` response field.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ShapePayload {
    pub name: String,
    #[serde(default)]
    pub properties: ShapeProperties,
}

impl ShapePayload {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: ShapeProperties::default(),
        }
    }
}

/// Free-form property bag; unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShapeProperties {
    pub sides: Option<usize>,
    pub points: Option<usize>,
    pub turns: Option<f32>,
    #[serde(alias = "pointCount")]
    pub point_count: Option<usize>,
    #[serde(alias = "spiralType")]
    pub spiral_type: Option<String>,
    pub iterations: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_resolve() {
        for (name, expected) in [
            ("ball", Formation::Sphere),
            ("glowing circle", Formation::Sphere),
            ("dna double helix", Formation::Dna),
            ("helix", Formation::Helix),
            ("golden spiral", Formation::Spiral),
            ("donut", Formation::Torus),
            ("Cube", Formation::Cube),
            ("five pointed star", Formation::Star),
            ("hexagon", Formation::Polygon),
        ] {
            let kind = ShapeKind::from_payload(&ShapePayload::named(name)).unwrap();
            assert_eq!(kind.formation(), expected, "'{}' resolved wrongly", name);
        }
    }

    #[test]
    fn test_named_polygon_implies_sides() {
        let kind = ShapeKind::from_payload(&ShapePayload::named("triangle")).unwrap();
        assert_eq!(kind, ShapeKind::Polygon { sides: 3 });
    }

    #[test]
    fn test_explicit_properties_win() {
        let kind = ShapeKind::from_json(
            r#"{"name":"spiral","properties":{"turns":4,"point_count":12,"spiral_type":"logarithmic"}}"#,
        )
        .unwrap();
        assert_eq!(
            kind,
            ShapeKind::Spiral {
                turns: 4.0,
                point_count: 12,
                spiral_type: SpiralType::Logarithmic
            }
        );
    }

    #[test]
    fn test_degenerate_properties_rejected() {
        let err = ShapeKind::from_json(r#"{"name":"polygon","properties":{"sides":2}}"#);
        assert!(matches!(err, Err(ChamberError::MalformedShape(_))));
        let err = ShapeKind::from_json(r#"{"name":"helix","properties":{"point_count":0}}"#);
        assert!(matches!(err, Err(ChamberError::MalformedShape(_))));
    }

    #[test]
    fn test_oversized_properties_rejected() {
        for json in [
            r#"{"name":"dna","properties":{"turns":2,"point_count":9223372036854775807}}"#,
            r#"{"name":"helix","properties":{"point_count":2049}}"#,
            r#"{"name":"spiral","properties":{"turns":1e38}}"#,
            r#"{"name":"helix","properties":{"turns":64.5}}"#,
            r#"{"name":"star","properties":{"points":65}}"#,
            r#"{"name":"polygon","properties":{"sides":100000}}"#,
        ] {
            assert!(
                matches!(ShapeKind::from_json(json), Err(ChamberError::MalformedShape(_))),
                "{json} should be rejected"
            );
        }
        let edge = ShapeKind::from_json(r#"{"name":"dna","properties":{"turns":64,"point_count":2048}}"#);
        assert_eq!(
            edge.unwrap(),
            ShapeKind::Dna {
                turns: MAX_TURNS,
                point_count: MAX_SHAPE_POINTS
            }
        );
    }

    #[test]
    fn test_synonyms_match_whole_words() {
        for name in ["string", "orbit", "toolbox", "starfish"] {
            assert!(
                ShapeKind::from_payload(&ShapePayload::named(name)).is_err(),
                "'{}' should not match a shape",
                name
            );
        }
        for (name, expected) in [
            ("double-helix", Formation::Dna),
            ("two stars", Formation::Star),
            ("a ring of light", Formation::Torus),
            ("toy box", Formation::Cube),
        ] {
            let kind = ShapeKind::from_payload(&ShapePayload::named(name)).unwrap();
            assert_eq!(kind.formation(), expected, "'{}' resolved wrongly", name);
        }
    }

    #[test]
    fn test_unknown_and_invalid_payloads() {
        assert!(matches!(
            ShapeKind::from_payload(&ShapePayload::named("teapot")),
            Err(ChamberError::MalformedShape(_))
        ));
        assert!(matches!(
            ShapeKind::from_json("not json"),
            Err(ChamberError::Payload(_))
        ));
    }

    #[test]
    fn test_formation_from_str() {
        assert_eq!("Torus".parse::<Formation>().unwrap(), Formation::Torus);
        assert!(matches!(
            "whirl".parse::<Formation>(),
            Err(ChamberError::UnknownFormation(_))
        ));
    }
}
