use std::{
    io::{Read, Seek},
    iter::Peekable,
    vec::IntoIter,
};

use raycaster::{
    camera::Camera,
    error::SceneError,
    lighting::{Directed, Light, Point, Spot},
    material::{Color, Material},
    math::Vector3,
    object::{Object, Sphere},
    scene::Scene,
};
use thiserror::Error;

use crate::tokenize::{Sep, Spanned, Token, TokenizeError, Tokenizer};

/// An error while reading a scene description.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokenizeError),

    #[error("expected {expected} on line {line}, got '{got}'")]
    UnexpectedToken {
        expected: String,
        got: Token,
        line: usize,
    },

    #[error("expected {0}, got end of file")]
    UnexpectedEof(String),

    #[error("unknown scene object {0} on line {1}")]
    UnknownObject(String, usize),

    #[error("unknown material property {0} on line {1}")]
    UnknownProperty(String, usize),

    #[error("invalid scene object ending on line {line}: {source}")]
    InvalidScene {
        line: usize,
        #[source]
        source: SceneError,
    },
}

/// Read a whole scene description from `reader`.
pub fn read_scene<R: Read + Seek>(reader: R) -> Result<Scene, ParseError> {
    SceneParser::new(Tokenizer::new(reader).tokenize()?).parse()
}

/// A recursive descent parser over the tokenizer's output.
///
/// An example scene:
/// ```text
/// scene {
///     background = 0.5 0.5 0.5
///     ambientBrightness = 0.1
///     camera { at = 10 0 0  up = 0 0 1  viewport = 1.57 }
///     pointLight { position = 0 0 10  brightness = 100 }
///     sphere {
///         position = 10 0 0
///         radius = 3
///         material { color = 1 0 0  diffuse = 1 }
///     }
/// }
/// ```
#[derive(Debug)]
pub struct SceneParser {
    tokens: Peekable<IntoIter<Spanned>>,
    line: usize,
}

impl SceneParser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            line: 1,
        }
    }

    /// Parse the root `scene` block. Nothing may follow it.
    pub fn parse(mut self) -> Result<Scene, ParseError> {
        self.read_keyword("scene")?;
        self.read_sep(Sep::BraceOpen)?;

        let background = self.read_value("background", Self::read_color)?;
        let ambient = self.read_value("ambientBrightness", Self::read_number)?;
        let camera = self.read_camera()?;

        let mut scene = Scene {
            camera,
            background,
            ambient,
            ..Default::default()
        };

        loop {
            let (name, line) = match self.next_expecting("a light, a sphere, or '}'")? {
                Spanned {
                    token: Token::Identifier(name),
                    line,
                } => (name, line),
                Spanned {
                    token: Token::Sep(Sep::BraceClose),
                    ..
                } => break,
                Spanned { token, line } => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "a light, a sphere, or '}'".into(),
                        got: token,
                        line,
                    })
                }
            };

            match name.as_str() {
                "pointLight" => scene.lights.push(self.read_point_light()?),
                "spotLight" => scene.lights.push(self.read_spot_light()?),
                "directedLight" => scene.lights.push(self.read_directed_light()?),
                "sphere" => scene.objects.push(self.read_sphere()?),
                _ => return Err(ParseError::UnknownObject(name, line)),
            }
        }

        match self.tokens.next() {
            None => Ok(scene),
            Some(Spanned { token, line }) => Err(ParseError::UnexpectedToken {
                expected: "end of file".into(),
                got: token,
                line,
            }),
        }
    }

    fn read_camera(&mut self) -> Result<Camera, ParseError> {
        self.read_keyword("camera")?;
        self.read_sep(Sep::BraceOpen)?;
        let at = self.read_value("at", Self::read_vector)?;
        let up = self.read_value("up", Self::read_vector)?;
        let viewport = self.read_value("viewport", Self::read_number)?;
        self.read_sep(Sep::BraceClose)?;

        self.scene_value(Camera::new(at, up, viewport))
    }

    fn read_point_light(&mut self) -> Result<Light, ParseError> {
        self.read_sep(Sep::BraceOpen)?;
        let position = self.read_value("position", Self::read_vector)?;
        let brightness = self.read_value("brightness", Self::read_number)?;
        self.read_sep(Sep::BraceClose)?;

        Ok(Point::new(position, brightness).into())
    }

    fn read_spot_light(&mut self) -> Result<Light, ParseError> {
        self.read_sep(Sep::BraceOpen)?;
        let position = self.read_value("position", Self::read_vector)?;
        let at = self.read_value("at", Self::read_vector)?;
        let brightness = self.read_value("brightness", Self::read_number)?;
        let spread = self.read_value("spread", Self::read_number)?;
        self.read_sep(Sep::BraceClose)?;

        self.scene_value(Spot::new(position, at, spread, brightness))
            .map(Light::from)
    }

    fn read_directed_light(&mut self) -> Result<Light, ParseError> {
        self.read_sep(Sep::BraceOpen)?;
        let at = self.read_value("at", Self::read_vector)?;
        let brightness = self.read_value("brightness", Self::read_number)?;
        self.read_sep(Sep::BraceClose)?;

        self.scene_value(Directed::new(at, brightness))
            .map(Light::from)
    }

    fn read_sphere(&mut self) -> Result<Object, ParseError> {
        self.read_sep(Sep::BraceOpen)?;
        let position = self.read_value("position", Self::read_vector)?;
        let radius = self.read_value("radius", Self::read_number)?;
        let material = self.read_material()?;
        self.read_sep(Sep::BraceClose)?;

        self.scene_value(Sphere::new(position, radius, material))
            .map(Object::from)
    }

    /// Read a material block. `color` and `diffuse` are required, the
    /// remaining keys may follow in any order.
    fn read_material(&mut self) -> Result<Material, ParseError> {
        self.read_keyword("material")?;
        self.read_sep(Sep::BraceOpen)?;

        let mut material = Material::new(
            self.read_value("color", Self::read_color)?,
            self.read_value("diffuse", Self::read_number)?,
        );

        loop {
            let (key, line) = match self.next_expecting("a material property or '}'")? {
                Spanned {
                    token: Token::Identifier(key),
                    line,
                } => (key, line),
                Spanned {
                    token: Token::Sep(Sep::BraceClose),
                    ..
                } => break,
                Spanned { token, line } => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "a material property or '}'".into(),
                        got: token,
                        line,
                    })
                }
            };

            self.read_expecting(Token::Assign)?;
            match key.as_str() {
                "specular" => material.specular = self.read_number()?,
                "shininess" => material.shininess = self.read_number()?.round() as i32,
                "reflectiveness" => material.reflectiveness = self.read_number()?,
                _ => return Err(ParseError::UnknownProperty(key, line)),
            }
        }

        Ok(material)
    }

    /// Read `key = value`, with the value read by `value`.
    fn read_value<T, F>(&mut self, key: &str, value: F) -> Result<T, ParseError>
    where
        F: Fn(&mut Self) -> Result<T, ParseError>,
    {
        self.read_keyword(key)?;
        self.read_expecting(Token::Assign)?;
        value(self)
    }

    fn read_number(&mut self) -> Result<f64, ParseError> {
        match self.next_expecting("a number")? {
            Spanned {
                token: Token::Number(n),
                ..
            } => Ok(n),
            Spanned { token, line } => Err(ParseError::UnexpectedToken {
                expected: "a number".into(),
                got: token,
                line,
            }),
        }
    }

    fn read_vector(&mut self) -> Result<Vector3, ParseError> {
        Ok(Vector3::new(
            self.read_number()?,
            self.read_number()?,
            self.read_number()?,
        ))
    }

    fn read_color(&mut self) -> Result<Color, ParseError> {
        Ok(Color::new(
            self.read_number()?,
            self.read_number()?,
            self.read_number()?,
        ))
    }

    fn read_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        self.read_expecting(Token::Identifier(keyword.into()))
    }

    fn read_sep(&mut self, sep: Sep) -> Result<(), ParseError> {
        self.read_expecting(Token::Sep(sep))
    }

    /// Read from the token stream, expecting a token.
    /// Errors with `ParseError::UnexpectedToken` if any other token is received.
    fn read_expecting(&mut self, token: Token) -> Result<(), ParseError> {
        let expected = format!("'{}'", token);
        let got = self.next_expecting(&expected)?;
        if got.token == token {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected,
                got: got.token,
                line: got.line,
            })
        }
    }

    /// Advance the token stream, or error with `ParseError::UnexpectedEof`.
    fn next_expecting(&mut self, expected: &str) -> Result<Spanned, ParseError> {
        let next = self
            .tokens
            .next()
            .ok_or_else(|| ParseError::UnexpectedEof(expected.into()))?;
        self.line = next.line;
        Ok(next)
    }

    /// Attach the current line to a scene validation failure.
    fn scene_value<T>(&self, value: Result<T, SceneError>) -> Result<T, ParseError> {
        value.map_err(|source| ParseError::InvalidScene {
            line: self.line,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use raycaster::object::Intersect;

    use super::*;

    const TEST_SCENE: &str = include_str!("../scenes/test.scene");

    fn parse(src: &str) -> Result<Scene, ParseError> {
        read_scene(Cursor::new(src))
    }

    #[test]
    fn reads_the_test_scene() {
        let scene = parse(TEST_SCENE).unwrap();

        assert_eq!(scene.background, Color::new(0.5, 0.5, 0.5));
        assert_eq!(scene.ambient, 0.1);
        assert_eq!(scene.camera.direction(), Vector3::unit_x());
        assert_eq!(scene.camera.up(), Vector3::unit_z());
        assert_eq!(scene.camera.fov(), 1.57);

        assert_eq!(scene.lights.len(), 3);
        assert!(matches!(scene.lights[0], Light::Point(_)));
        assert_eq!(scene.lights[0].brightness(), 100.);
        match &scene.lights[1] {
            Light::Spot(spot) => {
                assert_eq!(spot.direction, -Vector3::unit_z());
                assert_eq!(spot.spread, 0.5);
            }
            other => panic!("expected a spot light, got {:?}", other),
        }
        assert!(matches!(scene.lights[2], Light::Directed(_)));

        assert_eq!(scene.objects.len(), 2);
        let material = scene.objects[1].material();
        assert_eq!(material.color, Color::new(0.2, 0.2, 1.));
        assert_eq!(material.diffuse, 0.7);
        assert_eq!(material.specular, 0.5);
        assert_eq!(material.shininess, 16);
        assert_eq!(material.reflectiveness, 0.25);
    }

    #[test]
    fn minimal_scene_has_no_lights_or_objects() {
        let scene = parse(
            "scene { background = 0 1 0 ambientBrightness = 0 \
             camera { at = 0 0 -1 up = 0 1 0 viewport = 1 } }",
        )
        .unwrap();

        assert!(scene.lights.is_empty());
        assert!(scene.objects.is_empty());
        assert_eq!(scene.background, Color::green());
    }

    #[test]
    fn parsed_spheres_are_intersectable() {
        let scene = parse(TEST_SCENE).unwrap();
        let ray = raycaster::math::Ray::new(Vector3::zero(), Vector3::unit_x());
        let hit = scene.objects[0].intersect(&ray).unwrap();
        assert_eq!(hit.t, 7.);
    }

    #[test]
    fn keys_must_come_in_order() {
        let err = parse(
            "scene { ambientBrightness = 0 background = 0 0 0 \
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 } }",
        )
        .unwrap_err();

        match err {
            ParseError::UnexpectedToken { expected, got, line } => {
                assert_eq!(expected, "'background'");
                assert_eq!(got, Token::Identifier("ambientBrightness".into()));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_objects_are_reported() {
        let err = parse(
            "scene { background = 0 0 0 ambientBrightness = 0\n\
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 }\n\
             cube { }\n}",
        )
        .unwrap_err();

        assert!(matches!(err, ParseError::UnknownObject(ref name, 3) if name == "cube"));
    }

    #[test]
    fn unknown_material_properties_are_reported() {
        let err = parse(
            "scene { background = 0 0 0 ambientBrightness = 0\n\
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 }\n\
             sphere { position = 0 0 0 radius = 1\n\
             material { color = 1 1 1 diffuse = 1 roughness = 0.5 } } }",
        )
        .unwrap_err();

        assert!(
            matches!(err, ParseError::UnknownProperty(ref key, 4) if key == "roughness"),
            "{:?}",
            err
        );
    }

    #[test]
    fn out_of_range_material_is_rejected() {
        let err = parse(
            "scene { background = 1 1 1 ambientBrightness = 1 \
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 } \
             sphere { position = 5 0 0 radius = 1 \
             material { color = 1 1 1 diffuse = 1 reflectiveness = 2 } } }",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::InvalidScene {
                source: SceneError::InvalidMaterial("reflectiveness", _),
                ..
            }
        ));

        let err = parse(
            "scene { background = 1 1 1 ambientBrightness = 1 \
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 } \
             sphere { position = 5 0 0 radius = 1 \
             material { color = 1 1 1 diffuse = 1 shininess = -3 } } }",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::InvalidScene {
                source: SceneError::InvalidMaterial("shininess", _),
                ..
            }
        ));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let err = parse("scene { background = 0 0").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse(
            "scene { background = 0 0 0 ambientBrightness = 0 \
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 } } extra",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn invalid_geometry_is_caught_with_its_line() {
        let err = parse(
            "scene { background = 0 0 0 ambientBrightness = 0\n\
             camera { at = 1 0 0 up = 2 0 0 viewport = 1 }\n}",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidScene {
                line: 2,
                source: SceneError::ParallelCameraAxes
            }
        ));

        let err = parse(
            "scene { background = 0 0 0 ambientBrightness = 0 \
             camera { at = 1 0 0 up = 0 0 1 viewport = 1 }\n\
             sphere { position = 0 0 0 radius = -1 material { color = 1 1 1 diffuse = 1 } } }",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidScene { .. }));
    }
}
