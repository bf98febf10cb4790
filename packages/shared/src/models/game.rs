use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_GENRE: &str = "Misc";
pub const DEFAULT_YEAR: i64 = 0;
pub const DEFAULT_RATING: i64 = 0;

macro_rules! platforms {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Closed set of platforms a game can be catalogued under.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Platform {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Platform {
            pub const ALL: &'static [Platform] = &[$(Platform::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Platform::$variant => $name,)+
                }
            }
        }

        impl FromStr for Platform {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Platform::$variant),)+
                    other => Err(format!("'{}' is not a supported platform", other)),
                }
            }
        }
    };
}

platforms! {
    Nes => "NES",
    Snes => "Super Nintendo (SNES)",
    Nintendo64 => "Nintendo 64",
    GameCube => "GameCube",
    Wii => "Wii",
    WiiU => "Wii U",
    NintendoSwitch => "Nintendo Switch",
    GameBoy => "Game Boy",
    GameBoyColor => "Game Boy Color",
    GameBoyAdvance => "Game Boy Advance",
    NintendoDs => "Nintendo DS",
    Nintendo3ds => "Nintendo 3DS",
    PlayStation => "PlayStation",
    PlayStation2 => "PlayStation 2",
    PlayStation3 => "PlayStation 3",
    PlayStation4 => "PlayStation 4",
    PlayStation5 => "PlayStation 5",
    PlayStationPortable => "PlayStation Portable (PSP)",
    PlayStationVita => "PlayStation Vita",
    SegaGenesis => "Sega Genesis",
    SegaSaturn => "Sega Saturn",
    SegaDreamcast => "Sega Dreamcast",
    SegaMasterSystem => "Sega Master System",
    Atari2600 => "Atari 2600",
    Atari5200 => "Atari 5200",
    Atari7800 => "Atari 7800",
    AtariJaguar => "Atari Jaguar",
    NeoGeo => "Neo Geo",
    TurboGrafx16 => "TurboGrafx-16",
    PcEngine => "PC Engine",
    Commodore64 => "Commodore 64",
    MsDos => "MS-DOS",
    Arcade => "Arcade",
    Other => "Other",
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored catalog entry. `id` is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    pub genre: String,
    pub year: i64,
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl Game {
    pub fn new(id: i64, new_game: &NewGame) -> Self {
        Game {
            id,
            title: new_game.title.clone(),
            platform: new_game.platform,
            genre: new_game
                .genre
                .clone()
                .unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            year: new_game.year.unwrap_or(DEFAULT_YEAR),
            rating: new_game.rating.unwrap_or(DEFAULT_RATING),
            picture: new_game.picture.clone(),
        }
    }

    /// Overwrites every mutable field; omitted optionals fall back to their defaults.
    pub fn replace(&mut self, new_game: &NewGame) {
        *self = Game::new(self.id, new_game);
    }

    pub fn apply(&mut self, patch: &GamePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.clone();
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(picture) = &patch.picture {
            self.picture = picture.clone();
        }
    }
}

/// Body of a create or replace request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewGame {
    pub title: String,
    pub platform: Option<Platform>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<i64>,
    pub picture: Option<String>,
}

impl NewGame {
    pub fn new(title: &str, platform: Option<Platform>) -> Self {
        NewGame {
            title: title.to_string(),
            platform,
            ..Default::default()
        }
    }

    /// Validates a create body. Any `id` property is rejected.
    pub fn from_body(body: &Value) -> Result<Self, GameValidationError> {
        let fields = validate_body(body, BodyKind::Create)?;
        Ok(Self::from_fields(&fields))
    }

    /// Validates a replace body. An `id` is tolerated only when it matches the target.
    pub fn from_replace_body(id: i64, body: &Value) -> Result<Self, GameValidationError> {
        let fields = validate_body(body, BodyKind::Replace(id))?;
        Ok(Self::from_fields(&fields))
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        NewGame {
            title: text(fields, "title").unwrap_or_default(),
            platform: platform(fields).flatten(),
            genre: text(fields, "genre"),
            year: integer(fields, "year"),
            rating: integer(fields, "rating"),
            picture: text(fields, "picture"),
        }
    }
}

/// A partial update. Double options distinguish "leave as is" from "clear".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamePatch {
    pub title: Option<String>,
    pub platform: Option<Option<Platform>>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<i64>,
    pub picture: Option<Option<String>>,
}

impl GamePatch {
    /// Validates a patch body for a single record (`Some(id)`) or for a bulk update (`None`).
    pub fn from_body(id: Option<i64>, body: &Value) -> Result<Self, GameValidationError> {
        let fields = validate_body(body, BodyKind::Patch(id))?;
        Ok(GamePatch {
            title: text(&fields, "title"),
            platform: platform(&fields),
            genre: text(&fields, "genre"),
            year: integer(&fields, "year"),
            rating: integer(&fields, "rating"),
            picture: fields
                .get("picture")
                .map(|value| value.as_str().map(str::to_string)),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == GamePatch::default()
    }
}

fn text(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn integer(fields: &Map<String, Value>, name: &str) -> Option<i64> {
    fields.get(name).and_then(Value::as_i64)
}

fn platform(fields: &Map<String, Value>) -> Option<Option<Platform>> {
    fields
        .get("platform")
        .map(|value| value.as_str().and_then(|name| name.parse().ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Integer,
    Platform,
}

/// Declarative description of one Game property.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

pub const GAME_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "id",
        kind: FieldKind::Id,
        required: false,
        nullable: false,
    },
    FieldSpec {
        name: "title",
        kind: FieldKind::Text,
        required: true,
        nullable: false,
    },
    FieldSpec {
        name: "platform",
        kind: FieldKind::Platform,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "genre",
        kind: FieldKind::Text,
        required: false,
        nullable: false,
    },
    FieldSpec {
        name: "year",
        kind: FieldKind::Integer,
        required: false,
        nullable: false,
    },
    FieldSpec {
        name: "rating",
        kind: FieldKind::Integer,
        required: false,
        nullable: false,
    },
    FieldSpec {
        name: "picture",
        kind: FieldKind::Text,
        required: false,
        nullable: true,
    },
];

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    GAME_FIELDS.iter().find(|spec| spec.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Create,
    Replace(i64),
    /// `None` for bulk updates, where an `id` can never be supplied.
    Patch(Option<i64>),
}

/// Every constraint a body broke, in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct GameValidationError {
    pub details: Vec<String>,
}

impl fmt::Display for GameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The Game instance is not valid: {}", self.details.join("; "))
    }
}

impl std::error::Error for GameValidationError {}

/// Checks a JSON body against `GAME_FIELDS` and returns its properties.
pub fn validate_body(
    body: &Value,
    kind: BodyKind,
) -> Result<Map<String, Value>, GameValidationError> {
    let Some(fields) = body.as_object() else {
        return Err(GameValidationError {
            details: vec!["request body must be a JSON object".to_string()],
        });
    };

    let mut details = Vec::new();

    for name in fields.keys() {
        if field_spec(name).is_none() {
            details.push(format!("'{}' is not a known property", name));
        }
    }

    for spec in GAME_FIELDS {
        let value = fields.get(spec.name);
        let requires_value = spec.required && !is_patch(kind);

        match value {
            None if requires_value => details.push(format!("'{}' is required", spec.name)),
            None => {}
            Some(Value::Null) if spec.nullable => {}
            Some(value) => {
                if let Err(detail) = check_value(spec, value, kind) {
                    details.push(detail);
                }
            }
        }
    }

    if details.is_empty() {
        Ok(fields.clone())
    } else {
        Err(GameValidationError { details })
    }
}

fn is_patch(kind: BodyKind) -> bool {
    matches!(kind, BodyKind::Patch(_))
}

fn check_value(spec: &FieldSpec, value: &Value, kind: BodyKind) -> Result<(), String> {
    match spec.kind {
        FieldKind::Id => {
            let expected = match kind {
                BodyKind::Create | BodyKind::Patch(None) => {
                    return Err(format!("'{}' is generated and cannot be set", spec.name));
                }
                BodyKind::Replace(id) | BodyKind::Patch(Some(id)) => id,
            };
            match value.as_i64() {
                Some(id) if id == expected => Ok(()),
                _ => Err(format!("'{}' cannot be changed", spec.name)),
            }
        }
        FieldKind::Text => match value.as_str() {
            Some("") if spec.required => Err(format!("'{}' must not be empty", spec.name)),
            Some(_) => Ok(()),
            None => Err(format!("'{}' must be a string", spec.name)),
        },
        FieldKind::Integer => match value.as_i64() {
            Some(_) => Ok(()),
            None => Err(format!("'{}' must be an integer", spec.name)),
        },
        FieldKind::Platform => match value.as_str() {
            Some(name) => name.parse::<Platform>().map(|_| ()),
            None => Err(format!("'{}' must be a string", spec.name)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_game_fills_defaults() {
        let new_game = NewGame::from_body(&json!({
            "title": "Super Mario World",
            "platform": "Super Nintendo (SNES)"
        }))
        .unwrap();
        let game = Game::new(1, &new_game);

        assert_eq!(game.id, 1);
        assert_eq!(game.title, "Super Mario World");
        assert_eq!(game.platform, Some(Platform::Snes));
        assert_eq!(game.genre, "Misc");
        assert_eq!(game.year, 0);
        assert_eq!(game.rating, 0);
        assert_eq!(game.picture, None);
    }

    #[test]
    fn test_create_body_requires_title() {
        let err = NewGame::from_body(&json!({"platform": "NES"})).unwrap_err();
        assert_eq!(err.details, vec!["'title' is required".to_string()]);
    }

    #[test]
    fn test_create_body_rejects_empty_title() {
        let err = NewGame::from_body(&json!({"title": ""})).unwrap_err();
        assert_eq!(err.details, vec!["'title' must not be empty".to_string()]);
    }

    #[test]
    fn test_create_body_rejects_unknown_platform() {
        let err = NewGame::from_body(&json!({"title": "Doom", "platform": "Amiga"})).unwrap_err();
        assert_eq!(
            err.details,
            vec!["'Amiga' is not a supported platform".to_string()]
        );
    }

    #[test]
    fn test_create_body_rejects_id_and_unknown_properties() {
        let err = NewGame::from_body(&json!({"id": 4, "title": "Doom", "publisher": "id"}))
            .unwrap_err();
        assert_eq!(err.details.len(), 2);
        assert!(err.details[0].contains("publisher"));
        assert!(err.details[1].contains("generated"));
    }

    #[test]
    fn test_create_body_rejects_fractional_year() {
        let err = NewGame::from_body(&json!({"title": "Doom", "year": 1993.5})).unwrap_err();
        assert_eq!(err.details, vec!["'year' must be an integer".to_string()]);
    }

    #[test]
    fn test_create_body_must_be_an_object() {
        assert!(NewGame::from_body(&json!(["Doom"])).is_err());
    }

    #[test]
    fn test_replace_body_accepts_matching_id_only() {
        let body = json!({"id": 3, "title": "Metroid", "platform": "NES"});
        assert!(NewGame::from_replace_body(3, &body).is_ok());
        assert!(NewGame::from_replace_body(4, &body).is_err());
    }

    #[test]
    fn test_replace_resets_omitted_fields() {
        let mut game = Game::new(
            7,
            &NewGame {
                title: "Sonic".to_string(),
                platform: Some(Platform::SegaGenesis),
                genre: Some("Platformer".to_string()),
                year: Some(1991),
                rating: Some(9),
                picture: Some("https://example.com/sonic.png".to_string()),
            },
        );

        game.replace(&NewGame::new("Sonic 2", None));

        assert_eq!(game.id, 7);
        assert_eq!(game.title, "Sonic 2");
        assert_eq!(game.platform, None);
        assert_eq!(game.genre, DEFAULT_GENRE);
        assert_eq!(game.year, DEFAULT_YEAR);
        assert_eq!(game.picture, None);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut game = Game::new(2, &NewGame::new("Zelda", Some(Platform::Nes)));
        let patch = GamePatch::from_body(Some(2), &json!({"rating": 9, "picture": null})).unwrap();

        game.apply(&patch);

        assert_eq!(game.title, "Zelda");
        assert_eq!(game.platform, Some(Platform::Nes));
        assert_eq!(game.rating, 9);
        assert_eq!(game.picture, None);
    }

    #[test]
    fn test_patch_can_clear_platform() {
        let mut game = Game::new(2, &NewGame::new("Zelda", Some(Platform::Nes)));
        let patch = GamePatch::from_body(None, &json!({"platform": null})).unwrap();
        assert_eq!(patch.platform, Some(None));

        game.apply(&patch);
        assert_eq!(game.platform, None);
    }

    #[test]
    fn test_patch_does_not_require_title_but_rejects_empty_one() {
        assert!(GamePatch::from_body(None, &json!({"year": 1990})).is_ok());
        assert!(GamePatch::from_body(None, &json!({"title": ""})).is_err());
    }

    #[test]
    fn test_bulk_patch_rejects_id() {
        assert!(GamePatch::from_body(None, &json!({"id": 1})).is_err());
        assert!(GamePatch::from_body(Some(1), &json!({"id": 1})).is_ok());
    }

    #[test]
    fn test_empty_patch() {
        assert!(GamePatch::from_body(None, &json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_platform_wire_names() {
        assert_eq!(Platform::ALL.len(), 34);
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), *platform);
        }
        assert_eq!(
            serde_json::to_string(&Platform::PlayStationPortable).unwrap(),
            "\"PlayStation Portable (PSP)\""
        );
    }

    #[test]
    fn test_game_serialization_skips_unset_optionals() {
        let game = Game::new(1, &NewGame::new("Tetris", None));
        let value = serde_json::to_value(&game).unwrap();

        assert_eq!(
            value,
            json!({"id": 1, "title": "Tetris", "genre": "Misc", "year": 0, "rating": 0})
        );
    }
}
