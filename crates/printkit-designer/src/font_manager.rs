//! Font resolution for text objects.
//!
//! Families come from a fixed, enumerated set rather than arbitrary
//! user-supplied font sources. Each (family, bold, italic) combination is
//! resolved against the system font database once and cached; when no
//! matching face is installed the engine falls back to synthetic metrics
//! so layout and export stay deterministic on headless hosts.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{Font, Scale};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    sync::{Mutex, OnceLock},
};
use tracing::debug;

/// The selectable font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Arial,
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
    Georgia,
    Verdana,
    Impact,
    #[serde(rename = "Comic Sans MS")]
    ComicSansMs,
}

impl FontFamily {
    /// All selectable families, in menu order.
    pub const ALL: [FontFamily; 8] = [
        FontFamily::Arial,
        FontFamily::Helvetica,
        FontFamily::TimesNewRoman,
        FontFamily::CourierNew,
        FontFamily::Georgia,
        FontFamily::Verdana,
        FontFamily::Impact,
        FontFamily::ComicSansMs,
    ];

    /// Display name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Georgia => "Georgia",
            FontFamily::Verdana => "Verdana",
            FontFamily::Impact => "Impact",
            FontFamily::ComicSansMs => "Comic Sans MS",
        }
    }

    /// Generic fallback class used when the named face is not installed.
    fn generic_family(&self) -> Family<'static> {
        match self {
            FontFamily::TimesNewRoman | FontFamily::Georgia => Family::Serif,
            FontFamily::CourierNew => Family::Monospace,
            _ => Family::SansSerif,
        }
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved face: a real system font, or synthetic metrics when none
/// matched the query.
#[derive(Clone, Copy)]
pub enum ResolvedFont {
    System(&'static Font<'static>),
    Metric,
}

// Synthetic metric factors, chosen to approximate common sans faces.
const METRIC_ADVANCE: f64 = 0.6;
const METRIC_ASCENT: f64 = 0.8;
const METRIC_DESCENT: f64 = 0.2;

impl ResolvedFont {
    /// Horizontal advance of `ch` at `size`.
    pub fn advance(&self, ch: char, size: f64) -> f64 {
        match self {
            ResolvedFont::System(font) => {
                let scaled = font.glyph(ch).scaled(Scale::uniform(size as f32));
                scaled.h_metrics().advance_width as f64
            }
            ResolvedFont::Metric => size * METRIC_ADVANCE,
        }
    }

    /// Ascent above the baseline at `size`.
    pub fn ascent(&self, size: f64) -> f64 {
        match self {
            ResolvedFont::System(font) => font.v_metrics(Scale::uniform(size as f32)).ascent as f64,
            ResolvedFont::Metric => size * METRIC_ASCENT,
        }
    }

    /// Descent below the baseline at `size`, as a positive number.
    pub fn descent(&self, size: f64) -> f64 {
        match self {
            ResolvedFont::System(font) => {
                -(font.v_metrics(Scale::uniform(size as f32)).descent as f64)
            }
            ResolvedFont::Metric => size * METRIC_DESCENT,
        }
    }

    /// Total advance of a string at `size`.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }

    /// The underlying system font, when one resolved.
    pub fn system(&self) -> Option<&'static Font<'static>> {
        match self {
            ResolvedFont::System(font) => Some(font),
            ResolvedFont::Metric => None,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: FontFamily,
    bold: bool,
    italic: bool,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// Resolves a family/weight/style combination, caching the result.
pub fn resolve(family: FontFamily, bold: bool, italic: bool) -> ResolvedFont {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family,
        bold,
        italic,
    };

    if let Some(cached) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return match *cached {
            Some(font) => ResolvedFont::System(font),
            None => ResolvedFont::Metric,
        };
    }

    let loaded = load_from_system(family, bold, italic);
    let entry: Option<&'static Font<'static>> = loaded.map(|font| {
        let leaked: &'static Font<'static> = Box::leak(Box::new(font));
        leaked
    });
    if entry.is_none() {
        debug!(family = %family, bold, italic, "no system face matched, using metric fallback");
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, entry);

    match entry {
        Some(font) => ResolvedFont::System(font),
        None => ResolvedFont::Metric,
    }
}

fn load_from_system(family: FontFamily, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families = [Family::Name(family.name()), family.generic_family()];

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}
