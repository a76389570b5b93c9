//! Light listing loader
//!
//! A listing is a sequence of 5-line records:
//!
//! ```text
//! <name>
//! <intensity>
//! <color index>
//! <true|false>
//! <ignored>
//! ```
//!
//! The trailing line of the last record may be omitted.

use std::{borrow::Cow, convert::TryFrom, num::ParseIntError, path::Path, str::FromStr};

use thiserror::Error;

use crate::models::{Light, LightColor, UnknownColorIndex};

/// Listing used when no file is configured
pub const BUILTIN_LISTING: &str = include_str!("../resources/lights.txt");

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("the listing does not contain any light")]
    Empty,
    #[error("light #{record}: missing {field}, the listing ends mid-record")]
    Truncated { record: usize, field: &'static str },
    #[error("light #{record}: invalid integer for {field} on line {line}: {source}")]
    InvalidInteger {
        record: usize,
        line: usize,
        field: &'static str,
        source: ParseIntError,
    },
    #[error("light #{record}: {source}")]
    UnknownColor {
        record: usize,
        source: UnknownColorIndex,
    },
}

struct RecordLines<'a> {
    inner: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    record: usize,
}

impl<'a> RecordLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate().peekable(),
            record: 0,
        }
    }

    fn has_more(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    /// Next line of the current record, with its 1-based line number
    fn field(&mut self, field: &'static str) -> Result<(usize, &'a str), ListingError> {
        let record = self.record;
        self.inner
            .next()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .ok_or(ListingError::Truncated { record, field })
    }

    fn integer<T>(&mut self, field: &'static str) -> Result<T, ListingError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        let record = self.record;
        let (line, text) = self.field(field)?;

        text.trim()
            .parse()
            .map_err(|source| ListingError::InvalidInteger {
                record,
                line,
                field,
                source,
            })
    }

    fn light(&mut self) -> Result<Light, ListingError> {
        let record = self.record;

        let (_, name) = self.field("name")?;

        // Percentages are not range-checked, anything fitting an i32 loads
        let intensity = self.integer::<i32>("intensity")?;

        let color = LightColor::try_from(self.integer::<i64>("color index")?)
            .map_err(|source| ListingError::UnknownColor { record, source })?;

        let (_, is_on) = self.field("on/off state")?;
        let is_on = is_on.eq_ignore_ascii_case("true");

        // Record separator
        self.inner.next();

        Ok(Light::new(name, intensity, color, is_on))
    }
}

/// Parse a listing into lights, in file order
pub fn parse(text: &str) -> Result<Vec<Light>, ListingError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = RecordLines::new(text);
    let mut lights = Vec::new();

    while lines.has_more() {
        lines.record = lights.len() + 1;
        lights.push(lines.light()?);
    }

    if lights.is_empty() {
        return Err(ListingError::Empty);
    }

    Ok(lights)
}

/// Decode raw listing bytes
///
/// Invalid UTF-8 is replaced rather than rejected, names may end up garbled.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(error) => {
            warn!(error = %error, "light listing is not valid UTF-8");
            String::from_utf8_lossy(bytes)
        }
    }
}

pub fn load_file(path: &Path) -> Result<Vec<Light>, ListingError> {
    let bytes = std::fs::read(path)?;
    let lights = parse(&decode(&bytes))?;

    debug!(path = %path.display(), count = lights.len(), "loaded lights");
    Ok(lights)
}

/// Load the given listing file, or the built-in listing if there is none
pub fn load(path: Option<&Path>) -> Result<Vec<Light>, ListingError> {
    match path {
        Some(path) => load_file(path),
        None => {
            let lights = parse(BUILTIN_LISTING)?;
            debug!(count = lights.len(), "loaded built-in lights");
            Ok(lights)
        }
    }
}
