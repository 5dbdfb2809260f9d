//! CSS value parsing for the handful of properties the editors read back
//! from the host: pixel lengths, resolved grid track lists and inline
//! `style` declarations.
//!
//! Built on `winnow` 0.7. Everything here is lenient in the way the
//! browser's own `parseFloat` is lenient, except track lists: a track list
//! that is not fully pixel-resolved is rejected instead of guessed.

use smallvec::SmallVec;
use std::fmt;
use winnow::ascii::{float, multispace0};
use winnow::combinator::{opt, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_till;

/// Resolved track sizes in pixels, in track order.
pub type TrackList = SmallVec<[f32; 8]>;

/// Why a track list could not be used for drag math.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackListError {
    /// `none`, or an empty string: the element defines no explicit tracks.
    Empty,
    /// A track expressed as something other than `<number>px`
    /// (`1fr`, `auto`, `minmax(...)`, named lines, percentages).
    Unresolved(String),
}

impl fmt::Display for TrackListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackListError::Empty => write!(f, "no explicit tracks"),
            TrackListError::Unresolved(token) => write!(f, "track `{token}` is not a pixel size"),
        }
    }
}

impl std::error::Error for TrackListError {}

fn number(input: &mut &str) -> ModalResult<f32> {
    let _ = multispace0.parse_next(input)?;
    float.parse_next(input)
}

/// Leading numeric value of a CSS string (`"12.5px"` → `12.5`).
///
/// Mirrors `parseFloat`: trailing units or garbage are ignored, a string
/// that does not start with a number yields `None`.
pub fn parse_px(value: &str) -> Option<f32> {
    let mut input = value;
    number
        .parse_next(&mut input)
        .ok()
        .filter(|v: &f32| v.is_finite())
}

/// Parse a `<number>px` token exactly.
fn px_token(input: &mut &str) -> ModalResult<f32> {
    terminated(float, "px").parse_next(input)
}

/// Parse a computed `grid-template-columns` / `grid-template-rows` value.
pub fn parse_track_list(value: &str) -> Result<TrackList, TrackListError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "none" {
        return Err(TrackListError::Empty);
    }

    let mut tracks = TrackList::new();
    for token in trimmed.split_whitespace() {
        let size = px_token
            .parse(token)
            .map_err(|_| TrackListError::Unresolved(token.to_string()))?;
        if !size.is_finite() || size < 0.0 {
            return Err(TrackListError::Unresolved(token.to_string()));
        }
        tracks.push(size);
    }
    Ok(tracks)
}

/// Format a pixel length the way the editors write it back (`"120px"`,
/// `"12.5px"`).
pub fn format_px(value: f32) -> String {
    format!("{}px", trim_float(value))
}

/// Format a percentage (`"33.333332%"`).
pub fn format_percent(value: f32) -> String {
    format!("{}%", trim_float(value))
}

fn trim_float(value: f32) -> f32 {
    // Avoid "-0px".
    if value == 0.0 { 0.0 } else { value }
}

/// Format a whole track list as an explicit `grid-template-*` override.
pub fn format_track_list(tracks: &[f32]) -> String {
    tracks
        .iter()
        .map(|t| format_px(*t))
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Inline style declarations ───────────────────────────────────────────

fn declaration<'a>(input: &mut &'a str) -> ModalResult<Option<(&'a str, &'a str)>> {
    let _ = multispace0.parse_next(input)?;
    let name = take_till(0.., |c| c == ':' || c == ';').parse_next(input)?;
    let has_colon = opt(':').parse_next(input)?.is_some();
    let value = if has_colon {
        take_till(0.., ';').parse_next(input)?
    } else {
        ""
    };
    let _ = opt(';').parse_next(input)?;

    let name = name.trim();
    if name.is_empty() || !has_colon {
        return Ok(None);
    }
    Ok(Some((name, value.trim())))
}

/// Split an inline `style` attribute into ordered `(property, value)` pairs.
/// Property names are lowercased; later duplicates replace earlier ones.
pub fn parse_style_attribute(value: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let mut input = value;
    while !input.trim().is_empty() {
        let before = input.len();
        match declaration.parse_next(&mut input) {
            Ok(Some((name, val))) => {
                let name = name.to_ascii_lowercase();
                if let Some(slot) = out.iter_mut().find(|(n, _)| *n == name) {
                    slot.1 = val.to_string();
                } else {
                    out.push((name, val.to_string()));
                }
            }
            Ok(None) => {}
            Err(_) => break,
        }
        if input.len() == before {
            break;
        }
    }
    out
}

/// Join declarations back into a `style` attribute value.
pub fn format_style_attribute(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a `class` attribute into its tokens.
pub fn class_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_ascii_whitespace()
}

/// Consume optional whitespace (concrete error type avoids inference issues).
pub(crate) fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = multispace0.parse_next(input);
}
