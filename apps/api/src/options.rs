//! Render options parsed from the request's query string.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::errors::AppError;

pub const DEFAULT_CANVAS_HEIGHT: i64 = 630;
pub const DEFAULT_CANVAS_WIDTH: i64 = 1200;
pub const DEFAULT_PADDING: i64 = 200;
pub const DEFAULT_FONT_SIZE: i64 = 100;

/// Largest canvas side accepted, to keep a single request's pixmap bounded.
/// Also bounds padding and the starting font size: nothing larger can fit.
pub const MAX_CANVAS_SIDE: i64 = 8192;

pub const DEFAULT_TEXT: &str = "\
Accepted query params:
 
text(string): the text to be rendered
background(string): url of the background image
w(int): image width
h(int): image height
wpadding(int): width padding
hpadding(int): height padding
fontsize(int): initial font size
nowrap(boolean): prevent line wraps";

/// Everything a single render needs besides the font.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(skip)]
    pub text: String,
    pub background_url: Option<String>,
    #[serde(skip)]
    pub debug: bool,
    pub canvas_width: i64,
    pub canvas_height: i64,
    pub w_padding: i64,
    pub h_padding: i64,
    pub initial_font_size: i64,
    #[serde(rename = "nowrap")]
    pub no_wrap: bool,
}

impl RenderOptions {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let params = QueryParams(params);

        let background_url = Some(params.decoded(&["background"], "")?)
            .filter(|url| !url.is_empty());

        let options = RenderOptions {
            text: params.decoded(&["text"], DEFAULT_TEXT)?,
            background_url,
            debug: params.boolean(&["debug"], false),
            canvas_width: params.int(&["w", "width"], DEFAULT_CANVAS_WIDTH)?,
            canvas_height: params.int(&["h", "height"], DEFAULT_CANVAS_HEIGHT)?,
            w_padding: params.int(&["wpadding"], DEFAULT_PADDING)?,
            h_padding: params.int(&["hpadding"], DEFAULT_PADDING)?,
            initial_font_size: params.int(&["fontsize"], DEFAULT_FONT_SIZE)?,
            no_wrap: params.boolean(&["nowrap"], false),
        };

        for (name, value) in [
            ("w", options.canvas_width),
            ("h", options.canvas_height),
            ("fontsize", options.initial_font_size),
        ] {
            if !(1..=MAX_CANVAS_SIDE).contains(&value) {
                return Err(AppError::Validation(format!(
                    "{name} must be between 1 and {MAX_CANVAS_SIDE}, got {value}"
                )));
            }
        }
        for (name, value) in [("wpadding", options.w_padding), ("hpadding", options.h_padding)] {
            if !(-MAX_CANVAS_SIDE..=MAX_CANVAS_SIDE).contains(&value) {
                return Err(AppError::Validation(format!(
                    "{name} must be between -{MAX_CANVAS_SIDE} and {MAX_CANVAS_SIDE}, got {value}"
                )));
            }
        }

        Ok(options)
    }

    /// Width available to text once padding is removed.
    pub fn max_text_width(&self) -> f32 {
        (self.canvas_width - self.w_padding) as f32
    }

    /// Height available to text once padding is removed.
    pub fn max_text_height(&self) -> f32 {
        (self.canvas_height - self.h_padding) as f32
    }
}

/// Lookup helpers over raw query pairs. Names are tried in order and the first
/// present one wins.
struct QueryParams<'a>(&'a HashMap<String, String>);

impl QueryParams<'_> {
    fn lookup<'n>(&self, names: &[&'n str]) -> Option<(&'n str, &str)> {
        names
            .iter()
            .find_map(|name| self.0.get(*name).map(|v| (*name, v.as_str())))
    }

    fn string(&self, names: &[&str], default: &str) -> String {
        self.lookup(names)
            .map(|(_, value)| value)
            .unwrap_or(default)
            .to_string()
    }

    /// Query values are percent-decoded once more after form decoding, so
    /// `%2525` arrives as `%`. Sequences that decode to invalid UTF-8 are rejected.
    fn decoded(&self, names: &[&str], default: &str) -> Result<String, AppError> {
        let raw = self.string(names, default);
        percent_decode_str(&raw)
            .decode_utf8()
            .map(|value| value.into_owned())
            .map_err(|_| {
                AppError::Validation(format!("{} is not valid percent-encoded UTF-8", names[0]))
            })
    }

    fn int(&self, names: &[&str], default: i64) -> Result<i64, AppError> {
        match self.lookup(names) {
            Some((name, raw)) => raw.trim().parse::<i64>().map_err(|_| {
                AppError::Validation(format!("{name} must be an integer, got '{raw}'"))
            }),
            None => Ok(default),
        }
    }

    /// Only the literal strings `true` and `false` are recognized.
    fn boolean(&self, names: &[&str], default: bool) -> bool {
        match self.lookup(names).map(|(_, value)| value) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }
}
