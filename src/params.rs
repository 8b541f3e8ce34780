//! Request parameter parsing for the image surfaces
//!
//! Absent or empty parameters take their defaults under every policy. A
//! present but malformed value is rejected under [`ParamPolicy::Strict`] and
//! replaced by the default under [`ParamPolicy::Lenient`].

use chrono::NaiveDateTime;
use log::warn;

use crate::config::{ParamPolicy, ServiceConfig};
use crate::layout::parse_reference_date;
use crate::rendering::{OutputFormat, Theme};
use crate::{Canvas, Error, Result};

/// Fully resolved inputs for one render request.
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub now: NaiveDateTime,
    pub canvas: Canvas,
    pub format: OutputFormat,
    pub theme: Theme,
}

#[derive(Debug, Default)]
struct RawParams<'a> {
    width: Option<&'a str>,
    height: Option<&'a str>,
    date: Option<&'a str>,
    format: Option<&'a str>,
    theme: Option<&'a str>,
}

fn resolve<T>(
    name: &str,
    raw: Option<&str>,
    default: T,
    policy: ParamPolicy,
    parse: impl FnOnce(&str) -> Result<T>,
) -> Result<T> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(v) => v,
    };
    match parse(raw) {
        Ok(v) => Ok(v),
        Err(err) if policy == ParamPolicy::Lenient => {
            warn!("ignoring invalid `{name}` parameter {raw:?}: {err}");
            Ok(default)
        }
        Err(err) => Err(err),
    }
}

/// `other` is the opposite axis, reported alongside an out-of-range value.
fn parse_dimension(name: &str, raw: &str, max: u32, other: u32) -> Result<u32> {
    let value: i64 = raw
        .parse()
        .map_err(|_| Error::InvalidParameter { name: name.to_string(), value: raw.to_string() })?;
    if value <= 0 || value > max as i64 {
        let (v, o) = (value as f64, other as f64);
        return Err(if name == "width" {
            Error::InvalidCanvasSize { width: v, height: o }
        } else {
            Error::InvalidCanvasSize { width: o, height: v }
        });
    }
    Ok(value as u32)
}

impl RenderParams {
    /// Resolve parameters from decoded `(key, value)` pairs.
    ///
    /// `now` is the fallback reference instant when no `date` is given; the
    /// first occurrence of a repeated key wins and unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I, config: &ServiceConfig, now: NaiveDateTime) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw = RawParams::default();
        for (key, value) in pairs {
            let slot = match key {
                "width" | "w" => &mut raw.width,
                "height" | "h" => &mut raw.height,
                "date" => &mut raw.date,
                "format" => &mut raw.format,
                "theme" => &mut raw.theme,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        let policy = config.param_policy;
        let max = config.max_dimension;
        let defaults = config.default_canvas;

        let width = resolve("width", raw.width, defaults.width, policy, |s| {
            parse_dimension("width", s, max, defaults.height)
        })?;
        let height = resolve("height", raw.height, defaults.height, policy, |s| {
            parse_dimension("height", s, max, width)
        })?;
        let now = resolve("date", raw.date, now, policy, parse_reference_date)?;
        let format = resolve("format", raw.format, OutputFormat::default(), policy, str::parse::<OutputFormat>)?;
        let theme = resolve("theme", raw.theme, config.theme.clone(), policy, |s| {
            Theme::by_name(s)
                .ok_or_else(|| Error::InvalidParameter { name: "theme".into(), value: s.to_string() })
        })?;

        Ok(Self { now, canvas: Canvas { width, height }, format, theme })
    }

    /// Resolve parameters from a raw, percent-encoded query string.
    #[cfg(feature = "server")]
    pub fn from_query(query: &str, config: &ServiceConfig, now: NaiveDateTime) -> Result<Self> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())), config, now)
    }
}
