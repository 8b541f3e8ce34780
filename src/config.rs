//! Service configuration

use crate::rendering::Theme;

/// How malformed request parameters are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamPolicy {
    /// Present-but-invalid values are rejected with a client error
    #[default]
    Strict,
    /// Invalid values fall back to defaults, with a warning in the log
    Lenient,
}

/// Configuration for the HTTP surfaces
///
/// Defaults are conservative: strict parameter checking, loopback binding,
/// and a cap on image dimensions so a single request cannot allocate an
/// arbitrarily large raster.
///
/// # Examples
///
/// ```
/// let cfg = yeardots::ServiceConfig::default();
/// assert_eq!(cfg.param_policy, yeardots::ParamPolicy::Strict);
/// assert_eq!(cfg.default_canvas.width, 390);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on
    pub bind: String,
    /// Number of request-handling threads
    pub workers: usize,
    /// Treatment of malformed query parameters
    pub param_policy: ParamPolicy,
    /// Largest accepted width or height in pixels
    pub max_dimension: u32,
    /// Canvas used when width/height are not given
    pub default_canvas: crate::Canvas,
    /// Theme used when the request does not name one
    pub theme: Theme,
    /// `Cache-Control: max-age` for image responses
    pub cache_max_age_secs: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            workers: num_cpus::get().max(1),
            param_policy: ParamPolicy::Strict,
            max_dimension: 4096,
            default_canvas: crate::Canvas::default(),
            theme: Theme::dark(),
            cache_max_age_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServiceConfig::default();
        assert!(cfg.workers >= 1);
        assert_eq!(cfg.max_dimension, 4096);
        assert_eq!(cfg.default_canvas.height, 844);
        assert_eq!(cfg.theme.name, "dark");
    }
}
