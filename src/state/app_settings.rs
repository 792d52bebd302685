use log::LevelFilter;
use shortlist_engine::ByePolicy;
use std::path::PathBuf;
use std::str::FromStr;

/// Size of the shortlist when nothing else is configured.
pub const DEFAULT_TARGET_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub target_size: usize,
    pub bye_policy: ByePolicy,
    /// Entries file to pre-load; the tournament starts right away when set.
    pub entries_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            target_size: DEFAULT_TARGET_SIZE,
            bye_policy: ByePolicy::Manual,
            entries_path: None,
        }
    }
}

impl AppSettings {
    /// Defaults, overridden by `SHORTLIST_*` environment variables. CLI flags
    /// are applied on top of this in `main`.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(target) = var("SHORTLIST_TARGET").and_then(|v| parse_target(&v).ok()) {
            settings.target_size = target;
        }
        if let Some(flag) = var("SHORTLIST_AUTO_BYE") {
            settings.bye_policy = if is_truthy(&flag) { ByePolicy::Auto } else { ByePolicy::Manual };
        }
        if let Some(level) = var("SHORTLIST_LOG") {
            settings.log_level = LevelFilter::from_str(level.trim()).ok();
        }
        if let Some(path) = var("SHORTLIST_FILE") {
            settings.entries_path = Some(PathBuf::from(path.trim()));
        }
        settings
    }
}

pub fn parse_target(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("target size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid target size {raw:?}: {e}")),
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = settings_from(&[]);
        assert_eq!(settings.target_size, DEFAULT_TARGET_SIZE);
        assert_eq!(settings.bye_policy, ByePolicy::Manual);
        assert!(settings.log_level.is_none());
        assert!(settings.entries_path.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = settings_from(&[
            ("SHORTLIST_TARGET", "5"),
            ("SHORTLIST_AUTO_BYE", "Yes"),
            ("SHORTLIST_LOG", "debug"),
            ("SHORTLIST_FILE", "albums.txt"),
        ]);
        assert_eq!(settings.target_size, 5);
        assert_eq!(settings.bye_policy, ByePolicy::Auto);
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert_eq!(settings.entries_path, Some(PathBuf::from("albums.txt")));
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let settings = settings_from(&[
            ("SHORTLIST_TARGET", "0"),
            ("SHORTLIST_AUTO_BYE", "nope"),
            ("SHORTLIST_LOG", "loud"),
            ("SHORTLIST_FILE", "   "),
        ]);
        assert_eq!(settings.target_size, DEFAULT_TARGET_SIZE);
        assert_eq!(settings.bye_policy, ByePolicy::Manual);
        assert!(settings.log_level.is_none());
        assert!(settings.entries_path.is_none());
    }

    #[test]
    fn target_parsing() {
        assert_eq!(parse_target(" 12 "), Ok(12));
        assert!(parse_target("0").is_err());
        assert!(parse_target("-3").is_err());
        assert!(parse_target("ten").is_err());
    }
}
