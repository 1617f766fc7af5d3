use std::path::PathBuf;

use anyhow::{bail, Context};

/// Checker configuration loaded from environment variables.
///
/// | Env Var          | Default | Meaning                                    |
/// |------------------|---------|--------------------------------------------|
/// | `LINGSHU_INPUT`  | (stdin) | Path of the JSON request file; a path      |
/// |                  |         | given as the first argument wins           |
/// | `LINGSHU_STRICT` | `false` | Fail when any field error is recorded      |
/// | `LINGSHU_PRETTY` | `false` | Pretty-print the JSON result               |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub input: Option<PathBuf>,
    pub strict: bool,
    pub pretty: bool,
}

impl CliConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = lookup("LINGSHU_INPUT")
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let strict = parse_flag(lookup("LINGSHU_STRICT").as_deref())
            .context("LINGSHU_STRICT must be a boolean")?;
        let pretty = parse_flag(lookup("LINGSHU_PRETTY").as_deref())
            .context("LINGSHU_PRETTY must be a boolean")?;

        Ok(Self {
            input,
            strict,
            pretty,
        })
    }

    /// A path given on the command line takes precedence over `LINGSHU_INPUT`.
    pub fn with_input_arg(mut self, arg: Option<PathBuf>) -> Self {
        if arg.is_some() {
            self.input = arg;
        }
        self
    }
}

fn parse_flag(raw: Option<&str>) -> anyhow::Result<bool> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => bail!("unrecognized flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<CliConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]).unwrap(), CliConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = config(&[
            ("LINGSHU_INPUT", " request.json "),
            ("LINGSHU_STRICT", "TRUE"),
            ("LINGSHU_PRETTY", "1"),
        ])
        .unwrap();

        assert_eq!(cfg.input, Some(PathBuf::from("request.json")));
        assert!(cfg.strict);
        assert!(cfg.pretty);
    }

    #[test]
    fn input_argument_overrides_env() {
        let cfg = config(&[("LINGSHU_INPUT", "env.json")]).unwrap();

        let kept = cfg.clone().with_input_arg(None);
        assert_eq!(kept.input, Some(PathBuf::from("env.json")));

        let overridden = cfg.with_input_arg(Some(PathBuf::from("arg.json")));
        assert_eq!(overridden.input, Some(PathBuf::from("arg.json")));
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let err = config(&[("LINGSHU_STRICT", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("LINGSHU_STRICT"));
    }
}
