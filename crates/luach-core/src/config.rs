use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

const RC_ENV_VAR: &str = "LUACHRC";
const RC_FILE_NAME: &str = ".luachrc";

#[derive(Debug, Clone)]
pub struct Config {
  map:              HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    map.insert(
      "default.command".to_string(),
      "page".to_string()
    );
    map.insert(
      "color".to_string(),
      "on".to_string()
    );
    map.insert(
      "language".to_string(),
      "bilingual".to_string()
    );
    map.insert(
      "multipanel".to_string(),
      "off".to_string()
    );

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(
      rc_override
    )?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading luachrc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no luachrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  /// A yes/no setting; values other than the usual on/off words are rejected.
  pub fn get_bool(
    &self,
    key: &str
  ) -> anyhow::Result<Option<bool>> {
    self
      .map
      .get(key)
      .map(|v| {
        parse_bool(v).ok_or_else(|| {
          anyhow!(
            "invalid {key} setting: {}",
            v.trim()
          )
        })
      })
      .transpose()
  }

  /// A configured path with `~/` expanded.
  pub fn get_path(
    &self,
    key: &str
  ) -> Option<PathBuf> {
    self
      .map
      .get(key)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
      .map(|v| expand_tilde(Path::new(v)))
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if self
          .loaded_files
          .contains(&include_path)
        {
          warn!(include = %include_path.display(), "include already loaded; skipping");
        } else if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

/// Picks the feed file from the command line or `feed.location`.
#[tracing::instrument(skip(
  cfg,
  override_path
))]
pub fn resolve_feed_path(
  cfg: &Config,
  override_path: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let path = if let Some(path) =
    override_path
  {
    expand_tilde(path)
  } else if let Some(cfg_path) =
    cfg.get_path("feed.location")
  {
    cfg_path
  } else {
    return Err(anyhow!(
      "no calendar feed given; pass \
       --feed or set feed.location"
    ));
  };

  if !path.exists() {
    return Err(anyhow!(
      "calendar feed {} does not \
       exist",
      path.display()
    ));
  }

  Ok(path)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var(RC_ENV_VAR)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping luachrc"
    );
    return Ok(None);
  };
  let candidate =
    home.join(RC_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on" | "true" => {
      Some(true)
    }
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use super::{
    Config,
    parse_bool
  };

  #[test]
  fn defaults_render_bilingual_page() {
    let cfg = Config::default();
    assert_eq!(
      cfg
        .get("default.command")
        .as_deref(),
      Some("page")
    );
    assert_eq!(
      cfg.get("language").as_deref(),
      Some("bilingual")
    );
    assert_eq!(
      cfg
        .get_bool("multipanel")
        .expect("multipanel flag"),
      Some(false)
    );
    assert_eq!(
      cfg.get_path("feed.location"),
      None
    );
  }

  #[test]
  fn overrides_drop_rc_prefix() {
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "rc.color".to_string(),
      "off".to_string()
    )]);
    assert_eq!(
      cfg
        .get_bool("color")
        .expect("color flag"),
      Some(false)
    );
  }

  #[test]
  fn parses_bool_words() {
    assert_eq!(
      parse_bool(" Yes "),
      Some(true)
    );
    assert_eq!(
      parse_bool("1"),
      Some(true)
    );
    assert_eq!(
      parse_bool("off"),
      Some(false)
    );
    assert_eq!(
      parse_bool("maybe"),
      None
    );
  }

  #[test]
  fn rejects_unknown_flag_words() {
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "multipanel".to_string(),
      "maybe".to_string()
    )]);
    let err = cfg
      .get_bool("multipanel")
      .expect_err("maybe is not a flag");
    assert_eq!(
      err.to_string(),
      "invalid multipanel setting: maybe"
    );
    assert_eq!(
      cfg
        .get_bool("no.such.key")
        .expect("absent key"),
      None
    );
  }
}
