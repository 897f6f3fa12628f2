//! Named packing profiles stored in a YAML (or JSON) file.
//!
//! A profile bundles everything one atlas build needs: where to read images,
//! where to write pages, and the bin settings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use atlaspack_core::{BinPackConfig, Heuristic};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub directories: Vec<PathBuf>,
    pub output: PathBuf,
    /// Base name for `<name><page>.png` and `<name>.json`.
    pub name: String,
    /// Glob matched against file names.
    pub file_filter: String,
    pub include_subdirectories: bool,
    pub allow_rotation: bool,
    pub atlas_width: u32,
    pub atlas_height: u32,
    /// bssf | blsf | baf | bl | cp
    pub heuristic: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: "default".into(),
            directories: Vec::new(),
            output: PathBuf::from("out"),
            name: "Atlas".into(),
            file_filter: "*".into(),
            include_subdirectories: false,
            allow_rotation: true,
            atlas_width: 4096,
            atlas_height: 4096,
            heuristic: Heuristic::default().short_name().into(),
        }
    }
}

impl Profile {
    /// Bin settings of this profile.
    pub fn bin_config(&self) -> anyhow::Result<BinPackConfig> {
        let heuristic: Heuristic = self
            .heuristic
            .parse()
            .with_context(|| format!("profile '{}'", self.id))?;
        Ok(BinPackConfig::builder()
            .with_bin_size(self.atlas_width, self.atlas_height)
            .allow_rotation(self.allow_rotation)
            .heuristic(heuristic)
            .build())
    }
}

pub fn parse_profiles(text: &str) -> anyhow::Result<Vec<Profile>> {
    let profiles: Vec<Profile> = serde_yaml::from_str(text)?;
    Ok(profiles)
}

pub fn load_profiles(path: &Path) -> anyhow::Result<Vec<Profile>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read profiles {}", path.display()))?;
    parse_profiles(&text).with_context(|| format!("parse profiles {}", path.display()))
}

pub fn save_profiles(path: &Path, profiles: &[Profile]) -> anyhow::Result<()> {
    let text = serde_yaml::to_string(profiles)?;
    fs::write(path, text).with_context(|| format!("write profiles {}", path.display()))
}

/// Picks a profile by list index or by id. Numeric selectors are tried as an
/// index first, then as an id.
pub fn select<'a>(profiles: &'a [Profile], selector: &str) -> anyhow::Result<&'a Profile> {
    if let Ok(idx) = selector.parse::<usize>() {
        if let Some(p) = profiles.get(idx) {
            return Ok(p);
        }
    }
    profiles
        .iter()
        .find(|p| p.id == selector)
        .with_context(|| {
            format!(
                "no profile with id or index '{}' ({} profiles loaded)",
                selector,
                profiles.len()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
- id: ui
  directories: [assets/ui]
  output: build/ui
  name: UiAtlas
  file_filter: "*.png"
  include_subdirectories: true
  atlas_width: 1024
  atlas_height: 512
  heuristic: cp
- id: "7"
  allow_rotation: false
"#;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let profiles = parse_profiles(SAMPLE).expect("parse");
        assert_eq!(profiles.len(), 2);
        let ui = &profiles[0];
        assert_eq!(ui.name, "UiAtlas");
        assert!(ui.include_subdirectories);
        assert!(ui.allow_rotation);
        let cfg = ui.bin_config().expect("config");
        assert_eq!((cfg.bin_width, cfg.bin_height), (1024, 512));
        assert_eq!(cfg.heuristic, Heuristic::ContactPoint);

        let other = &profiles[1];
        assert_eq!(other.atlas_width, 4096);
        assert_eq!(other.file_filter, "*");
        assert!(!other.bin_config().expect("config").allow_rotation);
    }

    #[test]
    fn json_profiles_are_accepted() {
        let profiles =
            parse_profiles(r#"[{"id": "j", "atlas_width": 256, "atlas_height": 256}]"#)
                .expect("parse");
        assert_eq!(profiles[0].atlas_width, 256);
    }

    #[test]
    fn select_by_index_then_id() {
        let profiles = parse_profiles(SAMPLE).expect("parse");
        assert_eq!(select(&profiles, "0").expect("index").id, "ui");
        assert_eq!(select(&profiles, "ui").expect("id").id, "ui");
        // out-of-range index falls back to an id lookup
        assert_eq!(select(&profiles, "7").expect("id").id, "7");
        assert!(select(&profiles, "missing").is_err());
    }

    #[test]
    fn bad_heuristic_is_reported() {
        let p = Profile {
            heuristic: "skyline".into(),
            ..Default::default()
        };
        let err = p.bin_config().expect_err("must fail").to_string();
        assert!(err.contains("default"), "{err}");
    }
}
