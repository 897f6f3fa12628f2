use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use globset::{Glob, GlobMatcher};
use image::{ImageReader, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};
use walkdir::WalkDir;

/// One image file found under an input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Path relative to the input directory, `/`-separated.
    pub id: String,
    pub path: PathBuf,
}

/// Scans `dirs` for image files whose name matches `filter`.
///
/// Results are sorted by path within each directory so ids come out in a
/// stable order across platforms. Two directories yielding the same id is an
/// error naming both files.
pub fn gather_sources(
    dirs: &[PathBuf],
    filter: &str,
    recursive: bool,
) -> anyhow::Result<Vec<Source>> {
    let matcher = compile_filter(filter)?;
    let mut list: Vec<Source> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for dir in dirs {
        if !dir.is_dir() {
            bail!("input directory {} does not exist", dir.display());
        }
        let max_depth = if recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skip unreadable entry");
                    continue;
                }
            };
            let p = entry.path();
            if !entry.file_type().is_file() || !is_image(p) {
                continue;
            }
            let name_ok = p.file_name().is_some_and(|n| matcher.is_match(n));
            if !name_ok {
                continue;
            }
            let id = relative_id(dir, p)?;
            if let Some(&first) = seen.get(&id) {
                bail!(
                    "image id '{id}' is produced by both {} and {}; rename one or pack the directories separately",
                    list[first].path.display(),
                    p.display()
                );
            }
            seen.insert(id.clone(), list.len());
            list.push(Source {
                id,
                path: p.to_path_buf(),
            });
        }
    }
    Ok(list)
}

fn compile_filter(filter: &str) -> anyhow::Result<GlobMatcher> {
    let pattern = if filter.trim().is_empty() { "*" } else { filter };
    let glob = Glob::new(pattern).with_context(|| format!("invalid file filter '{filter}'"))?;
    Ok(glob.compile_matcher())
}

/// `assets/ui/buttons/ok.png` under `assets/ui` becomes `buttons/ok.png`.
pub fn relative_id(root: &Path, path: &Path) -> anyhow::Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("{} is not under {}", path.display(), root.display()))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

pub fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(
            ext.as_str(),
            "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif" | "tif" | "tiff"
        )
    )
}

pub fn load_rgba(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img.to_rgba8())
}

/// Reads the header only.
pub fn read_dimensions(p: &Path) -> anyhow::Result<(u32, u32)> {
    image::image_dimensions(p).with_context(|| format!("read size of {}", p.display()))
}

/// Runs `load` over every source behind an optional progress bar. Failing
/// files are logged and left out.
pub fn load_all<T>(
    sources: Vec<Source>,
    progress: bool,
    label: &str,
    mut load: impl FnMut(&Path) -> anyhow::Result<T>,
) -> Vec<(Source, T)> {
    let bar = if progress {
        let b = ProgressBar::new(sources.len() as u64);
        let template =
            format!("{{spinner:.green}} {label} {{pos}}/{{len}} [{{elapsed_precise}}] {{wide_msg}}");
        let style =
            ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_bar());
        b.set_style(style);
        b
    } else {
        ProgressBar::hidden()
    };
    let mut out = Vec::with_capacity(sources.len());
    for src in sources {
        bar.set_message(src.id.clone());
        match load(&src.path) {
            Ok(v) => out.push((src, v)),
            Err(e) => error!(path = %src.path.display(), error = %e, "skip image"),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("atlaspack-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("sub")).expect("mkdir");
        for f in ["b.png", "a.png", "notes.txt", "c.jpg", "sub/d.png"] {
            fs::write(dir.join(f), b"").expect("touch");
        }
        dir
    }

    fn ids(list: &[Source]) -> Vec<&str> {
        list.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn flat_scan_skips_subdirectories_and_non_images() {
        let dir = scratch_dir("flat");
        let list = gather_sources(std::slice::from_ref(&dir), "*", false).expect("scan");
        assert_eq!(ids(&list), vec!["a.png", "b.png", "c.jpg"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn recursive_scan_uses_slash_ids_and_filter() {
        let dir = scratch_dir("rec");
        let list = gather_sources(std::slice::from_ref(&dir), "*.png", true).expect("scan");
        assert_eq!(ids(&list), vec!["a.png", "b.png", "sub/d.png"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn same_id_from_two_directories_names_both_files() {
        let first = scratch_dir("dup-a");
        let second = scratch_dir("dup-b");
        let err = gather_sources(&[first.clone(), second.clone()], "a.png", false)
            .expect_err("ids collide")
            .to_string();
        assert!(err.contains("'a.png'"), "{err}");
        assert!(err.contains(&first.join("a.png").display().to_string()), "{err}");
        assert!(err.contains(&second.join("a.png").display().to_string()), "{err}");
        let _ = fs::remove_dir_all(&first);
        let _ = fs::remove_dir_all(&second);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join("atlaspack-definitely-missing-dir");
        assert!(gather_sources(&[missing], "*", false).is_err());
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_image(Path::new("x/Y.PNG")));
        assert!(is_image(Path::new("scan.tiff")));
        assert!(!is_image(Path::new("readme")));
    }
}
