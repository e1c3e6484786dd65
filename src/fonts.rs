//! Hangul-capable font discovery and selection.
//!
//! The host's installed fonts are enumerated once at startup through [`fontdb`],
//! then matched against a per-OS preference list. If nothing matches, a bundled
//! font file is tried as a last resort. The outcome is folded into an explicit
//! [`RenderConfig`] that the rendering code receives as a plain value, so chart
//! drawing stays a pure function of (data, configuration).

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;
use fontdb::{Database, Family, Query};
use serde::Serialize;

/// Hangul font preference lists, most preferred first. Matching is exact name
/// equality against the installed family set.
pub const WINDOWS_CANDIDATES: &[&str] = &["Malgun Gothic", "Microsoft YaHei", "SimHei"];
pub const MACOS_CANDIDATES: &[&str] = &["AppleGothic", "Apple SD Gothic Neo", "Noto Sans CJK KR"];
pub const LINUX_CANDIDATES: &[&str] = &["Noto Sans CJK KR", "DejaVu Sans", "Liberation Sans"];

/// Last-resort font file, looked up relative to the working directory.
/// The file is not shipped with the repository; the path only succeeds when a
/// user drops a font there themselves.
pub const BUNDLED_FONT_PATH: &str = "NotoSansKR-Regular.ttf";

/// Family-name substrings that mark a font as likely Hangul-capable, used for
/// the diagnostics panel only.
pub const HANGUL_MARKERS: &[&str] = &["Gothic", "Noto", "Malgun"];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum OsClass {
    Windows,
    MacOs,
    Other,
}

impl OsClass {
    /// Classify the compile-target operating system. Anything that is neither
    /// Windows nor macOS uses the Linux candidate list.
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::Other,
        }
    }

    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Windows => WINDOWS_CANDIDATES,
            Self::MacOs => MACOS_CANDIDATES,
            Self::Other => LINUX_CANDIDATES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Other => "Linux/기타",
        }
    }
}

/// How the font was (or was not) resolved.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStatus {
    /// A candidate from the OS preference list was installed.
    Preferred,
    /// No candidate installed; the bundled font file was usable.
    Bundled,
    /// Nothing usable; the toolkit keeps its default fonts.
    Missing,
}

/// Result of the startup font resolution, computed exactly once in `main`.
#[derive(Clone, Debug)]
pub struct FontResolution {
    pub os: OsClass,
    pub status: FontStatus,
    /// Resolved family name; `None` only for [`FontStatus::Missing`].
    pub family: Option<String>,
    /// Raw bytes of the resolved face, needed to register it with egui.
    pub data: Option<Vec<u8>>,
    /// Installed families whose names contain a Hangul marker substring.
    pub hangul_families: Vec<String>,
    /// Total number of faces in the system font database.
    pub installed_faces: usize,
}

/// Machine-readable resolution summary for bug reports and the log.
#[derive(Serialize)]
pub struct FontReport<'a> {
    pub os: &'a str,
    pub status: FontStatus,
    pub family: Option<&'a str>,
    pub installed_faces: usize,
    pub hangul_families: &'a [String],
}

impl FontResolution {
    pub fn report(&self) -> FontReport<'_> {
        FontReport {
            os: self.os.label(),
            status: self.status,
            family: self.family.as_deref(),
            installed_faces: self.installed_faces,
            hangul_families: &self.hangul_families,
        }
    }

    /// Banner text shown in the UI and on the terminal at startup.
    pub fn status_message(&self) -> String {
        match (self.status, self.family.as_deref()) {
            (FontStatus::Preferred, Some(family)) => {
                format!("✅ 한글 폰트 설정 완료: {family}")
            }
            (FontStatus::Bundled, Some(family)) => {
                format!("✅ 폰트 파일에서 한글 폰트 로드 완료: {family}")
            }
            _ => "❌ 한글 폰트 설정에 실패했습니다. 기본 폰트를 사용합니다.".to_owned(),
        }
    }
}

/// Rendering configuration derived from the resolution, passed to every chart
/// call instead of living in process-global state.
#[derive(Clone, Debug, Default)]
pub struct RenderConfig {
    /// Family registered with egui, if any.
    pub family: Option<String>,
    /// Render the minus sign as U+002D instead of U+2212. The CJK families on
    /// the candidate lists frequently lack a U+2212 glyph, which shows up as
    /// tofu in axis labels for negative values.
    pub ascii_minus: bool,
}

impl RenderConfig {
    pub fn from_resolution(resolution: &FontResolution) -> Self {
        Self {
            family: resolution.family.clone(),
            ascii_minus: resolution.family.is_some(),
        }
    }

    pub fn minus_sign(&self) -> &'static str {
        if self.ascii_minus { "-" } else { "\u{2212}" }
    }

    /// Fixed-precision number formatting honoring the minus-sign setting.
    pub fn fmt_number(&self, value: f64, decimals: usize) -> String {
        let magnitude = format!("{:.*}", decimals, value.abs());
        if value < 0.0 {
            format!("{}{}", self.minus_sign(), magnitude)
        } else {
            magnitude
        }
    }
}

/// Enumerate system fonts and resolve against them. Called once, before the
/// event loop starts.
pub fn resolve() -> FontResolution {
    let mut db = Database::new();
    db.load_system_fonts();
    log::info!("loaded {} system font faces", db.len());
    resolve_in(OsClass::detect(), &db, Path::new(BUNDLED_FONT_PATH))
}

/// Resolution against an explicit font database and bundled-font path.
pub fn resolve_in(os: OsClass, db: &Database, bundled: &Path) -> FontResolution {
    let installed = installed_families(db);
    let hangul_families = hangul_families(&installed);
    let installed_faces = db.len();

    if let Some(name) = select_family(os.candidates(), &installed) {
        log::info!("selected Hangul font: {name}");
        let data = family_data(db, name);
        if data.is_none() {
            log::warn!("family {name} matched but its face data could not be read");
        }
        return FontResolution {
            os,
            status: FontStatus::Preferred,
            family: Some(name.to_owned()),
            data,
            hangul_families,
            installed_faces,
        };
    }

    log::warn!("no candidate font installed for {}, trying {bundled:?}", os.label());
    match load_bundled(bundled) {
        Ok((family, data)) => {
            log::info!("loaded bundled font: {family}");
            FontResolution {
                os,
                status: FontStatus::Bundled,
                family: Some(family),
                data: Some(data),
                hangul_families,
                installed_faces,
            }
        }
        Err(err) => {
            log::warn!("bundled font unavailable: {err:#}");
            FontResolution {
                os,
                status: FontStatus::Missing,
                family: None,
                data: None,
                hangul_families,
                installed_faces,
            }
        }
    }
}

/// First candidate that is installed, in preference order.
pub fn select_family<'a>(
    candidates: &'a [&'a str],
    installed: &BTreeSet<String>,
) -> Option<&'a str> {
    for candidate in candidates {
        if installed.contains(*candidate) {
            return Some(candidate);
        }
        log::debug!("candidate not installed: {candidate}");
    }
    None
}

/// All family names known to the database.
pub fn installed_families(db: &Database) -> BTreeSet<String> {
    db.faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect()
}

fn hangul_families(installed: &BTreeSet<String>) -> Vec<String> {
    installed
        .iter()
        .filter(|name| HANGUL_MARKERS.iter().any(|marker| name.contains(marker)))
        .cloned()
        .collect()
}

fn family_data(db: &Database, family: &str) -> Option<Vec<u8>> {
    let query = Query {
        families: &[Family::Name(family)],
        ..Query::default()
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, _index| data.to_vec())
}

/// Read the bundled font file and the family name from its name table.
fn load_bundled(path: &Path) -> Result<(String, Vec<u8>)> {
    let data = std::fs::read(path)
        .with_context(|| format!("bundled font {path:?} is missing or unreadable"))?;
    let mut db = Database::new();
    db.load_font_data(data.clone());
    let face = db
        .faces()
        .next()
        .with_context(|| format!("bundled font {path:?} contains no usable face"))?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .with_context(|| format!("bundled font {path:?} has no family name"))?;
    Ok((family, data))
}

/// Register the resolved face as the first proportional and monospace font so
/// every widget and chart renders Hangul with it. No-op on failed resolution;
/// egui keeps its defaults.
pub fn install(ctx: &egui::Context, resolution: &FontResolution) {
    let (Some(family), Some(data)) = (&resolution.family, &resolution.data) else {
        return;
    };
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(family.clone(), egui::FontData::from_owned(data.clone()).into());
    if let Some(proportional) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
        proportional.insert(0, family.clone());
    }
    if let Some(monospace) = fonts.families.get_mut(&egui::FontFamily::Monospace) {
        monospace.insert(0, family.clone());
    }
    ctx.set_fonts(fonts);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn highest_priority_candidate_wins() {
        for os in [OsClass::Windows, OsClass::MacOs, OsClass::Other] {
            let all = installed(os.candidates());
            assert_eq!(select_family(os.candidates(), &all), Some(os.candidates()[0]));
        }
    }

    #[test]
    fn macos_second_priority_when_first_absent() {
        // "AppleGothic"이 없으면 다음 순위가 선택된다.
        let set = installed(&["Apple SD Gothic Neo", "Helvetica"]);
        assert_eq!(
            select_family(OsClass::MacOs.candidates(), &set),
            Some("Apple SD Gothic Neo")
        );
    }

    #[test]
    fn windows_first_priority() {
        let set = installed(&["Malgun Gothic"]);
        assert_eq!(
            select_family(OsClass::Windows.candidates(), &set),
            Some("Malgun Gothic")
        );
    }

    #[test]
    fn exact_match_only() {
        let set = installed(&["Malgun Gothic Semilight", "malgun gothic"]);
        assert_eq!(select_family(OsClass::Windows.candidates(), &set), None);
    }

    #[test]
    fn disjoint_set_without_bundled_file_fails() {
        let db = Database::new();
        let missing = Path::new("definitely-not-here-방탄.ttf");
        let resolution = resolve_in(OsClass::Other, &db, missing);
        assert_eq!(resolution.status, FontStatus::Missing);
        assert_eq!(resolution.family, None);
        assert!(resolution.data.is_none());

        let config = RenderConfig::from_resolution(&resolution);
        assert!(!config.ascii_minus);
    }

    #[test]
    fn malformed_bundled_file_fails() {
        let path = std::env::temp_dir().join("hangulboard-malformed-font.ttf");
        std::fs::write(&path, b"not a font at all").unwrap();
        let db = Database::new();
        let resolution = resolve_in(OsClass::Windows, &db, &path);
        assert_eq!(resolution.status, FontStatus::Missing);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn resolution_is_deterministic() {
        let db = Database::new();
        let missing = Path::new("no-such-font.ttf");
        let a = resolve_in(OsClass::MacOs, &db, missing);
        let b = resolve_in(OsClass::MacOs, &db, missing);
        assert_eq!(a.status, b.status);
        assert_eq!(a.family, b.family);
        assert_eq!(a.hangul_families, b.hangul_families);
    }

    #[test]
    fn hangul_marker_filter() {
        let set = installed(&["Malgun Gothic", "Noto Sans KR", "Arial", "Apple SD Gothic Neo"]);
        let matched = hangul_families(&set);
        assert_eq!(matched.len(), 3);
        assert!(!matched.contains(&"Arial".to_string()));
    }

    #[test]
    fn status_messages_name_the_family() {
        let db = Database::new();
        let resolution = resolve_in(OsClass::Other, &db, Path::new("missing.ttf"));
        assert!(resolution.status_message().starts_with('❌'));
    }

    #[test]
    fn minus_sign_follows_config() {
        let ascii = RenderConfig { family: Some("Malgun Gothic".into()), ascii_minus: true };
        let unicode = RenderConfig::default();
        assert_eq!(ascii.fmt_number(-0.37, 2), "-0.37");
        assert_eq!(unicode.fmt_number(-0.37, 2), "\u{2212}0.37");
        assert_eq!(ascii.fmt_number(733.46125, 1), "733.5");
    }

    #[test]
    fn report_serializes_to_json() {
        let db = Database::new();
        let resolution = resolve_in(OsClass::Windows, &db, Path::new("missing.ttf"));
        let json = serde_json::to_string(&resolution.report()).unwrap();
        assert!(json.contains("\"status\":\"missing\""));
        assert!(json.contains("\"os\":\"Windows\""));
    }
}
