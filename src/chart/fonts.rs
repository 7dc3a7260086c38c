//! TrueType font discovery for chart text
//!
//! plotters is built without a system font backend, so text needs a font
//! registered up front. The configured font wins, then a handful of common
//! system locations, then the DejaVu Sans copy compiled into the binary.
//! Registration happens once per process.

use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Family name charts refer to
pub(super) const FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// DejaVu Sans, see `assets/fonts/LICENSE-DejaVu.txt`
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static REGISTERED: OnceLock<bool> = OnceLock::new();

/// Make sure a font is registered under [`FAMILY`].
///
/// Returns false only if even the bundled font is rejected.
pub(super) fn ensure_registered(configured: Option<&Path>) -> bool {
    *REGISTERED.get_or_init(|| register_first(configured, SYSTEM_FONTS))
}

fn register_first(configured: Option<&Path>, system: &[&str]) -> bool {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(system.iter().map(PathBuf::from));

    for path in candidates {
        if try_register_file(&path) {
            return true;
        }
    }

    debug!("No font found on disk, using the bundled DejaVu Sans");
    register(BUNDLED_FONT, "bundled DejaVu Sans")
}

fn try_register_file(path: &Path) -> bool {
    let Ok(bytes) = std::fs::read(path) else {
        return false;
    };
    // plotters keeps a reference for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register(bytes, &path.display().to_string())
}

fn register(bytes: &'static [u8], source: &str) -> bool {
    match register_font(FAMILY, FontStyle::Normal, bytes) {
        Ok(()) => {
            debug!("Using chart font {}", source);
            true
        }
        Err(_) => {
            warn!("Ignoring unusable font {}", source);
            false
        }
    }
}
