use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::ComposeError;

static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Loads a font from `dir`, keeping parsed fonts in a process-wide cache
/// keyed by their full path.
pub fn load_font_cached(dir: &Path, name: &str) -> Result<Arc<Font<'static>>, ComposeError> {
    let path = dir.join(name);
    if let Some(f) = FONT_CACHE.lock().get(&path) {
        return Ok(Arc::clone(f));
    }

    let bytes = std::fs::read(&path).map_err(|e| {
        ComposeError::Font(format!("failed to read font {}: {e}", path.display()))
    })?;
    let font = Font::try_from_vec(bytes)
        .ok_or_else(|| ComposeError::Font(format!("failed to parse font {}", path.display())))?;

    let font = Arc::new(font);
    FONT_CACHE.lock().insert(path, Arc::clone(&font));
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_is_reported() {
        let err = load_font_cached(Path::new("/nonexistent"), "Missing.ttf").unwrap_err();
        assert!(matches!(err, ComposeError::Font(_)));
    }
}
