//! User-supplied palettes.

use std::fs;
use std::path::Path;

use relief_types::HexColor;
use tracing::debug;

use crate::error::{PaletteError, PaletteResult};

/// Parse a comma-separated list of hex colors.
///
/// Blank entries are skipped and a missing `#` is accepted.
///
/// ```
/// use relief_palette::parse_palette_string;
///
/// let pal = parse_palette_string("ff0000, #00FF00,,0000ff").unwrap();
/// assert_eq!(pal.len(), 3);
/// assert_eq!(pal[1].to_string(), "#00ff00");
/// ```
///
/// # Errors
///
/// Returns an error for any entry that is not six hex digits.
pub fn parse_palette_string(value: &str) -> PaletteResult<Vec<HexColor>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(PaletteError::from))
        .collect()
}

/// Load a palette from a file path or an inline comma-separated list.
///
/// If `path_or_list` names an existing file, a `.json` file is read as an
/// array of hex strings and any other file as comma-separated text.
/// Otherwise the argument itself is parsed as a list.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any entry is malformed.
pub fn load_palette(path_or_list: &str) -> PaletteResult<Vec<HexColor>> {
    let path = Path::new(path_or_list);
    if !path.is_file() {
        return parse_palette_string(path_or_list);
    }

    let text = fs::read_to_string(path).map_err(|source| PaletteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let palette = if is_json {
        let entries: Vec<String> = serde_json::from_str(&text)?;
        entries
            .iter()
            .map(|s| s.trim().parse().map_err(PaletteError::from))
            .collect::<PaletteResult<Vec<HexColor>>>()?
    } else {
        parse_palette_string(text.trim())?
    };
    debug!(path = %path.display(), colors = palette.len(), "Loaded palette file");
    Ok(palette)
}
