//! TTF lookup for the raster compositor.
//!
//! Families are resolved against the fonts directory by filename
//! convention (`PlayfairDisplay-Bold.ttf`, `Lora-Regular.ttf`, ...), with
//! the same fallback chain the PDF exporter uses: the requested family,
//! then Arial, then LiberationSans. Each render job owns its own library,
//! so loaded faces are cached per job, not process-wide.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use ab_glyph::{FontArc, FontVec};

use super::RenderError;

const FALLBACK_FAMILIES: [&str; 2] = ["Arial", "LiberationSans"];

pub struct FontLibrary {
    dir: PathBuf,
    cache: HashMap<String, FontArc>,
}

impl FontLibrary {
    pub fn new(dir: PathBuf) -> Self {
        FontLibrary {
            dir,
            cache: HashMap::new(),
        }
    }

    /// Resolve a face for the family/weight pair. Weights of 600 and up
    /// select the Bold variant when one exists.
    pub fn face(&mut self, family: &str, weight: &str) -> Result<FontArc, RenderError> {
        let variant = if is_bold(weight) { "Bold" } else { "Regular" };
        let key = format!("{family}#{variant}");
        if let Some(font) = self.cache.get(&key) {
            return Ok(font.clone());
        }

        let mut attempts: Vec<(String, &str)> = vec![(family.to_string(), variant)];
        if variant == "Bold" {
            attempts.push((family.to_string(), "Regular"));
        }
        for fallback in FALLBACK_FAMILIES {
            attempts.push((fallback.to_string(), variant));
            attempts.push((fallback.to_string(), "Regular"));
        }

        for (fam, var) in attempts {
            if let Some(font) = self.try_load(&fam, var) {
                self.cache.insert(key, font.clone());
                return Ok(font);
            }
        }
        Err(RenderError::FontUnavailable(family.to_string()))
    }

    fn try_load(&self, family: &str, variant: &str) -> Option<FontArc> {
        for name in candidate_file_names(family, variant) {
            let path = self.dir.join(name);
            if let Ok(bytes) = fs::read(&path) {
                if let Ok(font) = FontVec::try_from_vec(bytes) {
                    return Some(FontArc::from(font));
                }
            }
        }
        None
    }
}

fn is_bold(weight: &str) -> bool {
    weight
        .parse::<u32>()
        .map(|w| w >= 600)
        .unwrap_or_else(|_| weight.eq_ignore_ascii_case("bold"))
}

fn candidate_file_names(family: &str, variant: &str) -> Vec<String> {
    let compact = family.replace(' ', "");
    let mut names = vec![
        format!("{compact}-{variant}.ttf"),
        format!("{family}-{variant}.ttf"),
    ];
    if variant == "Regular" {
        names.push(format!("{compact}.ttf"));
        names.push(format!("{family}.ttf"));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_strings_map_to_variants() {
        assert!(is_bold("700"));
        assert!(is_bold("600"));
        assert!(!is_bold("400"));
        assert!(is_bold("bold"));
        assert!(!is_bold("normal"));
    }

    #[test]
    fn candidates_cover_compact_and_spaced_names() {
        let names = candidate_file_names("Playfair Display", "Bold");
        assert_eq!(
            names,
            vec![
                "PlayfairDisplay-Bold.ttf".to_string(),
                "Playfair Display-Bold.ttf".to_string(),
            ]
        );
        assert!(candidate_file_names("Lora", "Regular").contains(&"Lora.ttf".to_string()));
    }

    #[test]
    fn missing_directory_reports_the_requested_family() {
        let mut lib = FontLibrary::new(PathBuf::from("/nonexistent"));
        match lib.face("Playfair Display", "700") {
            Err(RenderError::FontUnavailable(family)) => assert_eq!(family, "Playfair Display"),
            Err(other) => panic!("expected FontUnavailable, got {other}"),
            Ok(_) => panic!("expected FontUnavailable, got a font"),
        }
    }
}
