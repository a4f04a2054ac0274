//! Provider chart colors
//!
//! Colors are a pure function of the provider id (or an explicit index), so the
//! same provider keeps its color across requests regardless of which providers
//! happen to appear first.

use sha2::{Digest, Sha256};

/// Predefined colors for provider charts
pub const PROVIDER_COLORS: &[&str] = &[
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6",
    "#EC4899", "#06B6D4", "#84CC16", "#F97316", "#6366F1",
];

/// Used when the palette is empty
pub const DEFAULT_COLOR: &str = "#9CA3AF";

/// Color at `index`, wrapping around the palette
pub fn color_for_index<'a>(palette: &[&'a str], index: usize) -> &'a str {
    if palette.is_empty() {
        return DEFAULT_COLOR;
    }
    palette[index % palette.len()]
}

/// Stable color for a provider id
pub fn color_for<'a>(provider_id: &str, palette: &[&'a str]) -> &'a str {
    color_for_index(palette, stable_index(provider_id))
}

fn stable_index(provider_id: &str) -> usize {
    let digest = Sha256::digest(provider_id.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_stable() {
        let a = color_for("dj-1", PROVIDER_COLORS);
        let b = color_for("dj-1", PROVIDER_COLORS);
        assert_eq!(a, b);
        assert!(PROVIDER_COLORS.contains(&a));
    }

    #[test]
    fn test_index_wraps() {
        assert_eq!(color_for_index(PROVIDER_COLORS, 0), "#3B82F6");
        assert_eq!(color_for_index(PROVIDER_COLORS, PROVIDER_COLORS.len() + 1), "#10B981");
    }

    #[test]
    fn test_empty_palette() {
        assert_eq!(color_for("dj-1", &[]), DEFAULT_COLOR);
        assert_eq!(color_for_index(&[], 3), DEFAULT_COLOR);
    }
}
