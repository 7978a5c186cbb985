use serde::Serialize;

/// Background colors for generated icons.
pub const PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

/// Letter tile drawn when no icon source works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackIcon {
    pub initial: String,
    pub color: &'static str,
}

/// The fallback tile for a link title: its first character, uppercased, over a
/// palette color picked by the title's first UTF-16 code unit.
///
/// Browsers key the color the same way, so a character outside the BMP is colored
/// by its high surrogate rather than its code point.
pub fn fallback_icon(title: &str) -> FallbackIcon {
    match (title.chars().next(), title.encode_utf16().next()) {
        (Some(first), Some(unit)) => FallbackIcon {
            initial: first.to_uppercase().collect(),
            color: PALETTE[usize::from(unit) % PALETTE.len()],
        },
        _ => FallbackIcon {
            initial: "?".to_string(),
            color: PALETTE[0],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_keyed_on_first_character() {
        let icon = fallback_icon("Example");
        assert_eq!(icon.initial, "E");
        assert_eq!(icon.color, PALETTE['E' as usize % PALETTE.len()]);
        assert_eq!(icon.color, "#85C1E9");
        assert_eq!(fallback_icon("Example"), icon);
    }

    #[test]
    fn test_initial_uppercased_but_color_from_title_as_written() {
        let icon = fallback_icon("github");
        assert_eq!(icon.initial, "G");
        // 'g' is 103, 'G' is 71
        assert_eq!(icon.color, "#96CEB4");
        assert_eq!(fallback_icon("Github").color, "#4ECDC4");
    }

    #[test]
    fn test_astral_character_colored_by_high_surrogate() {
        let icon = fallback_icon("\u{1F600} smile");
        assert_eq!(icon.initial, "\u{1F600}");
        // 0xD83D % 10 == 7, where the code point 0x1F600 would give 2
        assert_eq!(icon.color, "#F7DC6F");
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(
            fallback_icon(""),
            FallbackIcon {
                initial: "?".to_string(),
                color: "#FF6B6B",
            }
        );
    }
}
