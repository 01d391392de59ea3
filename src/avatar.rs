//! Presenter Avatars
//!
//! Colours are handed out on first sight and stay fixed for the session.
//! The palette is owned by `AppContext`, not a global.

use std::collections::HashMap;

/// Background colours cycled through in order
const COLORS: &[&str] = &[
    "#e74c3c", // red
    "#3498db", // blue
    "#27ae60", // green
    "#9b59b6", // purple
    "#e67e22", // orange
    "#16a085", // teal
    "#d35400", // pumpkin
    "#2c3e50", // navy
];

#[derive(Debug, Clone, Default)]
pub struct AvatarPalette {
    assigned: HashMap<u32, usize>,
    next: usize,
}

impl AvatarPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour for a presenter id, assigning the next one if unseen
    pub fn color_for(&mut self, presenter_id: u32) -> &'static str {
        let slot = match self.assigned.get(&presenter_id) {
            Some(slot) => *slot,
            None => {
                let slot = self.next % COLORS.len();
                self.next += 1;
                self.assigned.insert(presenter_id, slot);
                slot
            }
        };
        COLORS[slot]
    }

    pub fn clear(&mut self) {
        self.assigned.clear();
        self.next = 0;
    }
}

/// Up to two initials, uppercased; `?` for a blank name
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_stable() {
        let mut palette = AvatarPalette::new();
        let first = palette.color_for(42);
        let second = palette.color_for(7);
        assert_ne!(first, second);
        assert_eq!(palette.color_for(42), first);
        assert_eq!(palette.color_for(7), second);
    }

    #[test]
    fn test_palette_cycles() {
        let mut palette = AvatarPalette::new();
        let colors: Vec<&str> = (0..=COLORS.len() as u32).map(|id| palette.color_for(id)).collect();
        assert_eq!(colors[0], colors[COLORS.len()]);
    }

    #[test]
    fn test_separate_palettes_are_independent() {
        let mut a = AvatarPalette::new();
        let mut b = AvatarPalette::new();
        a.color_for(1);
        assert_eq!(b.color_for(2), COLORS[0]);
        a.clear();
        assert_eq!(a.color_for(3), COLORS[0]);
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("rosalind elsie franklin"), "RE");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("  "), "?");
    }
}
