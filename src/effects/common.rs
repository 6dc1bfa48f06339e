use crossterm::style::Color;

/// The display state of a single character position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    /// The position hasn't been touched by an animation yet.
    Idle,
    /// The position is showing a substitute character.
    Encrypted,
    /// The position is showing its original character.
    Revealed,
    /// The position holds whitespace and is never scrambled.
    Space,
}

/// A single character position in a scrambled text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharCell {
    /// The position of this character within the text.
    pub index: usize,
    /// The character in the original text.
    pub original: char,
    /// The character currently being displayed.
    pub displayed: char,
    /// The display state.
    pub state: CharState,
}

impl CharCell {
    pub(crate) fn new(index: usize, original: char) -> Self {
        if original.is_whitespace() {
            Self { index, original, displayed: ' ', state: CharState::Space }
        } else {
            Self { index, original, displayed: original, state: CharState::Idle }
        }
    }

    pub fn is_space(&self) -> bool {
        self.state == CharState::Space
    }

    pub fn is_encrypted(&self) -> bool {
        self.state == CharState::Encrypted
    }

    pub(crate) fn reveal(&mut self) {
        if self.is_space() {
            self.displayed = ' ';
        } else {
            self.displayed = self.original;
            self.state = CharState::Revealed;
        }
    }

    pub(crate) fn encrypt(&mut self, displayed: char) {
        if self.is_space() {
            self.displayed = ' ';
            return;
        }
        self.displayed = displayed;
        self.state = CharState::Encrypted;
    }

    /// Go back to showing the original character with no animation state.
    ///
    /// Unlike every other transition this shows whitespace as-is.
    pub(crate) fn restore(&mut self) {
        self.displayed = self.original;
        if !self.is_space() {
            self.state = CharState::Idle;
        }
    }
}

/// Convert an HSL color into an RGB terminal color.
///
/// Hue goes from 0 to 360, saturation and lightness from 0 to 100.
pub(crate) fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color::Rgb { r: ((r + m) * 255.0) as u8, g: ((g + m) * 255.0) as u8, b: ((b + m) * 255.0) as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::red(0.0, Color::Rgb { r: 255, g: 0, b: 0 })]
    #[case::green(120.0, Color::Rgb { r: 0, g: 255, b: 0 })]
    #[case::blue(240.0, Color::Rgb { r: 0, g: 0, b: 255 })]
    fn primary_hues(#[case] hue: f32, #[case] expected: Color) {
        assert_eq!(hsl_to_rgb(hue, 100.0, 50.0), expected);
    }

    #[test]
    fn spaces_ignore_encryption() {
        let mut cell = CharCell::new(3, ' ');
        cell.encrypt('#');
        assert_eq!(cell.displayed, ' ');
        assert_eq!(cell.state, CharState::Space);
        cell.reveal();
        assert_eq!(cell.state, CharState::Space);
    }

    #[rstest]
    #[case::tab('\t')]
    #[case::newline('\n')]
    fn whitespace_is_shown_as_space(#[case] original: char) {
        let mut cell = CharCell::new(1, original);
        assert_eq!(cell.displayed, ' ');
        cell.encrypt('#');
        assert_eq!(cell.displayed, ' ');
        cell.reveal();
        assert_eq!(cell.displayed, ' ');
        cell.restore();
        assert_eq!(cell.displayed, original);
        assert_eq!(cell.original, original);
    }

    #[test]
    fn reveal_restores_original() {
        let mut cell = CharCell::new(0, 'x');
        cell.encrypt('#');
        assert_eq!((cell.displayed, cell.state), ('#', CharState::Encrypted));
        cell.reveal();
        assert_eq!((cell.displayed, cell.state), ('x', CharState::Revealed));
    }
}
