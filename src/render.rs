use crate::{
    config::ScrambleConfig,
    effects::{CharCell, CharState, DecryptedText},
};
use crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Draws scrambled texts to a terminal, one text per line, redrawing in place on every frame.
pub struct TerminalRenderer<W: Write> {
    output: W,
    framed: bool,
    lines_drawn: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(output: W, framed: bool) -> Self {
        Self { output, framed, lines_drawn: 0 }
    }

    /// Draw the current state of every text, overwriting the previous frame.
    pub fn draw(&mut self, texts: &[&DecryptedText]) -> io::Result<()> {
        let lines: Vec<(Vec<CharCell>, ScrambleConfig)> =
            texts.iter().map(|text| (text.snapshot(), text.config())).collect();
        let width = lines.iter().map(|(cells, _)| display_width(cells)).max().unwrap_or(0);

        if self.lines_drawn > 0 {
            queue!(self.output, MoveToPreviousLine(self.lines_drawn))?;
        }
        let border = "─".repeat(width + 2);
        if self.framed {
            queue!(self.output, Clear(ClearType::CurrentLine), Print(format!("┌{border}┐\n")))?;
        }
        for (cells, config) in &lines {
            queue!(self.output, Clear(ClearType::CurrentLine))?;
            if self.framed {
                queue!(self.output, Print("│ "))?;
            }
            self.draw_cells(cells, config)?;
            if self.framed {
                let padding = " ".repeat(width - display_width(cells));
                queue!(self.output, Print(format!("{padding} │")))?;
            }
            queue!(self.output, Print("\n"))?;
        }
        if self.framed {
            queue!(self.output, Clear(ClearType::CurrentLine), Print(format!("└{border}┘\n")))?;
        }
        let borders = if self.framed { 2 } else { 0 };
        self.lines_drawn = u16::try_from(lines.len() + borders).unwrap_or(u16::MAX);
        self.output.flush()
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn draw_cells(&mut self, cells: &[CharCell], config: &ScrambleConfig) -> io::Result<()> {
        // Print runs of equally styled characters in one go.
        for run in cells.chunk_by(|left, right| left.state == right.state) {
            let text: String = run.iter().map(shown_char).collect();
            match state_color(run[0].state, config) {
                Some(color) => queue!(self.output, SetForegroundColor(color), Print(text), ResetColor)?,
                None => queue!(self.output, Print(text))?,
            };
        }
        Ok(())
    }
}

fn state_color(state: CharState, config: &ScrambleConfig) -> Option<Color> {
    match state {
        CharState::Encrypted => Some(config.encrypted_color),
        CharState::Revealed => Some(config.revealed_color),
        CharState::Idle | CharState::Space => None,
    }
}

/// Whitespace never breaks the line, whatever the cell holds.
fn shown_char(cell: &CharCell) -> char {
    if cell.is_space() { ' ' } else { cell.displayed }
}

fn display_width(cells: &[CharCell]) -> usize {
    cells.iter().map(|cell| shown_char(cell).width().unwrap_or(0)).sum()
}
