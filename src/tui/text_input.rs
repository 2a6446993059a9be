//! Text field widget for [`KeyboardInput`].

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::document::InputType;
use crate::field::EditableField;
use crate::keyboard_input::KeyboardInput;

use super::Theme;

/// Caret glyph drawn inside focused fields.
const CARET: &str = "█";

/// Renders keyboard-aware text fields.
pub struct TextInputWidget;

impl TextInputWidget {
    /// Rows a field needs.
    #[must_use]
    pub fn height(input: &KeyboardInput) -> u16 {
        if input.props().multiline {
            6
        } else {
            3
        }
    }

    /// Draws `input` into `area`.
    pub fn render(f: &mut Frame, area: Rect, input: &KeyboardInput, theme: &Theme) {
        let field = input.field();
        let field = field.borrow();
        let focused = field.has_focus();
        let masked = input.props().input_type == InputType::Password;

        let shown: String = if masked {
            field.value().chars().map(|_| '•').collect()
        } else {
            field.value().to_string()
        };

        let lines = if focused {
            Self::lines_with_caret(&shown, field.caret(), theme)
        } else {
            shown.split('\n').map(|l| Line::from(l.to_string())).collect()
        };

        let border = if focused { theme.accent } else { theme.primary };
        let block = Block::default()
            .title(format!(" {} ", input.props().label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(theme.text))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Splits `value` into lines and inserts the caret at character `caret`.
    fn lines_with_caret(value: &str, caret: usize, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut offset = 0;
        let mut placed = false;
        for line in value.split('\n') {
            let len = line.chars().count();
            if !placed && (offset..=offset + len).contains(&caret) {
                let split = line
                    .char_indices()
                    .nth(caret - offset)
                    .map_or(line.len(), |(idx, _)| idx);
                lines.push(Line::from(vec![
                    Span::raw(line[..split].to_string()),
                    Span::styled(CARET, Style::default().fg(theme.accent)),
                    Span::raw(line[split..].to_string()),
                ]));
                placed = true;
            } else {
                lines.push(Line::from(line.to_string()));
            }
            offset += len + 1;
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_caret_single_line() {
        let lines = TextInputWidget::lines_with_caret("abc", 1, &Theme::dark());
        assert_eq!(flatten(&lines), vec!["a█bc".to_string()]);
    }

    #[test]
    fn test_caret_on_second_line() {
        let lines = TextInputWidget::lines_with_caret("ab\ncd", 4, &Theme::dark());
        assert_eq!(flatten(&lines), vec!["ab".to_string(), "c█d".to_string()]);
    }

    #[test]
    fn test_caret_after_trailing_newline() {
        let lines = TextInputWidget::lines_with_caret("ab\n", 3, &Theme::dark());
        assert_eq!(flatten(&lines), vec!["ab".to_string(), "█".to_string()]);
    }
}
