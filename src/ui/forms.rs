use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::controller::EditBuffer;

/// Which part of the screen receives plain key presses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    List,
    Name,
    Email,
}

impl Focus {
    pub(crate) fn next(self) -> Self {
        match self {
            Focus::List => Focus::Name,
            Focus::Name => Focus::Email,
            Focus::Email => Focus::List,
        }
    }

    pub(crate) fn prev(self) -> Self {
        match self {
            Focus::List => Focus::Email,
            Focus::Name => Focus::List,
            Focus::Email => Focus::Name,
        }
    }
}

/// Editable fields of the form. The id is display-only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormField {
    Id,
    Name,
    Email,
}

impl FormField {
    pub(crate) const ALL: [FormField; 3] = [FormField::Id, FormField::Name, FormField::Email];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Id => "ID",
            FormField::Name => "Name",
            FormField::Email => "Email",
        }
    }

    /// Prefix drawn before the value; also used to place the cursor.
    pub(crate) fn prefix(self) -> String {
        format!("{:<7}", format!("{}:", self.label()))
    }

    pub(crate) fn focus(self) -> Option<Focus> {
        match self {
            FormField::Id => None,
            FormField::Name => Some(Focus::Name),
            FormField::Email => Some(Focus::Email),
        }
    }

    pub(crate) fn value(self, buffer: &EditBuffer) -> String {
        match self {
            FormField::Id => buffer.id.map(|id| id.to_string()).unwrap_or_default(),
            FormField::Name => buffer.name.clone(),
            FormField::Email => buffer.email.clone(),
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            FormField::Id => "<assigned on save>",
            FormField::Name | FormField::Email => "<required>",
        }
    }
}

/// Append a character typed into a text field. Control characters are
/// ignored.
pub(crate) fn push_char(value: &mut String, ch: char) -> bool {
    if ch.is_control() {
        false
    } else {
        value.push(ch);
        true
    }
}

/// Render a single line for the form panel.
pub(crate) fn build_line(field: FormField, buffer: &EditBuffer, focus: Focus) -> Line<'static> {
    let value = field.value(buffer);
    let is_active = field.focus() == Some(focus);

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else if field == FormField::Id {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let display = if value.is_empty() && !is_active {
        field.placeholder().to_string()
    } else {
        value
    };

    Line::from(vec![Span::raw(field.prefix()), Span::styled(display, style)])
}
