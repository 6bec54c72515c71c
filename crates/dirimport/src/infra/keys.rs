//! Parsing of configured key bindings into event matchers.

use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Form-level actions that can be rebound from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    AddRow,
    RemoveRow,
    Submit,
    Quit,
}

/// A single key chord such as `ctrl+n` or `esc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Shift is ignored since terminals disagree on reporting it for characters.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let codes_match = match (self.code, event.code) {
            (KeyCode::Char(expected), KeyCode::Char(actual)) => {
                expected.eq_ignore_ascii_case(&actual)
            }
            (expected, actual) => expected == actual,
        };
        codes_match
            && event.modifiers.difference(KeyModifiers::SHIFT)
                == self.modifiers.difference(KeyModifiers::SHIFT)
    }
}

/// Error returned when a key binding string can not be parsed.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum KeyBindingParseError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    /// A printable key without ctrl or alt would be swallowed while typing a path.
    #[error("'{0}' needs a ctrl or alt modifier")]
    MissingModifier(String),
}

impl FromStr for KeyBinding {
    type Err = KeyBindingParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(KeyBindingParseError::Empty);
        }

        // `ctrl++` binds the plus key itself.
        let (prefix, key) = match normalized.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match normalized.rsplit_once('+') {
                Some((prefix, key)) => (prefix, key),
                None => ("", normalized.as_str()),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|part| !part.is_empty()) {
            modifiers |= match part {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(KeyBindingParseError::UnknownModifier(other.to_owned())),
            };
        }

        let code = parse_key_code(key)?;
        if matches!(code, KeyCode::Char(_))
            && !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Err(KeyBindingParseError::MissingModifier(normalized));
        }
        Ok(Self::new(code, modifiers))
    }
}

fn parse_key_code(key: &str) -> Result<KeyCode, KeyBindingParseError> {
    let code = match key {
        "" => return Err(KeyBindingParseError::Empty),
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    Some(n @ 1..=12) => KeyCode::F(n),
                    _ => return Err(KeyBindingParseError::UnknownKey(other.to_owned())),
                },
            }
        }
    };
    Ok(code)
}

/// Resolved bindings for every [`FormAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub add_row: KeyBinding,
    pub remove_row: KeyBinding,
    pub submit: KeyBinding,
    pub quit: KeyBinding,
}

impl Keymap {
    /// Map a key event to an action, checking bindings in a fixed order.
    pub fn action_for(&self, event: &KeyEvent) -> Option<FormAction> {
        [
            (&self.submit, FormAction::Submit),
            (&self.add_row, FormAction::AddRow),
            (&self.remove_row, FormAction::RemoveRow),
            (&self.quit, FormAction::Quit),
        ]
        .into_iter()
        .find(|(binding, _)| binding.matches(event))
        .map(|(_, action)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_modifier_chords() {
        let binding: KeyBinding = "Ctrl+N".parse().unwrap();
        assert!(binding.matches(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&key(KeyCode::Char('n'), KeyModifiers::NONE)));
        assert!(!binding.matches(&key(KeyCode::Char('n'), KeyModifiers::ALT)));
    }

    #[test]
    fn parses_named_and_function_keys() {
        assert_eq!(
            "esc".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::Esc, KeyModifiers::NONE)
        );
        assert_eq!(
            "alt+f5".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::F(5), KeyModifiers::ALT)
        );
        assert_eq!(
            "ctrl++".parse::<KeyBinding>().unwrap(),
            KeyBinding::new(KeyCode::Char('+'), KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn shift_is_ignored_for_characters() {
        let binding: KeyBinding = "ctrl+s".parse().unwrap();
        assert!(binding.matches(&key(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
    }

    #[test]
    fn rejects_unknown_parts() {
        assert_eq!(
            "hyper+x".parse::<KeyBinding>(),
            Err(KeyBindingParseError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            "ctrl+banana".parse::<KeyBinding>(),
            Err(KeyBindingParseError::UnknownKey("banana".into()))
        );
        assert_eq!("  ".parse::<KeyBinding>(), Err(KeyBindingParseError::Empty));
        assert!("f13".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn printable_keys_need_ctrl_or_alt() {
        for value in ["a", "space", "shift+x", "/"] {
            assert_eq!(
                value.parse::<KeyBinding>(),
                Err(KeyBindingParseError::MissingModifier(value.to_owned())),
            );
        }
        assert!("alt+a".parse::<KeyBinding>().is_ok());
        assert!("ctrl+space".parse::<KeyBinding>().is_ok());
        assert!("enter".parse::<KeyBinding>().is_ok());
    }

    #[test]
    fn keymap_resolves_actions() {
        let keymap = Keymap {
            add_row: "ctrl+n".parse().unwrap(),
            remove_row: "ctrl+d".parse().unwrap(),
            submit: "ctrl+s".parse().unwrap(),
            quit: "esc".parse().unwrap(),
        };
        assert_eq!(
            keymap.action_for(&key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(FormAction::RemoveRow)
        );
        assert_eq!(
            keymap.action_for(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(FormAction::Quit)
        );
        assert_eq!(keymap.action_for(&key(KeyCode::Char('d'), KeyModifiers::NONE)), None);
    }
}
