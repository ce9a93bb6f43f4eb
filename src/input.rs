use crossterm::event::{KeyCode, KeyModifiers};

use crate::document::Document;
use crate::persistence::SnapshotStore;
use crate::sections::{SECTION_COUNT, SectionId};
use crate::store::EditorStore;
use crate::text_edit::EditCommand;

/// The editable field that receives keystrokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Focus {
    #[default]
    Reference,
    Verses,
    Statement,
    Section(SectionId),
}

const FOCUS_ORDER: [Focus; 3 + SECTION_COUNT] = [
    Focus::Reference,
    Focus::Verses,
    Focus::Statement,
    Focus::Section(SectionId::Intro),
    Focus::Section(SectionId::Me),
    Focus::Section(SectionId::We1),
    Focus::Section(SectionId::God),
    Focus::Section(SectionId::You),
    Focus::Section(SectionId::We2),
    Focus::Section(SectionId::Out),
];

impl Focus {
    fn position(self) -> usize {
        FOCUS_ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0)
    }

    /// Next field, wrapping around after the last section.
    pub fn next(self) -> Self {
        FOCUS_ORDER[(self.position() + 1) % FOCUS_ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let len = FOCUS_ORDER.len();
        FOCUS_ORDER[(self.position() + len - 1) % len]
    }

    pub fn section(self) -> Option<SectionId> {
        match self {
            Focus::Section(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, Focus::Verses | Focus::Section(_))
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Reference => "Reference",
            Focus::Verses => "Verses",
            Focus::Statement => "One point",
            Focus::Section(id) => id.meta().title,
        }
    }

    pub fn text(self, document: &Document) -> &str {
        match self {
            Focus::Reference => &document.reference,
            Focus::Verses => &document.verses,
            Focus::Statement => &document.statement,
            Focus::Section(id) => &document.section(id).content,
        }
    }

    /// Routes a whole-field replacement to the matching store setter.
    pub fn write<S: SnapshotStore>(self, store: &mut EditorStore<S>, text: String) {
        match self {
            Focus::Reference => store.set_reference(text),
            Focus::Verses => store.set_verses(text),
            Focus::Statement => store.set_statement(text),
            Focus::Section(id) => store.set_section_content(id, text),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleLive,
    ResetTimer,
    Generate,
    Export,
    Import,
    ResetDocument,
    ToggleExpanded,
    FocusNext,
    FocusPrevious,
    Advance,
    Retreat,
    LeaveLive,
    Edit(EditCommand),
}

/// Translates a key press. Editing keys are swallowed while live so the
/// document stays read-only during delivery.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers, live: bool) -> Option<Action> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    match (code, ctrl) {
        (KeyCode::Char('q'), true) | (KeyCode::Char('c'), true) => return Some(Action::Quit),
        (KeyCode::Char('l'), true) => return Some(Action::ToggleLive),
        (KeyCode::Char('t'), true) => return Some(Action::ResetTimer),
        (KeyCode::Char('g'), true) => return Some(Action::Generate),
        (KeyCode::Char('e'), true) => return Some(Action::Export),
        (KeyCode::Char('u'), true) => return Some(Action::Import),
        (KeyCode::Char('r'), true) => return Some(Action::ResetDocument),
        (KeyCode::Char('o'), true) => return Some(Action::ToggleExpanded),
        (KeyCode::F(5), _) => return Some(Action::ToggleLive),
        _ => {}
    }

    if live {
        return match code {
            KeyCode::Down | KeyCode::Right | KeyCode::PageDown | KeyCode::Char(' ') => {
                Some(Action::Advance)
            }
            KeyCode::Up | KeyCode::Left | KeyCode::PageUp => Some(Action::Retreat),
            KeyCode::Esc => Some(Action::LeaveLive),
            _ => None,
        };
    }

    let command = match code {
        KeyCode::Tab => return Some(Action::FocusNext),
        KeyCode::BackTab => return Some(Action::FocusPrevious),
        KeyCode::Char('w') if ctrl => EditCommand::DeleteWordBackward,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(ch) => EditCommand::Insert(ch),
        KeyCode::Enter => EditCommand::Newline,
        KeyCode::Backspace if ctrl || alt => EditCommand::DeleteWordBackward,
        KeyCode::Backspace => EditCommand::Backspace,
        KeyCode::Delete => EditCommand::Delete,
        KeyCode::Left if ctrl || alt => EditCommand::WordLeft,
        KeyCode::Right if ctrl || alt => EditCommand::WordRight,
        KeyCode::Left => EditCommand::Left,
        KeyCode::Right => EditCommand::Right,
        KeyCode::Up => EditCommand::Up,
        KeyCode::Down => EditCommand::Down,
        KeyCode::Home => EditCommand::Home,
        KeyCode::End => EditCommand::End,
        _ => return None,
    };
    Some(Action::Edit(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, Persistence};

    #[test]
    fn focus_cycles_through_every_field() {
        let mut focus = Focus::Reference;
        let mut seen = Vec::new();
        for _ in 0..FOCUS_ORDER.len() {
            seen.push(focus);
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Reference);
        assert_eq!(seen, FOCUS_ORDER.to_vec());
        assert_eq!(Focus::Reference.previous(), Focus::Section(SectionId::Out));
    }

    #[test]
    fn only_verses_and_sections_take_newlines() {
        assert!(!Focus::Reference.is_multiline());
        assert!(!Focus::Statement.is_multiline());
        assert!(Focus::Verses.is_multiline());
        assert!(Focus::Section(SectionId::God).is_multiline());
    }

    #[test]
    fn write_goes_to_the_focused_field() {
        let mut store = EditorStore::open(Persistence::new(MemoryStore::new()));
        Focus::Statement.write(&mut store, "One thing".to_string());
        Focus::Section(SectionId::We2).write(&mut store, "Together".to_string());

        let document = store.document();
        assert_eq!(Focus::Statement.text(document), "One thing");
        assert_eq!(document.section(SectionId::We2).content, "Together");
        assert_eq!(store.persistence().backend().writes(), 2);
    }

    #[test]
    fn global_shortcuts_work_in_both_modes() {
        for live in [false, true] {
            assert_eq!(
                map_key(KeyCode::Char('l'), KeyModifiers::CONTROL, live),
                Some(Action::ToggleLive)
            );
            assert_eq!(
                map_key(KeyCode::Char('q'), KeyModifiers::CONTROL, live),
                Some(Action::Quit)
            );
        }
    }

    #[test]
    fn live_mode_swallows_editing_keys() {
        assert_eq!(map_key(KeyCode::Char('x'), KeyModifiers::NONE, true), None);
        assert_eq!(map_key(KeyCode::Backspace, KeyModifiers::NONE, true), None);
        assert_eq!(map_key(KeyCode::Tab, KeyModifiers::NONE, true), None);
        assert_eq!(
            map_key(KeyCode::Down, KeyModifiers::NONE, true),
            Some(Action::Advance)
        );
        assert_eq!(
            map_key(KeyCode::Left, KeyModifiers::NONE, true),
            Some(Action::Retreat)
        );
        assert_eq!(
            map_key(KeyCode::Esc, KeyModifiers::NONE, true),
            Some(Action::LeaveLive)
        );
    }

    #[test]
    fn editing_keys_map_to_commands() {
        assert_eq!(
            map_key(KeyCode::Char('a'), KeyModifiers::SHIFT, false),
            Some(Action::Edit(EditCommand::Insert('a')))
        );
        assert_eq!(
            map_key(KeyCode::Left, KeyModifiers::ALT, false),
            Some(Action::Edit(EditCommand::WordLeft))
        );
        assert_eq!(
            map_key(KeyCode::Char('w'), KeyModifiers::CONTROL, false),
            Some(Action::Edit(EditCommand::DeleteWordBackward))
        );
        assert_eq!(map_key(KeyCode::Char('k'), KeyModifiers::CONTROL, false), None);
        assert_eq!(
            map_key(KeyCode::BackTab, KeyModifiers::SHIFT, false),
            Some(Action::FocusPrevious)
        );
    }
}
