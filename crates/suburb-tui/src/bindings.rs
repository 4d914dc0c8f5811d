// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use suburb_app::{Focus, QuickLink};

pub const MAX_QUICK_LINKS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Quit,
    ToggleFocus,
    SubmitInput,
    InsertChar(char),
    DeleteChar,
    ClearInput,
    NextLink,
    PrevLink,
    ActivateQuickLink(usize),
}

/// Startup-only half of the key wiring. `bind` consumes it, so the bindings
/// exist at most once per binder.
#[derive(Debug, Clone)]
pub struct EventBinder {
    quick_links: Vec<QuickLink>,
}

impl EventBinder {
    pub fn new(quick_links: Vec<QuickLink>) -> Self {
        Self { quick_links }
    }

    pub fn bind(self) -> Bindings {
        let mut quick_links = self.quick_links;
        quick_links.truncate(MAX_QUICK_LINKS);
        Bindings { quick_links }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    quick_links: Vec<QuickLink>,
}

impl Bindings {
    pub fn quick_links(&self) -> &[QuickLink] {
        &self.quick_links
    }

    pub fn quick_link(&self, index: usize) -> Option<&QuickLink> {
        self.quick_links.get(index)
    }

    pub fn resolve(&self, focus: Focus, selected_link: usize, key: KeyEvent) -> Option<UiAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => Some(UiAction::Quit),
                KeyCode::Char('u') if focus == Focus::Input => Some(UiAction::ClearInput),
                _ => None,
            };
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            return match key.code {
                KeyCode::Char(digit @ '1'..='9') => {
                    let index = (digit as usize) - ('1' as usize);
                    (index < self.quick_links.len()).then_some(UiAction::ActivateQuickLink(index))
                }
                _ => None,
            };
        }

        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            return Some(UiAction::ToggleFocus);
        }

        match focus {
            Focus::Input => match key.code {
                KeyCode::Enter => Some(UiAction::SubmitInput),
                KeyCode::Backspace => Some(UiAction::DeleteChar),
                KeyCode::Char(ch) => Some(UiAction::InsertChar(ch)),
                _ => None,
            },
            Focus::QuickLinks => match key.code {
                KeyCode::Enter if selected_link < self.quick_links.len() => {
                    Some(UiAction::ActivateQuickLink(selected_link))
                }
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
                    Some(UiAction::NextLink)
                }
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
                    Some(UiAction::PrevLink)
                }
                KeyCode::Esc => Some(UiAction::ToggleFocus),
                _ => None,
            },
        }
    }
}
