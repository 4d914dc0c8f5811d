// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    QuickLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub focus: Focus,
    pub selected_link: usize,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            focus: Focus::Input,
            selected_link: 0,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ToggleFocus,
    NextLink { link_count: usize },
    PrevLink { link_count: usize },
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FocusChanged(Focus),
    LinkSelected(usize),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Input => Focus::QuickLinks,
                    Focus::QuickLinks => Focus::Input,
                };
                vec![AppEvent::FocusChanged(self.focus)]
            }
            AppCommand::NextLink { link_count } => self.rotate_link(1, link_count),
            AppCommand::PrevLink { link_count } => self.rotate_link(-1, link_count),
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_link(&mut self, delta: isize, link_count: usize) -> Vec<AppEvent> {
        if link_count == 0 {
            return Vec::new();
        }
        let len = link_count as isize;
        let current = (self.selected_link as isize).min(len - 1);
        self.selected_link = (current + delta).rem_euclid(len) as usize;
        vec![AppEvent::LinkSelected(self.selected_link)]
    }
}
