// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Global undo/redo shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
}

/// Maps a key press to a history shortcut.
///
/// Ctrl or Cmd (reported as `SUPER`) plus `z` undoes. Plus `y`, or plus Shift and `z`, redoes.
/// Key releases are ignored.
pub fn shortcut_for(key: KeyEvent) -> Option<Shortcut> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let command = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
    if !command {
        return None;
    }
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('z') if !shift => Some(Shortcut::Undo),
        // Terminals disagree on whether Shift is also reported for the uppercase letter.
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Shortcut::Redo),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Shortcut::Redo),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use rstest::rstest;

    use super::{shortcut_for, Shortcut};

    #[rstest]
    #[case::ctrl_z(KeyCode::Char('z'), KeyModifiers::CONTROL, Some(Shortcut::Undo))]
    #[case::cmd_z(KeyCode::Char('z'), KeyModifiers::SUPER, Some(Shortcut::Undo))]
    #[case::ctrl_y(KeyCode::Char('y'), KeyModifiers::CONTROL, Some(Shortcut::Redo))]
    #[case::cmd_y(KeyCode::Char('y'), KeyModifiers::SUPER, Some(Shortcut::Redo))]
    #[case::ctrl_shift_z(
        KeyCode::Char('Z'),
        KeyModifiers::CONTROL.union(KeyModifiers::SHIFT),
        Some(Shortcut::Redo)
    )]
    #[case::ctrl_shift_lower_z(
        KeyCode::Char('z'),
        KeyModifiers::CONTROL.union(KeyModifiers::SHIFT),
        Some(Shortcut::Redo)
    )]
    #[case::cmd_shift_z(
        KeyCode::Char('Z'),
        KeyModifiers::SUPER.union(KeyModifiers::SHIFT),
        Some(Shortcut::Redo)
    )]
    #[case::plain_z(KeyCode::Char('z'), KeyModifiers::NONE, None)]
    #[case::alt_z(KeyCode::Char('z'), KeyModifiers::ALT, None)]
    #[case::ctrl_x(KeyCode::Char('x'), KeyModifiers::CONTROL, None)]
    fn maps_history_shortcuts(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: Option<Shortcut>,
    ) {
        assert_eq!(shortcut_for(KeyEvent::new(code, modifiers)), expected);
    }

    #[test]
    fn ignores_key_release() {
        let mut key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Release;
        assert_eq!(shortcut_for(key), None);
    }
}
