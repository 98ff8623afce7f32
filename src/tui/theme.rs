// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt, str::FromStr};

use ratatui::style::{Color, Modifier, Style};

use crate::notice::NoticeLevel;

const PALETTE_ENV: &str = "PANORAMA_PALETTE";

/// Panel styles. Uses the terminal's own colors unless a palette is set through
/// `PANORAMA_PALETTE`.
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let raw = match env::var(PALETTE_ENV) {
            Ok(raw) => raw,
            Err(env::VarError::NotPresent) => return Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: PALETTE_ENV,
                    reason: "value is not valid unicode".to_owned(),
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let palette = raw
            .parse::<TuiPalette>()
            .map_err(|reason| ThemeError::InvalidEnv {
                name: PALETTE_ENV,
                reason,
            })?;
        Ok(Self {
            palette: Some(palette),
        })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn color(&self, slot: Slot) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi[slot as usize],
            None => slot.terminal_color(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.color(Slot::Green))
        } else {
            self.base_style()
        }
    }

    pub(crate) fn cursor_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    /// Row that will receive the dragged view as a child.
    pub(crate) fn drop_target_style(&self) -> Style {
        self.base_style()
            .fg(self.color(Slot::Black))
            .bg(self.color(Slot::Cyan))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn dim_style(&self) -> Style {
        self.base_style().fg(self.color(Slot::BrightBlack))
    }

    pub(crate) fn notice_style(&self, level: NoticeLevel) -> Style {
        let slot = match level {
            NoticeLevel::Info => return self.base_style(),
            NoticeLevel::Success => Slot::Green,
            NoticeLevel::Warning => Slot::Yellow,
            NoticeLevel::Error => Slot::Red,
        };
        self.base_style().fg(self.color(slot))
    }
}

/// The ANSI table entries the panel draws with. Discriminants are table indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Cyan = 6,
    BrightBlack = 8,
}

impl Slot {
    fn terminal_color(self) -> Color {
        match self {
            Self::Black => Color::Black,
            Self::Red => Color::Red,
            Self::Green => Color::Green,
            Self::Yellow => Color::Yellow,
            Self::Cyan => Color::Cyan,
            Self::BrightBlack => Color::DarkGray,
        }
    }
}

/// `fg,bg` followed by the 16 ANSI colors, each as `#rrggbb`, `0xrrggbb` or `rgb:rr/gg/bb`.
#[derive(Debug, Clone, PartialEq)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl FromStr for TuiPalette {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let colors = value
            .split(',')
            .map(parse_color)
            .collect::<Result<Vec<_>, _>>()?;
        let [fg, bg, ansi @ ..] = colors.as_slice() else {
            return Err(format!("expected 18 colors (fg, bg, 16 ansi), got {}", colors.len()));
        };
        let ansi: [Color; 16] = ansi
            .try_into()
            .map_err(|_| format!("expected 18 colors (fg, bg, 16 ansi), got {}", colors.len()))?;
        Ok(Self {
            fg: *fg,
            bg: *bg,
            ansi,
        })
    }
}

fn parse_color(raw: &str) -> Result<Color, String> {
    let raw = raw.trim();
    let lower = raw.to_ascii_lowercase();

    let channels = if let Some(xrgb) = lower.strip_prefix("rgb:") {
        // X11 style allows 2 or 4 hex digits per channel; keep the high byte.
        xrgb.split('/')
            .map(|part| match part.len() {
                2 | 4 => hex_byte(part.get(..2)?),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()
    } else {
        let hex = lower
            .strip_prefix('#')
            .or_else(|| lower.strip_prefix("0x"))
            .unwrap_or(&lower);
        if hex.len() == 6 {
            (0..3)
                .map(|i| hex_byte(hex.get(i * 2..i * 2 + 2)?))
                .collect::<Option<Vec<u8>>>()
        } else {
            None
        }
    };

    match channels.as_deref() {
        Some(&[r, g, b]) => Ok(Color::Rgb(r, g, b)),
        _ => Err(format!("invalid color {raw:?} (expected #rrggbb or rgb:rr/gg/bb)")),
    }
}

fn hex_byte(pair: &str) -> Option<u8> {
    if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(pair, 16).ok()
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: &'static str, reason: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, reason } => write!(f, "invalid {name}: {reason}"),
        }
    }
}

impl Error for ThemeError {}
