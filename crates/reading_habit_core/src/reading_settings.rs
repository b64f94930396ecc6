//! Typography and reading-aid preferences.
//!
//! Each setting is stored under its own `reading_<name>` key, so a missing or
//! unreadable value only resets that one setting.

use crate::error::StoreResult;
use crate::ports::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SETTING_KEY_PREFIX: &str = "reading_";

const FONT_SIZE: &str = "fontSize";
const FONT_WEIGHT: &str = "fontWeight";
const LETTER_SPACING: &str = "letterSpacing";
const FONT_FAMILY: &str = "fontFamily";
const PAGE_WIDTH: &str = "pageWidth";
const LINE_HEIGHT: &str = "lineHeight";
const THEME: &str = "theme";
const ENABLE_HAPTICS: &str = "enableHaptics";
const RULER_ENABLED: &str = "isRulerEnabled";
const RULER_HEIGHT: &str = "rulerHeight";
const RULER_INTENSITY: &str = "rulerIntensity";
const INFINITE_SCROLL: &str = "isInfiniteScrollEnabled";

pub const FONT_SIZE_RANGE: (u32, u32) = (12, 32);
pub const FONT_SIZE_STEP: u32 = 2;
pub const FONT_WEIGHT_RANGE: (u32, u32) = (100, 900);
pub const FONT_WEIGHT_STEP: u32 = 100;
pub const LETTER_SPACING_RANGE: (f64, f64) = (-2.0, 10.0);
pub const LETTER_SPACING_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Serif,
    Sans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageWidth {
    Narrow,
    Standard,
    #[default]
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Sepia,
    Dark,
    #[default]
    Black,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSettings {
    pub font_size: u32,
    pub font_weight: u32,
    pub letter_spacing: f64,
    pub font_family: FontFamily,
    pub page_width: PageWidth,
    pub line_height: f64,
    pub theme: Theme,
    pub enable_haptics: bool,
    pub ruler_enabled: bool,
    /// Height of the ruler window in pixels.
    pub ruler_height: u32,
    /// Opacity of the dimmed area around the ruler, `0.0..=1.0`.
    pub ruler_intensity: f64,
    pub infinite_scroll: bool,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            font_size: 24,
            font_weight: 400,
            letter_spacing: 0.0,
            font_family: FontFamily::default(),
            page_width: PageWidth::default(),
            line_height: 2.2,
            theme: Theme::default(),
            enable_haptics: true,
            ruler_enabled: false,
            ruler_height: 120,
            ruler_intensity: 0.6,
            infinite_scroll: true,
        }
    }
}

fn setting_key(name: &str) -> String {
    format!("{}{}", SETTING_KEY_PREFIX, name)
}

fn read_setting<S: KeyValueStore, T: DeserializeOwned>(store: &S, name: &str, default: T) -> T {
    let key = setting_key(name);
    match store.get(&key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable setting '{}': {}", key, e);
            default
        }),
        Ok(None) => default,
        Err(e) => {
            warn!("Failed to read setting '{}': {}", key, e);
            default
        }
    }
}

fn step_up<T: PartialOrd + std::ops::Add<Output = T> + Copy>(value: T, step: T, max: T) -> T {
    if value < max {
        let next = value + step;
        if next > max {
            max
        } else {
            next
        }
    } else {
        value
    }
}

fn step_down<T: PartialOrd + std::ops::Sub<Output = T> + Copy>(value: T, step: T, min: T) -> T {
    if value > min {
        let next = value - step;
        if next < min {
            min
        } else {
            next
        }
    } else {
        value
    }
}

pub struct ReadingSettingsStore<S> {
    store: S,
    settings: ReadingSettings,
}

impl<S: KeyValueStore> ReadingSettingsStore<S> {
    pub fn load(store: S) -> Self {
        let d = ReadingSettings::default();
        let settings = ReadingSettings {
            font_size: read_setting(&store, FONT_SIZE, d.font_size),
            font_weight: read_setting(&store, FONT_WEIGHT, d.font_weight),
            letter_spacing: read_setting(&store, LETTER_SPACING, d.letter_spacing),
            font_family: read_setting(&store, FONT_FAMILY, d.font_family),
            page_width: read_setting(&store, PAGE_WIDTH, d.page_width),
            line_height: read_setting(&store, LINE_HEIGHT, d.line_height),
            theme: read_setting(&store, THEME, d.theme),
            enable_haptics: read_setting(&store, ENABLE_HAPTICS, d.enable_haptics),
            ruler_enabled: read_setting(&store, RULER_ENABLED, d.ruler_enabled),
            ruler_height: read_setting(&store, RULER_HEIGHT, d.ruler_height),
            ruler_intensity: read_setting(&store, RULER_INTENSITY, d.ruler_intensity),
            infinite_scroll: read_setting(&store, INFINITE_SCROLL, d.infinite_scroll),
        };
        Self { store, settings }
    }

    pub fn settings(&self) -> &ReadingSettings {
        &self.settings
    }

    pub fn increase_font(&mut self) -> StoreResult<()> {
        let (_, max) = FONT_SIZE_RANGE;
        self.settings.font_size = step_up(self.settings.font_size, FONT_SIZE_STEP, max);
        self.write(FONT_SIZE, &self.settings.font_size)
    }

    pub fn decrease_font(&mut self) -> StoreResult<()> {
        let (min, _) = FONT_SIZE_RANGE;
        self.settings.font_size = step_down(self.settings.font_size, FONT_SIZE_STEP, min);
        self.write(FONT_SIZE, &self.settings.font_size)
    }

    pub fn increase_weight(&mut self) -> StoreResult<()> {
        let (_, max) = FONT_WEIGHT_RANGE;
        self.settings.font_weight = step_up(self.settings.font_weight, FONT_WEIGHT_STEP, max);
        self.write(FONT_WEIGHT, &self.settings.font_weight)
    }

    pub fn decrease_weight(&mut self) -> StoreResult<()> {
        let (min, _) = FONT_WEIGHT_RANGE;
        self.settings.font_weight = step_down(self.settings.font_weight, FONT_WEIGHT_STEP, min);
        self.write(FONT_WEIGHT, &self.settings.font_weight)
    }

    pub fn increase_spacing(&mut self) -> StoreResult<()> {
        let (_, max) = LETTER_SPACING_RANGE;
        self.settings.letter_spacing =
            step_up(self.settings.letter_spacing, LETTER_SPACING_STEP, max);
        self.write(LETTER_SPACING, &self.settings.letter_spacing)
    }

    pub fn decrease_spacing(&mut self) -> StoreResult<()> {
        let (min, _) = LETTER_SPACING_RANGE;
        self.settings.letter_spacing =
            step_down(self.settings.letter_spacing, LETTER_SPACING_STEP, min);
        self.write(LETTER_SPACING, &self.settings.letter_spacing)
    }

    pub fn set_font_family(&mut self, family: FontFamily) -> StoreResult<()> {
        self.settings.font_family = family;
        self.write(FONT_FAMILY, &family)
    }

    pub fn set_page_width(&mut self, width: PageWidth) -> StoreResult<()> {
        self.settings.page_width = width;
        self.write(PAGE_WIDTH, &width)
    }

    pub fn set_line_height(&mut self, height: f64) -> StoreResult<()> {
        self.settings.line_height = height;
        self.write(LINE_HEIGHT, &height)
    }

    pub fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        self.settings.theme = theme;
        self.write(THEME, &theme)
    }

    pub fn toggle_haptics(&mut self) -> StoreResult<()> {
        self.settings.enable_haptics = !self.settings.enable_haptics;
        self.write(ENABLE_HAPTICS, &self.settings.enable_haptics)
    }

    pub fn toggle_ruler(&mut self) -> StoreResult<()> {
        self.settings.ruler_enabled = !self.settings.ruler_enabled;
        self.write(RULER_ENABLED, &self.settings.ruler_enabled)
    }

    pub fn set_ruler_height(&mut self, height: u32) -> StoreResult<()> {
        self.settings.ruler_height = height;
        self.write(RULER_HEIGHT, &height)
    }

    pub fn set_ruler_intensity(&mut self, intensity: f64) -> StoreResult<()> {
        self.settings.ruler_intensity = intensity;
        self.write(RULER_INTENSITY, &intensity)
    }

    pub fn toggle_infinite_scroll(&mut self) -> StoreResult<()> {
        self.settings.infinite_scroll = !self.settings.infinite_scroll;
        self.write(INFINITE_SCROLL, &self.settings.infinite_scroll)
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&setting_key(name), &raw)?;
        Ok(())
    }
}
