use eframe::egui;

use crate::config::{JokeType, Settings, ANY_CATEGORY};

/// Categories the joke service offers besides the `Any` sentinel.
pub const AVAILABLE_CATEGORIES: &[&str] =
    &["Misc", "Programming", "Dark", "Pun", "Spooky", "Christmas"];

/// Languages the joke service can answer in.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("German", "de"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("Italian", "it"),
];

pub enum SettingsAction {
    /// The user saved; the app persists and applies these settings.
    Save(Settings),
}

/// Modal settings window editing a draft copy of the settings.
///
/// Nothing touches the live settings until Save resolves the draft.
pub struct SettingsPanel {
    open: bool,
    draft: Settings,
    use_any_category: bool,
    category_checks: Vec<(&'static str, bool)>,
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self {
            open: false,
            draft: Settings::default(),
            use_any_category: true,
            category_checks: AVAILABLE_CATEGORIES.iter().map(|c| (*c, false)).collect(),
        }
    }
}

impl SettingsPanel {
    /// Open the window with a draft seeded from the current settings.
    pub fn open_with(&mut self, current: &Settings) {
        self.draft = current.clone();
        self.use_any_category = current.wants_any_category();
        self.category_checks = AVAILABLE_CATEGORIES
            .iter()
            .map(|c| {
                let checked =
                    !self.use_any_category && current.categories.iter().any(|x| x == c);
                (*c, checked)
            })
            .collect();
        self.open = true;
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<SettingsAction> {
        if !self.open {
            return None;
        }

        let mut keep_open = true;
        let mut saved = None;
        let mut cancelled = false;

        egui::Window::new("Settings")
            .open(&mut keep_open)
            .collapsible(false)
            .default_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(440.0).show(ui, |ui| {
                    self.sections(ui);
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save Settings").clicked() {
                        saved = Some(self.resolved());
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        self.open = keep_open && !cancelled && saved.is_none();
        saved.map(SettingsAction::Save)
    }

    fn sections(&mut self, ui: &mut egui::Ui) {
        ui.strong("Notification Frequency");
        ui.label(format!(
            "Show a joke every {} minutes",
            self.draft.frequency_minutes
        ));
        ui.add(egui::Slider::new(&mut self.draft.frequency_minutes, 1..=120).text("minutes"));
        ui.horizontal(|ui| {
            ui.label("Quick select:");
            for minutes in [5u32, 15, 30, 60] {
                if ui.button(format!("{minutes}m")).clicked() {
                    self.draft.frequency_minutes = minutes;
                }
            }
        });
        ui.separator();

        ui.strong("Joke Categories");
        ui.radio_value(&mut self.use_any_category, true, "Any category (random selection)");
        ui.radio_value(&mut self.use_any_category, false, "Specific categories:");
        ui.add_enabled_ui(!self.use_any_category, |ui| {
            ui.indent("categories", |ui| {
                for (name, checked) in &mut self.category_checks {
                    ui.checkbox(checked, *name);
                }
            });
        });
        ui.separator();

        ui.strong("Content Filter");
        ui.checkbox(
            &mut self.draft.safe_mode,
            "Safe mode (filter potentially offensive jokes)",
        );
        ui.weak("Religious, racist, sexist and explicit jokes are always blacklisted.");
        ui.separator();

        ui.strong("Joke Type");
        for joke_type in JokeType::all() {
            ui.radio_value(&mut self.draft.joke_type, joke_type, joke_type.display_name());
        }
        ui.separator();

        ui.strong("Language");
        egui::ComboBox::from_id_salt("joke_language")
            .selected_text(language_label(&self.draft.language))
            .show_ui(ui, |ui| {
                for (label, code) in LANGUAGES {
                    ui.selectable_value(&mut self.draft.language, (*code).to_string(), *label);
                }
            });
        ui.separator();

        ui.strong("Advanced Options");
        ui.checkbox(
            &mut self.draft.autostart,
            "Start notifications automatically when app launches",
        );
        ui.add(
            egui::Slider::new(&mut self.draft.notification_duration_seconds, 1..=30)
                .text("notification seconds"),
        );
        ui.add(egui::Slider::new(&mut self.draft.max_history, 5..=50).text("jokes kept in history"));
    }

    /// Fold the widget state back into a valid `Settings`.
    fn resolved(&self) -> Settings {
        let mut settings = self.draft.clone();

        settings.categories = if self.use_any_category {
            vec![ANY_CATEGORY.to_string()]
        } else {
            let selected: Vec<String> = self
                .category_checks
                .iter()
                .filter(|(_, checked)| *checked)
                .map(|(name, _)| (*name).to_string())
                .collect();
            if selected.is_empty() {
                // Nothing ticked in specific mode falls back to Misc.
                vec!["Misc".to_string()]
            } else {
                selected
            }
        };

        settings.normalize();
        settings
    }
}

fn language_label(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(label, _)| *label)
        .unwrap_or("English")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_any_category() {
        let mut panel = SettingsPanel::default();
        panel.open_with(&Settings::default());
        assert_eq!(panel.resolved().categories, vec![ANY_CATEGORY.to_string()]);
    }

    #[test]
    fn test_resolved_keeps_checked_categories_in_order() {
        let mut panel = SettingsPanel::default();
        panel.open_with(&Settings {
            categories: vec!["Programming".to_string(), "Pun".to_string()],
            ..Settings::default()
        });
        assert!(!panel.use_any_category);
        assert_eq!(
            panel.resolved().categories,
            vec!["Programming".to_string(), "Pun".to_string()]
        );
    }

    #[test]
    fn test_resolved_empty_selection_falls_back_to_misc() {
        let mut panel = SettingsPanel::default();
        panel.open_with(&Settings::default());
        panel.use_any_category = false;
        assert_eq!(panel.resolved().categories, vec!["Misc".to_string()]);
    }
}
