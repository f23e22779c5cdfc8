use eframe::egui;

use crate::history::JokeHistory;
use crate::jokeapi::JokeRecord;

/// Longest row before the joke text is elided.
const ROW_TEXT_MAX_CHARS: usize = 60;

/// Recent-jokes list plus the detail window for a clicked entry.
#[derive(Default)]
pub struct HistoryPanel {
    selected: Option<JokeRecord>,
    copy_feedback: Option<String>,
}

impl HistoryPanel {
    pub fn show_list(&mut self, ui: &mut egui::Ui, history: &JokeHistory) {
        if history.is_empty() {
            ui.weak("No jokes yet. Press Start Notifications to begin.");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(240.0)
            .show(ui, |ui| {
                for record in history.iter() {
                    let response = ui.selectable_label(false, row_label(record));
                    if response.on_hover_text("Click for the full joke").clicked() {
                        self.selected = Some(record.clone());
                        self.copy_feedback = None;
                    }
                }
            });
    }

    /// Detail window for the selected joke, if any.
    pub fn show_detail(&mut self, ctx: &egui::Context) {
        let Some(record) = self.selected.clone() else {
            return;
        };

        let mut keep_open = true;
        let mut closed = false;

        egui::Window::new("Joke Detail")
            .open(&mut keep_open)
            .collapsible(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let category = if record.category.is_empty() {
                        "(none)"
                    } else {
                        record.category.as_str()
                    };
                    ui.weak(format!("Category: {category}"));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(format!("Time: {}", record.timestamp));
                    });
                });
                ui.separator();
                ui.label(&record.text);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Copy to clipboard").clicked() {
                        self.copy_feedback = Some(match copy_to_clipboard(&record.text) {
                            Ok(()) => "Copied".to_string(),
                            Err(e) => format!("Copy failed: {e}"),
                        });
                    }
                    if ui.button("Close").clicked() {
                        closed = true;
                    }
                    if let Some(feedback) = &self.copy_feedback {
                        ui.weak(feedback);
                    }
                });
            });

        if !keep_open || closed {
            self.selected = None;
            self.copy_feedback = None;
        }
    }
}

fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

/// `[time] text` row with the twopart blank line collapsed and long text
/// elided to fit the list.
pub fn row_label(record: &JokeRecord) -> String {
    let flat = record.text.replace("\n\n", " - ");
    let text = if flat.chars().count() > ROW_TEXT_MAX_CHARS {
        let head: String = flat.chars().take(ROW_TEXT_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        flat
    };
    format!("[{}] {}", record.timestamp, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> JokeRecord {
        JokeRecord {
            text: text.to_string(),
            category: "Pun".to_string(),
            timestamp: "02:30 PM".to_string(),
            id: "1".to_string(),
        }
    }

    #[test]
    fn test_row_label_short_text_passes_through() {
        assert_eq!(row_label(&record("Short one")), "[02:30 PM] Short one");
    }

    #[test]
    fn test_row_label_collapses_twopart_break() {
        assert_eq!(row_label(&record("S\n\nD")), "[02:30 PM] S - D");
    }

    #[test]
    fn test_row_label_elides_long_text() {
        let long = "x".repeat(100);
        let label = row_label(&record(&long));
        assert!(label.ends_with("..."));
        // Timestamp prefix plus the elided text.
        assert_eq!(label.chars().count(), "[02:30 PM] ".len() + ROW_TEXT_MAX_CHARS);
    }
}
