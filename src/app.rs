use eframe::egui;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

use crate::config::{Settings, SettingsStore};
use crate::history::JokeHistory;
use crate::jokeapi::JokeClient;
use crate::notify::Notifier;
use crate::poller::{PollerHandle, PollerMessage, PollerState};
use crate::ui::history_panel::HistoryPanel;
use crate::ui::settings_panel::{SettingsAction, SettingsPanel};
use crate::APP_NAME;

/// Main application state.
///
/// The poller task never touches this directly: everything it produces
/// arrives through the message channel and is drained once per frame.
pub struct JokeNotifierApp {
    runtime: Handle,

    /// Producer side, cloned into every spawned task.
    backend_tx: mpsc::Sender<PollerMessage>,
    backend_rx: mpsc::Receiver<PollerMessage>,

    store: SettingsStore,
    settings: Settings,

    client: Arc<JokeClient>,
    notifier: Arc<Notifier>,

    poller_state: PollerState,
    poller: Option<PollerHandle>,

    history: JokeHistory,

    status_message: String,
    /// Countdown line, present only while running.
    countdown: Option<String>,

    settings_panel: SettingsPanel,
    history_panel: HistoryPanel,

    /// Pending notification that fell back to in-app delivery.
    fallback_popup: Option<(String, String)>,
    show_about: bool,
}

impl JokeNotifierApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, runtime: Handle) -> anyhow::Result<Self> {
        let (backend_tx, backend_rx) = mpsc::channel::<PollerMessage>();

        let store = SettingsStore::at_default_location();
        let mut load_status = None;
        let settings = store.load().unwrap_or_else(|e| {
            load_status = Some(format!("Error loading settings: {e}"));
            Settings::default()
        });
        let client = Arc::new(JokeClient::new()?);
        let notifier = Arc::new(Notifier::probe(backend_tx.clone()));

        let mut app = Self {
            runtime,
            backend_tx,
            backend_rx,
            store,
            history: JokeHistory::new(settings.max_history),
            settings,
            client,
            notifier,
            poller_state: PollerState::Stopped,
            poller: None,
            status_message: load_status.unwrap_or_else(|| "Ready to start".to_string()),
            countdown: None,
            settings_panel: SettingsPanel::default(),
            history_panel: HistoryPanel::default(),
            fallback_popup: None,
            show_about: false,
        };

        if app.settings.autostart {
            app.start_notifications();
        }

        Ok(app)
    }

    fn is_running(&self) -> bool {
        self.poller_state == PollerState::Running
    }

    pub fn start_notifications(&mut self) {
        if self.is_running() {
            return;
        }

        let handle = PollerHandle::spawn(
            &self.runtime,
            self.settings.clone(),
            self.client.clone(),
            self.notifier.clone(),
            self.backend_tx.clone(),
        );
        self.poller = Some(handle);
        self.poller_state = PollerState::Running;
        self.status_message = "Running - delivering jokes".to_string();
    }

    pub fn stop_notifications(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.poller_state = PollerState::Stopped;
        self.countdown = None;
        self.status_message = "Stopped".to_string();
    }

    fn toggle_notifications(&mut self) {
        if self.is_running() {
            self.stop_notifications();
        } else {
            self.start_notifications();
        }
    }

    pub fn send_test_notification(&mut self) {
        let notifier = self.notifier.clone();
        let tx = self.backend_tx.clone();
        let duration = Duration::from_secs(u64::from(self.settings.notification_duration_seconds));

        self.runtime.spawn(async move {
            let delivered = notifier.notify(
                "Test Notification",
                "This is a test notification from Joke Notifier. \
                 If you can see this, notifications are working!",
                duration,
            );
            let status = match delivered {
                Some(backend) => format!("Test notification sent via {backend}"),
                None => "Test notification failed on every backend".to_string(),
            };
            let _ = tx.send(PollerMessage::Status(status));
        });
    }

    /// Persist and apply settings saved in the panel. A running poller is
    /// replaced so the new cadence and filters take effect now; the
    /// countdown restarts from zero.
    pub fn apply_settings(&mut self, new_settings: Settings) {
        let was_running = self.is_running();
        let changed = self.settings != new_settings;

        self.settings = new_settings;
        self.history.set_capacity(self.settings.max_history);

        if was_running && changed {
            self.stop_notifications();
            self.start_notifications();
        }

        match self.store.save(&self.settings) {
            Ok(()) => self.status_message = "Settings saved".to_string(),
            Err(e) => self.status_message = format!("Error saving settings: {e}"),
        }
    }

    /// Drain messages from the poller task.
    fn process_backend_messages(&mut self) {
        while let Ok(msg) = self.backend_rx.try_recv() {
            match msg {
                PollerMessage::Status(status) => {
                    self.status_message = status;
                }
                PollerMessage::Countdown(countdown) => {
                    if self.is_running() {
                        self.countdown = Some(countdown);
                    }
                }
                PollerMessage::Joke(record) => {
                    self.history.push(record);
                }
                PollerMessage::FallbackNotification { title, body } => {
                    self.fallback_popup = Some((title, body));
                }
            }
        }

        // A task that ended without a stop request (panic) must not leave
        // the UI claiming to be running.
        if self.is_running() {
            if let Some(poller) = &self.poller {
                if poller.is_finished() {
                    tracing::warn!("Poller task ended unexpectedly");
                    self.poller = None;
                    self.poller_state = PollerState::Stopped;
                    self.countdown = None;
                    self.status_message = "Stopped".to_string();
                }
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.settings_panel.open_with(&self.settings);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(APP_NAME);
                status_dot(ui, self.is_running());
            });
            ui.label(
                "Get jokes as desktop notifications while you work. \
                 Jokes are filtered to avoid offensive content.",
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let toggle_label = if self.is_running() {
                    "Stop Notifications"
                } else {
                    "Start Notifications"
                };
                if ui.button(toggle_label).clicked() {
                    self.toggle_notifications();
                }
                if ui.button("Test Notification").clicked() {
                    self.send_test_notification();
                }
                if ui.button("Settings").clicked() {
                    self.settings_panel.open_with(&self.settings);
                }
            });
            ui.add_space(8.0);

            ui.group(|ui| {
                ui.strong("Status");
                ui.label(&self.status_message);
                if let Some(countdown) = &self.countdown {
                    ui.label(countdown);
                }
            });
            ui.add_space(8.0);

            ui.group(|ui| {
                ui.strong("Recent Jokes");
                self.history_panel.show_list(ui, &self.history);
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::RIGHT), |ui| {
                ui.weak("Powered by JokeAPI (https://jokeapi.dev)");
            });
        });
    }

    fn fallback_popup_window(&mut self, ctx: &egui::Context) {
        let Some((title, body)) = self.fallback_popup.clone() else {
            return;
        };

        let mut keep_open = true;
        let mut dismissed = false;

        egui::Window::new(title)
            .id(egui::Id::new("fallback_notification"))
            .open(&mut keep_open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(body);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if !keep_open || dismissed {
            self.fallback_popup = None;
        }
    }

    fn about_window(&mut self, ctx: &egui::Context) {
        if !self.show_about {
            return;
        }

        let mut open = self.show_about;
        egui::Window::new("About")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(APP_NAME);
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.label("Delivers jokes from JokeAPI as desktop notifications.");
                ui.hyperlink("https://jokeapi.dev");
            });
        self.show_about = open;
    }
}

impl eframe::App for JokeNotifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_backend_messages();

        // The countdown advances without any input events.
        ctx.request_repaint_after(Duration::from_millis(250));

        ctx.set_visuals(egui::Visuals::dark());

        self.menu_bar(ctx);
        self.central_panel(ctx);

        if let Some(SettingsAction::Save(new_settings)) = self.settings_panel.show(ctx) {
            self.apply_settings(new_settings);
        }
        self.history_panel.show_detail(ctx);
        self.fallback_popup_window(ctx);
        self.about_window(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.stop_notifications();
        if let Err(e) = self.store.save(&self.settings) {
            tracing::warn!("Failed to save settings on exit: {}", e);
        }
    }
}

/// Green/red dot beside the title mirroring the poller state.
fn status_dot(ui: &mut egui::Ui, running: bool) {
    let (rect, _response) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
    let color = if running {
        egui::Color32::from_rgb(80, 200, 120)
    } else {
        egui::Color32::from_rgb(220, 80, 80)
    };
    ui.painter().circle_filled(rect.center(), 6.0, color);
}
