use std::time::{Duration, Instant};

use client_core::{BulkDeleteOutcome, ListState};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::{Filter, OwnerId, Todo, TodoId};
use tracing::debug;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent, orchestration::dispatch_backend_command, reducer::apply_ui_event,
};

const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub enum Startup {
    Ready {
        owner: OwnerId,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    },
    MissingOwner {
        reason: String,
    },
}

enum View {
    MissingOwner(String),
    List(ListView),
}

struct ListView {
    state: ListState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    focus_input: bool,
}

enum RowAction {
    Delete(TodoId),
}

pub struct TodoApp {
    view: View,
    status: String,
}

impl TodoApp {
    pub fn new(startup: Startup) -> Self {
        let mut status = String::new();
        let view = match startup {
            Startup::MissingOwner { reason } => View::MissingOwner(reason),
            Startup::Ready {
                owner,
                cmd_tx,
                ui_rx,
            } => {
                let mut list = ListView {
                    state: ListState::new(owner),
                    cmd_tx,
                    ui_rx,
                    focus_input: true,
                };
                list.request_load(&mut status);
                View::List(list)
            }
        };
        Self { view, status }
    }
}

impl ListView {
    fn process_ui_events(&mut self, status: &mut String) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let effects = apply_ui_event(&mut self.state, status, event);
            self.focus_input |= effects.refocus_input;
        }
    }

    fn request_load(&mut self, status: &mut String) {
        self.state.begin_load();
        if !dispatch_backend_command(&self.cmd_tx, BackendCommand::Load, status) {
            if let Err(err) = self.state.finish_load(Err::<Vec<Todo>, _>(())) {
                debug!(%err, "load was not queued");
            }
        }
    }

    fn submit_title(&mut self, status: &mut String) {
        let typed = self.state.title_input().to_string();
        match self.state.begin_create(&typed) {
            Ok(body) => {
                if !dispatch_backend_command(&self.cmd_tx, BackendCommand::Create(body), status) {
                    if let Err(err) = self.state.finish_create(Err::<Todo, _>(())) {
                        debug!(%err, "create was not queued");
                    }
                    self.focus_input = true;
                }
            }
            Err(_) => self.focus_input = true,
        }
    }

    fn request_delete(&mut self, id: TodoId, status: &mut String) {
        self.state.begin_delete(id);
        if !dispatch_backend_command(&self.cmd_tx, BackendCommand::Delete(id), status) {
            if let Err(err) = self.state.finish_delete(id, Err(())) {
                debug!(%err, todo_id = id.0, "delete was not queued");
            }
            self.focus_input = true;
        }
    }

    fn request_clear_completed(&mut self, status: &mut String) {
        let ids = self.state.begin_clear_completed();
        if ids.is_empty() {
            return;
        }
        let cmd = BackendCommand::ClearCompleted(ids.clone());
        if !dispatch_backend_command(&self.cmd_tx, cmd, status) {
            let outcome = BulkDeleteOutcome {
                deleted: Vec::new(),
                failed: ids,
            };
            if let Err(err) = self.state.finish_clear_completed(&outcome) {
                debug!(%err, "clear completed was not queued");
            }
        }
    }

    fn show(&mut self, ctx: &egui::Context, status: &mut String) {
        let now = Instant::now();
        self.state.banner_mut().expire(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading("todos"));
            ui.add_space(8.0);

            self.show_header(ui, status);
            ui.separator();

            let mut actions = Vec::new();
            egui::ScrollArea::vertical()
                .auto_shrink([false, true])
                .max_height((ui.available_height() - 80.0).max(60.0))
                .show(ui, |ui| {
                    for todo in self.state.visible() {
                        show_row(ui, todo, self.state.is_busy(todo), &mut actions);
                    }
                    if let Some(placeholder) = self.state.placeholder() {
                        show_row(ui, placeholder, true, &mut actions);
                    }
                });
            for action in actions {
                match action {
                    RowAction::Delete(id) => self.request_delete(id, status),
                }
            }

            if self.state.shows_footer() {
                ui.separator();
                self.show_footer(ui, status);
            }

            self.show_banner(ui, now);

            if !status.is_empty() {
                ui.add_space(6.0);
                ui.small(egui::RichText::new(status.as_str()).weak());
            }
        });

        let repaint = self
            .state
            .banner()
            .remaining_at(now)
            .map_or(IDLE_REPAINT, |left| left.min(IDLE_REPAINT));
        ctx.request_repaint_after(repaint);
    }

    fn show_header(&mut self, ui: &mut egui::Ui, status: &mut String) {
        let mut submit = false;
        ui.horizontal(|ui| {
            if !self.state.items().is_empty() {
                let mut all_completed = self.state.all_completed();
                ui.add_enabled(false, egui::Checkbox::without_text(&mut all_completed));
            }

            let enabled = !self.state.is_input_disabled();
            let response = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(self.state.title_input_mut())
                    .hint_text("What needs to be done?")
                    .desired_width(f32::INFINITY),
            );
            if self.focus_input && enabled {
                response.request_focus();
                self.focus_input = false;
            }
            submit = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        });

        if submit {
            self.submit_title(status);
        }
    }

    fn show_footer(&mut self, ui: &mut egui::Ui, status: &mut String) {
        let mut clear = false;
        ui.horizontal(|ui| {
            ui.label(format!("{} items left", self.state.active_count()));
            ui.add_space(12.0);

            let mut filter = self.state.filter();
            for option in Filter::ALL {
                ui.selectable_value(&mut filter, option, option.label());
            }
            self.state.set_filter(filter);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                clear = ui
                    .add_enabled(
                        self.state.has_completed() && !self.state.is_clearing_completed(),
                        egui::Button::new("Clear completed"),
                    )
                    .clicked();
            });
        });

        if clear {
            self.request_clear_completed(status);
        }
    }

    fn show_banner(&mut self, ui: &mut egui::Ui, now: Instant) {
        let Some(error) = self.state.banner().visible_at(now) else {
            return;
        };

        ui.add_space(8.0);
        let mut dismissed = false;
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(error.message()).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        dismissed = ui.small_button("×").clicked();
                    });
                });
            });
        if dismissed {
            self.state.banner_mut().dismiss();
        }
    }
}

fn show_row(ui: &mut egui::Ui, todo: &Todo, busy: bool, actions: &mut Vec<RowAction>) {
    ui.horizontal(|ui| {
        let mut completed = todo.completed;
        ui.add_enabled(false, egui::Checkbox::without_text(&mut completed));

        let title = egui::RichText::new(&todo.title);
        let title = if todo.completed {
            title.strikethrough().weak()
        } else {
            title
        };
        ui.label(title);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if busy {
                ui.spinner();
            } else if ui.small_button("×").clicked() {
                actions.push(RowAction::Delete(todo.id));
            }
        });
    });
}

fn show_missing_owner(ctx: &egui::Context, reason: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("No owner configured");
            ui.add_space(8.0);
            ui.label(reason);
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(
                    "Start the app with --owner-id, set TODO_OWNER_ID, or add `owner_id = <id>` to todo.toml.",
                )
                .weak(),
            );
        });
    });
}

impl eframe::App for TodoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match &mut self.view {
            View::MissingOwner(reason) => show_missing_owner(ctx, reason),
            View::List(list) => {
                list.process_ui_events(&mut self.status);
                list.show(ctx, &mut self.status);
            }
        }
    }
}
