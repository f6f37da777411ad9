// src/ui.rs
use eframe::{App, egui};
use egui::emath::RectTransform;
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2, vec2};
use indigram::{AnimationPhase, AppConfig, Explorer, User};
use std::f32::consts::PI;

const PANEL_WIDTH: f32 = 360.0;

const BACKGROUND: Color32 = Color32::from_rgb(8, 10, 20);
const USER_COLOR: Color32 = Color32::from_rgb(255, 140, 0); // Saffron
const SELECTED_USER: Color32 = Color32::from_rgb(255, 50, 50);
const TARGET_USER: Color32 = Color32::from_rgb(50, 255, 100);
const CONNECTION_COLOR: Color32 = Color32::from_rgb(40, 40, 60);
const PATH_COLOR: Color32 = Color32::from_rgb(255, 215, 0);
const HIGHLIGHT_PATH: Color32 = Color32::from_rgb(255, 20, 147);
const EXPLORING_COLOR: Color32 = Color32::from_rgb(255, 255, 0);
const VISITED_COLOR: Color32 = Color32::from_rgb(100, 200, 255);
const BUTTON_COLOR: Color32 = Color32::from_rgb(138, 43, 226);
const EXIT_BUTTON_COLOR: Color32 = Color32::from_rgb(220, 20, 60);
const NO_PATH_COLOR: Color32 = Color32::from_rgb(255, 100, 100);

pub struct IndigramApp {
    explorer: Explorer,
    graph_center_offset: Vec2,
    graph_zoom_factor: f32,
}

impl App for IndigramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.handle_keys(ctx);
        self.explorer.tick(now);

        egui::SidePanel::right("info_panel")
            .exact_width(PANEL_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_panel(ctx, ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(BACKGROUND))
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(
                    ui.available_size(),
                    Sense::hover() | Sense::drag() | Sense::click(),
                );
                let graph_rect = response.rect;

                if response.hovered() {
                    self.graph_zoom_factor *= ctx.input(|i| i.zoom_delta());
                    self.graph_zoom_factor = self.graph_zoom_factor.clamp(0.3, 5.0);
                }
                if response.dragged_by(egui::PointerButton::Middle) {
                    self.graph_center_offset += response.drag_delta();
                }

                let to_screen = self.canvas_transform(graph_rect);

                if response.clicked() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        let logical = to_screen.inverse().transform_pos(pointer);
                        if let Some(id) = self.explorer.user_at(logical) {
                            if let Err(e) = self.explorer.click(id) {
                                log::warn!("ignored click: {}", e);
                            }
                        }
                    }
                }

                self.draw_connections(&painter, &to_screen, now);
                self.draw_users(&painter, &to_screen, now);
                self.draw_progress(&painter, graph_rect);
            });

        ctx.request_repaint();
    }
}

impl IndigramApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let explorer = Explorer::new(&config);
        log::info!(
            "Indigram started with {} users; click a user to pick a start, then a target",
            explorer.network().len()
        );
        Self {
            explorer,
            graph_center_offset: Vec2::ZERO,
            graph_zoom_factor: 1.0,
        }
    }

    /// Maps the logical canvas the network was generated on into `graph_rect`,
    /// keeping its aspect ratio and applying the user's zoom and pan.
    fn canvas_transform(&self, graph_rect: Rect) -> RectTransform {
        let canvas = self.explorer.network_config().canvas();
        let fit = if canvas.width() > 0.0 && canvas.height() > 0.0 {
            (graph_rect.width() / canvas.width()).min(graph_rect.height() / canvas.height())
        } else {
            1.0
        };
        let scale = fit.max(0.01) * self.graph_zoom_factor;
        let target = Rect::from_center_size(
            graph_rect.center() + self.graph_center_offset,
            canvas.size() * scale,
        );
        RectTransform::from_to(canvas, target)
    }

    fn center_graph(&mut self) {
        self.graph_center_offset = Vec2::ZERO;
        self.graph_zoom_factor = 1.0;
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.explorer.reset();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.explorer.random_demo();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F11)) {
            toggle_fullscreen(ctx);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            log::info!("Indigram exited with ESC key");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn draw_connections(&self, painter: &egui::Painter, to_screen: &RectTransform, now: f64) {
        let network = self.explorer.network();
        for (a, b) in network.edges() {
            let (Some(user_a), Some(user_b)) = (network.user(a), network.user(b)) else {
                continue;
            };

            let (mut color, mut width) = if self.explorer.is_path_edge(a, b) {
                let pulse = (now * 3.0).sin() as f32 * 0.3 + 0.7;
                (dim(HIGHLIGHT_PATH, pulse), 4.0)
            } else {
                (CONNECTION_COLOR, 2.0)
            };

            let fade = [a, b]
                .iter()
                .filter_map(|&id| self.explorer.vanish_progress(id))
                .fold(None, |acc: Option<f32>, p| Some(acc.map_or(p, |acc| acc.max(p))));
            if let Some(progress) = fade {
                let alpha = 1.0 - progress;
                color = dim(color, alpha);
                width = (width * alpha).max(1.0);
            }

            let start = to_screen.transform_pos(user_a.pos);
            let end = to_screen.transform_pos(user_b.pos);
            let bend = if width > 2.0 { 10.0 } else { 5.0 };
            painter.add(Shape::line(
                curve(start, end, bend),
                Stroke::new(width, color),
            ));
        }
    }

    fn draw_users(&self, painter: &egui::Painter, to_screen: &RectTransform, now: f64) {
        let scale = to_screen.scale().x;
        let time = now as f32;
        let settled = self.explorer.scheduler().completed_at().is_some();
        let animating = self.explorer.is_animating();

        for user in self.explorer.network().users() {
            let id = user.id;
            let alpha = 1.0 - self.explorer.vanish_progress(id).unwrap_or(0.0);
            if alpha <= 0.0 {
                continue;
            }

            let center = to_screen.transform_pos(user.pos);
            let selected = self.explorer.start() == Some(id);
            let target = self.explorer.target() == Some(id);
            let (color, radius) = if selected || target {
                let pulse = (time * 3.0).sin() * 0.4 + 1.2;
                let color = if selected { SELECTED_USER } else { TARGET_USER };
                (color, user.radius * pulse)
            } else if animating && self.explorer.exploring().contains(&id) {
                let ripple = user.radius + (time * 6.0).sin() * 5.0 + 5.0;
                painter.circle_stroke(
                    center,
                    ripple * scale,
                    Stroke::new(2.0, dim(EXPLORING_COLOR, 0.4 * alpha)),
                );
                (EXPLORING_COLOR, user.radius * ((time * 8.0).sin() * 0.3 + 1.1))
            } else if self.explorer.shows_as_visited(id) {
                (VISITED_COLOR, user.radius + 2.0)
            } else if settled && self.explorer.on_path(id) {
                (PATH_COLOR, user.radius + 3.0)
            } else {
                (USER_COLOR, user.radius)
            };

            if alpha < 1.0 && alpha > 0.2 {
                draw_sparkles(painter, center, radius * scale * (3.0 - 2.0 * alpha), time, alpha);
            }

            let color = dim(color, alpha);
            let radius = (radius * scale).max(1.5);
            painter.circle_filled(center, radius, color);
            painter.circle_stroke(center, radius, Stroke::new(1.5, dim(Color32::WHITE, alpha)));

            if (selected || target) && alpha > 0.5 {
                painter.text(
                    center - vec2(0.0, radius + 6.0),
                    Align2::CENTER_BOTTOM,
                    &user.name,
                    FontId::proportional(13.0),
                    Color32::WHITE,
                );
            }
        }
    }

    fn draw_progress(&self, painter: &egui::Painter, graph_rect: Rect) {
        if self.explorer.phase() != AnimationPhase::Animating || self.explorer.level_count() == 0 {
            return;
        }
        let progress = self.explorer.scheduler().progress();
        let text = format!(
            "BFS Progress: {}% (Level {}/{})",
            (progress * 100.0) as u32,
            self.explorer.level(),
            self.explorer.level_count()
        );
        let anchor = Pos2::new(graph_rect.center().x, graph_rect.top() + 30.0);
        let galley = painter.layout_no_wrap(text, FontId::proportional(18.0), EXPLORING_COLOR);
        let bg = Rect::from_center_size(anchor, galley.size() + vec2(20.0, 10.0));
        painter.rect_filled(bg, 5.0, Color32::from_black_alpha(160));
        painter.galley(anchor - galley.size() / 2.0, galley, EXPLORING_COLOR);
    }

    fn draw_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.heading(RichText::new("इंडिग्राम").color(USER_COLOR).size(28.0));
        ui.label("Indigram - Social Network BFS");
        ui.separator();

        ui.label(RichText::new("Instructions:").color(PATH_COLOR).strong());
        for line in [
            "• Click a user to select start point",
            "• Click another user to find path",
            "• Watch BFS algorithm visualize",
            "• Yellow: Currently exploring",
            "• Blue: Already visited",
            "• Gold: Final path",
        ] {
            ui.label(RichText::new(line).small());
        }
        ui.add_space(6.0);

        let network = self.explorer.network();
        ui.label(RichText::new("Network Statistics:").color(PATH_COLOR).strong());
        ui.label(format!("• Total Users: {}", network.len()));
        ui.label(format!("• Total Connections: {}", network.connection_count()));
        ui.label(format!(
            "• Average Connections: {:.1}",
            network.average_connections()
        ));
        ui.label(format!(
            "• Generated: {}",
            network.generated_at().format("%H:%M:%S")
        ));
        ui.add_space(6.0);

        ui.label(RichText::new("Keyboard Shortcuts:").color(PATH_COLOR).strong());
        for line in [
            "• R: Reset selection",
            "• Space: Random demo",
            "• F11: Toggle fullscreen",
            "• ESC: Exit",
            "• Scroll / middle drag: zoom and pan",
        ] {
            ui.label(RichText::new(line).small());
        }
        ui.separator();

        if let Some(user) = self.explorer.start_user() {
            self.user_box(ui, "Selected User:", SELECTED_USER, user);
        }

        if let Some(user) = self.explorer.target_user() {
            self.user_box(ui, "Target User:", TARGET_USER, user);
            self.result_box(ui);
        }

        ui.separator();
        self.buttons(ctx, ui);
    }

    fn user_box(&self, ui: &mut egui::Ui, title: &str, color: Color32, user: &User) {
        egui::Frame::group(ui.style())
            .stroke(Stroke::new(2.0, color))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).color(color).strong());
                ui.label(format!("• Name: {}", user.name));
                ui.label(format!("• ID: {}", user.id));
                if let Some(tier) = user.tier {
                    ui.label(format!("• Circle: {:?}", tier));
                }
                ui.label(format!(
                    "• Connections: {}",
                    self.explorer.network().degree(user.id)
                ));
            });
    }

    fn result_box(&self, ui: &mut egui::Ui) {
        let Some(degrees) = self.explorer.degrees_of_separation() else {
            egui::Frame::group(ui.style())
                .stroke(Stroke::new(2.0, NO_PATH_COLOR))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new("No Path Found!").color(NO_PATH_COLOR).strong());
                });
            return;
        };

        egui::Frame::group(ui.style())
            .stroke(Stroke::new(2.0, PATH_COLOR))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("Path Found!").color(PATH_COLOR).strong());
                ui.label(
                    RichText::new(format!("Degrees of Separation: {}", degrees)).color(PATH_COLOR),
                );
                ui.label(format!("Path Length: {} users", self.explorer.path().len()));

                match self.explorer.phase() {
                    AnimationPhase::Animating => {
                        ui.colored_label(
                            EXPLORING_COLOR,
                            format!(
                                "Exploring Level {}/{}",
                                self.explorer.level(),
                                self.explorer.level_count()
                            ),
                        );
                        ui.add(egui::ProgressBar::new(self.explorer.scheduler().progress()));
                    }
                    AnimationPhase::Vanishing => {
                        ui.colored_label(
                            Color32::from_rgb(255, 150, 255),
                            format!(
                                "Nodes vanishing... ({} left)",
                                self.explorer.scheduler().vanishing_count()
                            ),
                        );
                    }
                    AnimationPhase::Complete | AnimationPhase::Idle => {
                        ui.colored_label(Color32::from_rgb(100, 255, 100), "BFS Complete!");
                    }
                }

                let path = self.explorer.path();
                if path.len() <= 8 {
                    ui.label(RichText::new("Path:").color(EXPLORING_COLOR));
                    let network = self.explorer.network();
                    for (i, id) in path.iter().enumerate() {
                        let name = network.user(*id).map_or("?", |u| u.name.as_str());
                        let connector = if i + 1 < path.len() { " →" } else { "" };
                        ui.label(
                            RichText::new(format!("{}{}", truncate(name, 12), connector))
                                .color(PATH_COLOR)
                                .small(),
                        );
                    }
                }
            });
    }

    fn buttons(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let wide = vec2(ui.available_width(), 36.0);
        let half = vec2((ui.available_width() - ui.spacing().item_spacing.x) / 2.0, 36.0);

        if ui
            .add_sized(wide, egui::Button::new("Toggle Fullscreen (F11)").fill(BUTTON_COLOR))
            .clicked()
        {
            toggle_fullscreen(ctx);
        }

        if ui
            .add_sized(wide, egui::Button::new("Regenerate Network").fill(BUTTON_COLOR))
            .clicked()
        {
            let count = self.explorer.network_config().node_count;
            self.explorer.regenerate(count);
            self.center_graph();
        }

        ui.horizontal(|ui| {
            if ui
                .add_sized(half, egui::Button::new("Reset").fill(BUTTON_COLOR))
                .clicked()
            {
                self.explorer.reset();
            }
            if ui
                .add_sized(half, egui::Button::new("Random Demo").fill(BUTTON_COLOR))
                .clicked()
            {
                self.explorer.random_demo();
            }
        });

        if ui
            .add_sized(wide, egui::Button::new("✕ Exit Indigram").fill(EXIT_BUTTON_COLOR))
            .clicked()
        {
            log::info!("Indigram exited by user");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

fn toggle_fullscreen(ctx: &egui::Context) {
    let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
    log::info!(
        "screen mode: {}",
        if fullscreen { "windowed" } else { "fullscreen" }
    );
}

/// Scales the RGB channels towards black, like a fade over the dark background.
fn dim(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgb(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
    )
}

/// A gently sagging line between two points.
fn curve(start: Pos2, end: Pos2, bend: f32) -> Vec<Pos2> {
    const SEGMENTS: usize = 8;
    (0..=SEGMENTS)
        .map(|i| {
            let t = i as f32 / SEGMENTS as f32;
            start.lerp(end, t) + vec2(0.0, (t * PI).sin() * bend)
        })
        .collect()
}

fn draw_sparkles(painter: &egui::Painter, center: Pos2, radius: f32, time: f32, alpha: f32) {
    for i in 0..8 {
        let angle = (i as f32 / 8.0) * 2.0 * PI + time * 5.0;
        let pos = center + vec2(angle.cos(), angle.sin()) * radius;
        painter.circle_filled(pos, 2.5, dim(PATH_COLOR, alpha));
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        format!("{}...", name.chars().take(max).collect::<String>())
    } else {
        name.to_string()
    }
}
