use std::time::Instant;

use eframe::egui::{self, *};

use crate::assets::{Pose, SpriteCache};
use crate::behavior::{BehaviorLoop, Mode};
use crate::config::Config;
use crate::mood::MoodCategory;
use crate::probe::{CommandProbe, ProbeWorker};

#[derive(Debug, Default)]
pub struct DragTracker { press: Option<Pos2> }
impl DragTracker {
    pub fn press(&mut self, pointer: Pos2) { self.press = Some(pointer); }
    pub fn release(&mut self) { self.press = None; }
    pub fn is_dragging(&self) -> bool { self.press.is_some() }

    pub fn target(&self, window_origin: Pos2, pointer: Pos2) -> Option<Pos2> {
        self.press.map(|start| window_origin + (pointer - start))
    }
}

pub struct Deskmate {
    config:     Config,
    behavior:   BehaviorLoop<ProbeWorker>,
    sprites:    SpriteCache,
    chat_input: String,
    drag:       DragTracker,
}

impl Deskmate {
    pub fn new(cc: &eframe::CreationContext, config: Config) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.visuals.panel_fill  = Color32::TRANSPARENT;
        style.visuals.window_fill = Color32::from_rgba_unmultiplied(250, 250, 250, 240);
        style.visuals.widgets.inactive.rounding = Rounding::same(6.0);
        style.visuals.widgets.hovered.rounding  = Rounding::same(6.0);
        style.visuals.widgets.active.rounding   = Rounding::same(6.0);
        cc.egui_ctx.set_style(style);

        let mut sprites = SpriteCache::new(config.sprite_dir(), config.sprite_size, config.key_color);
        for pose in Pose::ALL {
            sprites.texture(&cc.egui_ctx, pose);
        }

        let now = Instant::now();
        let probe = ProbeWorker::spawn(CommandProbe::native());
        let mut behavior = BehaviorLoop::from_config(probe, &config, now);
        behavior.start(&config.greeting, now);
        log::info!("{} is awake", config.companion_name);

        Self { config, behavior, sprites, chat_input: String::new(), drag: DragTracker::default() }
    }

    fn sprite_rect(&self, full: Rect) -> Rect {
        let [w, h] = self.config.sprite_size;
        let size = vec2(w as f32, h as f32);
        let scale = (full.width() / size.x).min((full.height() - 100.0).max(1.0) / size.y).min(1.0);
        Rect::from_center_size(pos2(full.center().x, full.top() + size.y * scale * 0.5), size * scale)
    }

    fn draw_sprite(&mut self, ui: &mut Ui, ctx: &Context, full: Rect) {
        let rect = self.sprite_rect(full);
        if let Some(tid) = self.sprites.texture(ctx, self.behavior.pose()) {
            ui.painter().image(tid, rect, Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0)), Color32::WHITE);
        }

        let resp = ui.interact(rect, Id::new("deskmate_sprite"), Sense::click_and_drag());
        if resp.drag_started_by(PointerButton::Primary) {
            if let Some(p) = resp.interact_pointer_pos() {
                self.drag.press(p);
                self.behavior.note_drag_start(Instant::now());
            }
        }
        if resp.dragged_by(PointerButton::Primary) {
            let origin = ctx.input(|i| i.viewport().outer_rect).map(|r| r.min);
            let pointer = ctx.input(|i| i.pointer.interact_pos());
            if let (Some(origin), Some(pointer)) = (origin, pointer) {
                if let Some(target) = self.drag.target(origin, pointer) {
                    ctx.send_viewport_cmd(ViewportCommand::OuterPosition(target));
                }
            }
        } else if self.drag.is_dragging() {
            self.drag.release();
        }

        resp.context_menu(|ui| {
            if ui.button("Be happy").clicked() {
                self.behavior.force_pose(Pose::Happy, Instant::now());
                ui.close_menu();
            }
            if ui.button("Judge me").clicked() {
                self.behavior.force_pose(Pose::Judging, Instant::now());
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.close_menu();
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
        });
    }

    fn draw_bubble(&self, ui: &mut Ui, full: Rect) {
        let bubble = Rect::from_min_max(
            pos2(full.left() + 20.0, full.bottom() - 100.0),
            pos2(full.right() - 20.0, full.bottom() - 40.0),
        );
        ui.painter().rect(bubble, Rounding::same(8.0), Color32::WHITE, Stroke::new(1.0, Color32::BLACK));

        let dot_color = match (self.behavior.mode(), self.behavior.displayed_mood()) {
            (Mode::Reacting, _)                       => Color32::from_rgb(255, 120, 170),
            (_, Some(MoodCategory::Coding))           => Color32::from_rgb(100, 220, 120),
            (_, Some(MoodCategory::Distracted))       => Color32::from_rgb(255, 130, 80),
            _                                         => Color32::from_rgb(180, 180, 180),
        };
        ui.painter().circle_filled(bubble.left_top() + vec2(10.0, 10.0), 3.5, dot_color);

        let typed = self.behavior.visible_text();
        let display = if self.behavior.is_revealing() { format!("{typed}▍") } else { typed.to_string() };
        ui.allocate_ui_at_rect(bubble.shrink2(vec2(14.0, 6.0)), |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(&self.config.companion_name).strong().size(10.0).color(Color32::from_gray(90)));
                ui.label(RichText::new(display).strong().size(11.5).color(Color32::BLACK));
            });
        });
    }

    fn draw_chat_input(&mut self, ui: &mut Ui, full: Rect) {
        let rect = Rect::from_min_max(
            pos2(full.left() + 20.0, full.bottom() - 32.0),
            pos2(full.right() - 20.0, full.bottom() - 8.0),
        );
        let hint = format!("say something to {}...", self.config.companion_name);
        let resp = ui.put(rect, egui::TextEdit::singleline(&mut self.chat_input)
            .hint_text(hint)
            .font(FontId::proportional(11.5)));
        if resp.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            let msg = std::mem::take(&mut self.chat_input);
            if self.behavior.submit_chat(&msg, Instant::now()) {
                resp.request_focus();
            }
        }
    }
}

impl eframe::App for Deskmate {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.behavior.pump(Instant::now());

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::TRANSPARENT))
            .show(ctx, |ui| {
                let full = ui.max_rect();
                self.draw_sprite(ui, ctx, full);
                self.draw_bubble(ui, full);
                self.draw_chat_input(ui, full);
            });

        if let Some(deadline) = self.behavior.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}
