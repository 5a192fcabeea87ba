use crate::tiles::TileTextures;
use eramap::prelude::*;
use eramap::constants::TILE_SIZE;
use eramap::editor::draw::MIN_POLYGON_VERTICES;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use std::time::{Duration, Instant};

/// How long a notice stays on screen
const NOTICE_TTL: Duration = Duration::from_secs(4);
/// Pixel radius within which a click hits a marker or the first polygon vertex
const HIT_RADIUS: f32 = 10.0;
/// Accumulated wheel distance that makes one zoom step
const SCROLL_STEP: f32 = 50.0;

pub struct EditorApp {
    session: EditorSession<FileGateway>,
    runtime: tokio::runtime::Runtime,
    tiles: TileTextures,
    notices: Vec<(Notice, Instant)>,
    scroll: f32,
}

impl EditorApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        session: EditorSession<FileGateway>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let tiles = TileTextures::new(runtime.handle().clone());
        Self {
            session,
            runtime,
            tiles,
            notices: Vec::new(),
            scroll: 0.0,
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.session.notify(Notice::error(e.to_string()));
        }
    }

    fn save_pois(&mut self) {
        let result = self.runtime.block_on(self.session.save_pois()).map(|_| ());
        self.report(result);
    }

    fn save_polygons(&mut self) {
        let result = self.runtime.block_on(self.session.save_polygons()).map(|_| ());
        self.report(result);
    }

    fn save_start_view(&mut self) {
        self.runtime.block_on(self.session.save_start_view());
    }

    fn import_image(&mut self) {
        let result = self.runtime.block_on(self.session.import_image()).map(|_| ());
        self.report(result);
    }

    fn delete_selection(&mut self) {
        let result = self.session.delete_selection().map(|_| ());
        self.report(result);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let typing = ctx.wants_keyboard_input();
        let (add_poi, polygon, delete, finish, cancel, save_view, save_pois, save_polys) =
            ctx.input(|i| {
                let cmd = i.modifiers.command;
                (
                    !typing && !cmd && i.key_pressed(egui::Key::M),
                    !typing && !cmd && i.key_pressed(egui::Key::P),
                    !typing && i.key_pressed(egui::Key::Delete),
                    !typing && i.key_pressed(egui::Key::Enter),
                    i.key_pressed(egui::Key::Escape),
                    cmd && i.key_pressed(egui::Key::S),
                    cmd && i.key_pressed(egui::Key::P),
                    cmd && i.key_pressed(egui::Key::L),
                )
            });

        if add_poi {
            let result = self.session.start_add_poi();
            self.report(result);
        }
        if polygon {
            let result = self.session.start_draw_polygon();
            self.report(result);
        }
        if delete {
            self.delete_selection();
        }
        if finish {
            self.session.finish_gesture();
        }
        if cancel && !self.session.draw_mode().is_idle() {
            self.session.cancel_gesture();
        }
        if save_view {
            self.save_start_view();
        }
        if save_pois {
            self.save_pois();
        }
        if save_polys {
            self.save_polygons();
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add POI (M)").clicked() {
                let result = self.session.start_add_poi();
                self.report(result);
            }
            if ui.button("Draw polygon (P)").clicked() {
                let result = self.session.start_draw_polygon();
                self.report(result);
            }
            if ui.button("Draw rectangle").clicked() {
                let result = self.session.start_draw_rectangle();
                self.report(result);
            }
            if ui.button("Delete selection (Del)").clicked() {
                self.delete_selection();
            }
            ui.separator();
            if ui.button("Start = current view (Ctrl+S)").clicked() {
                self.save_start_view();
            }
            if ui.button("Save POIs (Ctrl+P)").clicked() {
                self.save_pois();
            }
            if ui.button("Save polygons (Ctrl+L)").clicked() {
                self.save_polygons();
            }
            if ui.button("Import image").clicked() {
                self.import_image();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let view = self.session.surface().viewport();
                ui.label(format!(
                    "{:.5}, {:.5} | z{}",
                    view.center.lat, view.center.lng, view.zoom
                ));
                if self.session.has_unpersisted_changes() {
                    ui.colored_label(Color32::from_rgb(200, 120, 0), "● unsaved");
                }
            });
        });

        if let Some(hint) = self.session.draw_mode().hint() {
            ui.horizontal(|ui| {
                ui.label(hint);
                if let DrawMode::PlacingPolygon { vertices } = self.session.draw_mode() {
                    let ready = vertices.len() >= MIN_POLYGON_VERTICES;
                    if ui.add_enabled(ready, egui::Button::new("Finish")).clicked() {
                        self.session.finish_gesture();
                    }
                    if ui.button("Remove last point").clicked() {
                        self.session.remove_last_vertex();
                    }
                }
                if ui.button("Cancel").clicked() {
                    self.session.cancel_gesture();
                }
            });
        }
    }

    fn map_canvas(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let size = Point::new(rect.width() as f64, rect.height() as f64);

        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                self.session
                    .pan_by(Point::new(-delta.x as f64, -delta.y as f64));
            }
        }
        if response.hovered() {
            self.scroll += ui.input(|i| i.raw_scroll_delta.y);
            if self.scroll >= SCROLL_STEP {
                self.session.zoom_in();
                self.scroll = 0.0;
            } else if self.scroll <= -SCROLL_STEP {
                self.session.zoom_out();
                self.scroll = 0.0;
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.click_at(pos, rect, size);
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(230, 230, 230));
        self.paint_tiles(&painter, rect, size);
        self.paint_polygons(&painter, rect, size);
        self.paint_drafts(&painter, rect, size);
        self.paint_markers(&painter, rect, size);
        self.paint_overlay(&painter, rect);
    }

    fn click_at(&mut self, pos: Pos2, rect: Rect, size: Point) {
        let local = Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        let viewport = self.session.surface().viewport().clone();

        if self.session.draw_mode().is_idle() {
            let hit = self.session.surface().markers().into_iter().find(|marker| {
                let p = viewport.lat_lng_to_pixel(&marker.position, size);
                p.distance_to(&local) <= HIT_RADIUS as f64
            });
            if let Some(marker) = hit {
                let result = self.session.open_poi(marker.id);
                self.report(result);
            }
            return;
        }

        if let DrawMode::PlacingPolygon { vertices } = self.session.draw_mode() {
            let closes = vertices.len() >= MIN_POLYGON_VERTICES
                && vertices.first().is_some_and(|first| {
                    viewport.lat_lng_to_pixel(first, size).distance_to(&local) <= HIT_RADIUS as f64
                });
            if closes {
                self.session.finish_gesture();
                return;
            }
        }

        self.session.map_click(viewport.pixel_to_lat_lng(local, size));
    }

    fn paint_tiles(&mut self, painter: &egui::Painter, rect: Rect, size: Point) {
        let Some(layer) = self.session.surface().tile_layer().cloned() else {
            return;
        };
        let viewport = self.session.surface().viewport().clone();
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

        for coord in viewport.visible_tiles(size) {
            if let Some(texture) = self.tiles.get(&layer, coord) {
                let origin = viewport.tile_origin(&coord, size);
                let min = rect.min + Vec2::new(origin.x as f32, origin.y as f32);
                let tile_rect = Rect::from_min_size(min, Vec2::splat(TILE_SIZE as f32));
                painter.image(texture, tile_rect, uv, Color32::WHITE);
            }
        }
    }

    fn to_screen(&self, rect: Rect, size: Point, at: &LatLng) -> Pos2 {
        let p = self.session.surface().viewport().lat_lng_to_pixel(at, size);
        rect.min + Vec2::new(p.x as f32, p.y as f32)
    }

    fn paint_polygons(&self, painter: &egui::Painter, rect: Rect, size: Point) {
        for (_, ring, style) in self.session.surface().styled_polygons() {
            let points: Vec<Pos2> = ring.iter().map(|p| self.to_screen(rect, size, p)).collect();
            let stroke = Stroke::new(
                style.stroke_width as f32,
                color(&style.stroke, style.stroke_opacity),
            );
            paint_area(painter, points, color(&style.fill, style.fill_opacity), stroke);
        }
    }

    fn paint_drafts(&self, painter: &egui::Painter, rect: Rect, size: Point) {
        let defaults = PolygonStyle::default();
        let fill = color(&defaults.fill, defaults.fill_opacity);
        let stroke = Stroke::new(
            defaults.stroke_width as f32,
            color(&defaults.stroke, defaults.stroke_opacity),
        );

        for entry in self.session.surface().draft().iter() {
            let ring = match &entry.geometry {
                DraftGeometry::Polygon { ring } => ring.clone(),
                DraftGeometry::Rectangle { bounds } => bounds.ring(),
                DraftGeometry::Marker { .. } => continue,
            };
            let points: Vec<Pos2> = ring.iter().map(|p| self.to_screen(rect, size, p)).collect();
            paint_area(painter, points, fill, stroke);
        }

        match self.session.draw_mode() {
            DrawMode::PlacingPolygon { vertices } => {
                let points: Vec<Pos2> = vertices
                    .iter()
                    .map(|p| self.to_screen(rect, size, p))
                    .collect();
                painter.add(egui::Shape::line(points.clone(), stroke));
                for point in points {
                    painter.circle(point, 4.0, Color32::WHITE, stroke);
                }
            }
            DrawMode::PlacingRectangle { corner: Some(corner) } => {
                painter.circle(self.to_screen(rect, size, corner), 4.0, Color32::WHITE, stroke);
            }
            _ => {}
        }
    }

    fn paint_markers(&self, painter: &egui::Painter, rect: Rect, size: Point) {
        for marker in self.session.surface().markers() {
            let pos = self.to_screen(rect, size, &marker.position);
            let fill = if marker.draft {
                Color32::from_rgb(255, 140, 0)
            } else {
                Color32::from_rgb(10, 124, 255)
            };
            painter.circle(pos, 7.0, fill, Stroke::new(2.0, Color32::WHITE));
            painter.text(
                pos + Vec2::new(10.0, 0.0),
                Align2::LEFT_CENTER,
                &marker.title,
                FontId::proportional(12.0),
                Color32::from_gray(30),
            );
        }

        if let Some(form) = self.session.form() {
            if form.is_new() {
                let pos = self.to_screen(rect, size, &form.position());
                painter.circle(pos, 7.0, Color32::from_gray(160), Stroke::new(2.0, Color32::WHITE));
            }
        }
    }

    fn paint_overlay(&self, painter: &egui::Painter, rect: Rect) {
        let status = self.session.tile_status();
        match status {
            TileStatus::Active { attribution, .. } => {
                painter.text(
                    rect.right_top() + Vec2::new(-10.0, 10.0),
                    Align2::RIGHT_TOP,
                    status.label(),
                    FontId::proportional(12.0),
                    Color32::from_gray(40),
                );
                painter.text(
                    rect.left_bottom() + Vec2::new(5.0, -5.0),
                    Align2::LEFT_BOTTOM,
                    attribution,
                    FontId::proportional(10.0),
                    Color32::from_gray(120),
                );
            }
            TileStatus::Unavailable => {
                let banner = Rect::from_min_size(rect.min, Vec2::new(rect.width(), 28.0));
                painter.rect_filled(banner, 0.0, Color32::from_rgb(255, 220, 220));
                painter.text(
                    banner.center(),
                    Align2::CENTER_CENTER,
                    status.label(),
                    FontId::proportional(14.0),
                    Color32::from_rgb(150, 0, 0),
                );
            }
            TileStatus::Pending => {}
        }
    }

    fn poi_form(&mut self, ctx: &egui::Context) {
        let eras = self.session.config().eras.join(", ");
        let Some(form) = self.session.form_mut() else {
            return;
        };
        let title = if form.is_new() { "New POI" } else { "Edit POI" };
        let position = form.position();

        let mut save = false;
        let mut cancel = false;
        let mut import = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::RIGHT_TOP, [-10.0, 60.0])
            .show(ctx, |ui| {
                ui.label(format!("{:.5}, {:.5}", position.lat, position.lng));
                egui::Grid::new("poi_fields").num_columns(2).show(ui, |ui| {
                    let fields = &mut form.fields;
                    ui.label("Title");
                    ui.text_edit_singleline(&mut fields.title);
                    ui.end_row();
                    ui.label("Subtitle");
                    ui.text_edit_singleline(&mut fields.subtitle);
                    ui.end_row();
                    ui.label("Description");
                    ui.text_edit_multiline(&mut fields.description);
                    ui.end_row();
                    ui.label("Era");
                    ui.add(egui::TextEdit::singleline(&mut fields.era).hint_text(eras.as_str()));
                    ui.end_row();
                    ui.label("Tags");
                    ui.add(egui::TextEdit::singleline(&mut fields.tags).hint_text("comma-separated"));
                    ui.end_row();
                    ui.label("Image");
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut fields.image);
                        import = ui.button("…").clicked();
                    });
                    ui.end_row();
                    ui.label("Link");
                    ui.text_edit_singleline(&mut fields.link);
                    ui.end_row();
                });
                ui.horizontal(|ui| {
                    save = ui.button("Save").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if import {
            self.import_image();
        }
        if save {
            let result = self.session.commit_form().map(|_| ());
            self.report(result);
        } else if cancel {
            let result = self.session.cancel_form();
            self.report(result);
        }
    }

    fn show_notices(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        for notice in self.session.drain_notices() {
            self.notices.push((notice, now));
        }
        self.notices.retain(|(_, shown)| now.duration_since(*shown) < NOTICE_TTL);
        if self.notices.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notices"))
            .anchor(Align2::CENTER_BOTTOM, [0.0, -20.0])
            .show(ctx, |ui| {
                for (notice, _) in &self.notices {
                    let color = match notice.level {
                        NoticeLevel::Info => Color32::from_rgb(0, 100, 0),
                        NoticeLevel::Error => Color32::from_rgb(170, 0, 0),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, &notice.text);
                    });
                }
            });
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.tiles.poll(ctx) || self.tiles.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.map_canvas(ui));

        self.poi_form(ctx);
        self.show_notices(ctx);
    }
}

/// `#rrggbb` plus opacity as an egui color; unparsable colors fall back to the
/// default polygon blue
fn color(hex: &str, opacity: f64) -> Color32 {
    let [r, g, b] = PolygonStyle::parse_hex_color(hex).unwrap_or([10, 124, 255]);
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

/// Strokes the closed outline over a fill that also works for concave rings
fn paint_area(painter: &egui::Painter, points: Vec<Pos2>, fill: Color32, stroke: Stroke) {
    if let Some(mesh) = fill_mesh(&points, fill) {
        painter.add(egui::Shape::mesh(mesh));
    }
    painter.add(egui::Shape::closed_line(points, stroke));
}

/// Ear-clips `points` into a triangle mesh; `None` for degenerate rings.
fn fill_mesh(points: &[Pos2], fill: Color32) -> Option<egui::epaint::Mesh> {
    let coords: Vec<f64> = points
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    let indices = earcutr::earcut(&coords, &[], 2).unwrap_or_default();
    if indices.is_empty() {
        return None;
    }

    let mut mesh = egui::epaint::Mesh::default();
    for point in points {
        mesh.colored_vertex(*point, fill);
    }
    for triangle in indices.chunks_exact(3) {
        mesh.add_triangle(triangle[0] as u32, triangle[1] as u32, triangle[2] as u32);
    }
    Some(mesh)
}
