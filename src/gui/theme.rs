use egui::{Color32, Context, Rounding, Stroke, Visuals};

/// Grey behind the pages in the viewer
pub const CANVAS_BG: Color32 = Color32::from_rgb(200, 200, 200);
pub const PAGE_SHADOW: Color32 = Color32::from_rgb(160, 160, 160);
pub const PAGE_BORDER: Color32 = Color32::from_rgb(180, 180, 180);
pub const SELECTION_STROKE: Color32 = Color32::from_rgb(0, 120, 215);

/// Rubber-band fill: selection blue at low alpha
pub fn selection_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(0, 120, 215, 40)
}

/// Set up the light theme used by the application
pub fn setup_custom_theme(ctx: &Context) {
    // Start with the light theme as a base
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(245, 245, 245);
    visuals.window_fill = Color32::from_rgb(255, 255, 255);
    visuals.extreme_bg_color = Color32::from_rgb(255, 255, 255);
    visuals.faint_bg_color = Color32::from_rgb(240, 240, 240);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(235, 235, 235);
    visuals.widgets.inactive.weak_bg_fill = Color32::from_rgb(235, 235, 235);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(30, 30, 30));
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(30, 30, 30));

    visuals.selection.bg_fill = SELECTION_STROKE;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.hyperlink_color = Color32::from_rgb(0, 100, 200);
    visuals.error_fg_color = Color32::from_rgb(200, 0, 0);

    let rounding = Rounding::same(3.0);
    visuals.window_rounding = rounding;
    visuals.menu_rounding = rounding;

    ctx.set_visuals(visuals);
}
