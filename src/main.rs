mod app;
mod color;
mod data;
mod engine;
mod state;
mod ui;

use std::path::PathBuf;

use app::ElectivePlannerApp;
use eframe::egui;
use state::AppState;

/// System fonts with Hangul coverage, tried in order.
const HANGUL_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
];

fn main() -> eframe::Result {
    env_logger::init();

    // Optional catalog path: `elective-planner <catalog.xlsx>`
    let mut state = AppState::default();
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        if let Err(e) = state.open_catalog(&path) {
            log::error!("Failed to load catalog: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(state.title())
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Elective Planner",
        options,
        Box::new(|cc| {
            install_hangul_font(&cc.egui_ctx);
            Ok(Box::new(ElectivePlannerApp::new(state)))
        }),
    )
}

/// The bundled egui fonts have no Hangul glyphs; borrow one from the system.
fn install_hangul_font(ctx: &egui::Context) {
    let Some((path, bytes)) = HANGUL_FONT_CANDIDATES
        .iter()
        .find_map(|p| std::fs::read(p).ok().map(|b| (*p, b)))
    else {
        log::warn!("No Hangul font found; Korean text may not render");
        return;
    };
    log::info!("Using Hangul font {path}");

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("hangul".to_owned(), egui::FontData::from_owned(bytes).into());
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("hangul".to_owned());
    }
    ctx.set_fonts(fonts);
}
