// Windows 릴리스 빌드에서 콘솔 창을 숨긴다.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use colored::Colorize;
use eframe::egui;

use hangulboard::app::DashboardApp;
use hangulboard::fonts::{self, FontStatus};

fn main() -> eframe::Result<()> {
    env_logger::init();

    // 폰트 해석은 프로세스당 한 번, 이벤트 루프 시작 전에 수행한다.
    let resolution = fonts::resolve();
    let status_line = resolution.status_message();
    match resolution.status {
        FontStatus::Preferred => println!("{}", status_line.green()),
        FontStatus::Bundled => println!("{}", status_line.yellow()),
        FontStatus::Missing => eprintln!("{}", status_line.red()),
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("🇰🇷 한글 폰트 테스트")
            .with_inner_size([1280.0, 880.0])
            .with_min_inner_size([1024.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "한글 폰트 테스트",
        native_options,
        Box::new(move |cc| {
            fonts::install(&cc.egui_ctx, &resolution);
            Ok(Box::new(DashboardApp::new(cc, resolution)))
        }),
    )
}
