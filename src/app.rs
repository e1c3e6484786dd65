//! 대시보드 UI: 사이드바 차트 선택, 차트 영역, 데이터 테이블, 주요 지표.

use eframe::egui::{self, Color32, RichText};
use eframe::{App, Frame};
use egui_extras::{Column, Size, StripBuilder, TableBuilder};
use serde::{Deserialize, Serialize};

use crate::charts;
use crate::data::{self, REGIONS};
use crate::fonts::{FontResolution, FontStatus, RenderConfig};

/// 메인 차트 종류. 선택값은 재시작 후에도 유지된다.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Heatmap,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Heatmap,
        ChartKind::Scatter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "막대 차트",
            ChartKind::Line => "선 그래프",
            ChartKind::Pie => "파이 차트",
            ChartKind::Heatmap => "히트맵",
            ChartKind::Scatter => "산점도",
        }
    }
}

pub struct DashboardApp {
    chart: ChartKind,
    config: RenderConfig,
    resolution: FontResolution,
    report_json: String,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, resolution: FontResolution) -> Self {
        let chart = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let config = RenderConfig::from_resolution(&resolution);
        let report_json = serde_json::to_string_pretty(&resolution.report())
            .unwrap_or_else(|_| "{}".to_owned());
        if let Ok(compact) = serde_json::to_string(&resolution.report()) {
            log::info!("font diagnostics: {compact}");
        }
        Self { chart, config, resolution, report_json }
    }

    fn status_banner(&self, ui: &mut egui::Ui) {
        let color = match self.resolution.status {
            FontStatus::Preferred => Color32::from_rgb(0x2E, 0xCC, 0x71),
            FontStatus::Bundled => Color32::from_rgb(0xF3, 0x9C, 0x12),
            FontStatus::Missing => Color32::from_rgb(0xE7, 0x4C, 0x3C),
        };
        ui.colored_label(color, self.resolution.status_message());
    }

    fn chart_area(&self, ui: &mut egui::Ui) {
        ui.heading("📈 차트 영역");
        ui.add_space(4.0);
        match self.chart {
            ChartKind::Bar => charts::population_bar(ui, &REGIONS, &self.config),
            ChartKind::Line => charts::density_line(ui, &REGIONS, &self.config),
            ChartKind::Pie => charts::population_pie(ui, &REGIONS, &self.config),
            ChartKind::Heatmap => charts::correlation_heatmap(ui, &REGIONS, &self.config),
            ChartKind::Scatter => charts::area_population_scatter(ui, &REGIONS, &self.config),
        }
    }

    fn side_column(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("side_column")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("📊 데이터 테이블");
                ui.add_space(4.0);
                self.data_table(ui);

                ui.add_space(12.0);
                ui.heading("📝 한글 텍스트 테스트");
                ui.label(RichText::new("한글 표시 테스트:").strong());
                ui.label("• 안녕하세요! 👋");
                ui.label("• 한글이 잘 표시되나요?");
                ui.label("• 특수문자: ㄱㄴㄷㄹㅁㅂㅅㅇㅈㅊㅋㅌㅍㅎ");

                ui.add_space(12.0);
                ui.heading("📈 주요 지표");
                self.metrics(ui);
            });
    }

    fn data_table(&self, ui: &mut egui::Ui) {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(48.0))
            .column(Column::remainder())
            .column(Column::remainder())
            .column(Column::remainder())
            .header(22.0, |mut header| {
                header.col(|ui| { ui.strong("지역"); });
                header.col(|ui| { ui.strong("인구수"); });
                header.col(|ui| { ui.strong("면적 (㎢)"); });
                header.col(|ui| { ui.strong("인구밀도"); });
            })
            .body(|mut body| {
                for region in &REGIONS {
                    body.row(20.0, |mut row| {
                        row.col(|ui| { ui.label(region.name); });
                        row.col(|ui| { ui.label(data::format_thousands(region.population)); });
                        row.col(|ui| { ui.label(self.config.fmt_number(region.area_km2, 2)); });
                        row.col(|ui| { ui.label(data::format_thousands(region.density as u64)); });
                    });
                }
            });
    }

    fn metrics(&self, ui: &mut egui::Ui) {
        egui::Grid::new("metrics")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                metric_tile(
                    ui,
                    "총 인구수",
                    format!("{}명", data::format_thousands(data::total_population(&REGIONS))),
                );
                metric_tile(
                    ui,
                    "평균 면적",
                    format!("{}㎢", self.config.fmt_number(data::mean_area(&REGIONS), 1)),
                );
                ui.end_row();
                metric_tile(
                    ui,
                    "최고 인구밀도",
                    format!("{}명/㎢", data::format_thousands(data::max_density(&REGIONS) as u64)),
                );
                metric_tile(
                    ui,
                    "최저 인구밀도",
                    format!("{}명/㎢", data::format_thousands(data::min_density(&REGIONS) as u64)),
                );
                ui.end_row();
            });
    }

    fn extra_charts(&self, ui: &mut egui::Ui) {
        ui.heading("🎨 추가 차트");
        ui.add_space(4.0);
        StripBuilder::new(ui)
            .size(Size::exact(330.0))
            .vertical(|mut strip| {
                strip.strip(|builder| {
                    builder
                        .size(Size::relative(0.5))
                        .size(Size::remainder())
                        .horizontal(|mut strip| {
                            strip.cell(|ui| {
                                charts::population_hbar(ui, &REGIONS, &self.config);
                            });
                            strip.cell(|ui| {
                                charts::population_donut(ui, &REGIONS, &self.config);
                            });
                        });
                });
            });
    }

    fn diagnostics(&self, ui: &mut egui::Ui) {
        ui.collapsing("🔧 폰트 설정 정보", |ui| {
            ui.label(format!("현재 시스템: {}", self.resolution.os.label()));
            ui.label(format!(
                "설정된 폰트: {}",
                self.resolution.family.as_deref().unwrap_or("(기본 폰트)")
            ));
            ui.label(format!("설치된 폰트 수: {}", self.resolution.installed_faces));

            if self.resolution.hangul_families.is_empty() {
                ui.label("사용 가능한 한글 폰트가 없습니다.");
            } else {
                ui.label(RichText::new("사용 가능한 한글 폰트:").strong());
                for family in self.resolution.hangul_families.iter().take(10) {
                    ui.label(format!("- {family}"));
                }
            }

            ui.add_space(8.0);
            ui.label(RichText::new("진단 리포트 (JSON):").strong());
            ui.monospace(&self.report_json);
        });
    }
}

fn metric_tile(ui: &mut egui::Ui, label: &str, value: String) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).strong().size(17.0));
        });
    });
}

impl App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::SidePanel::left("chart_options")
            .min_width(200.0)
            .show(ctx, |ui| {
                ui.heading("📊 차트 옵션");
                ui.separator();
                ui.label("차트 유형 선택");
                egui::ComboBox::from_id_salt("chart_kind")
                    .width(170.0)
                    .selected_text(self.chart.label())
                    .show_ui(ui, |ui| {
                        for kind in ChartKind::ALL {
                            ui.selectable_value(&mut self.chart, kind, kind.label());
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("🇰🇷 한글 폰트 테스트");
                    self.status_banner(ui);
                    ui.separator();

                    StripBuilder::new(ui)
                        .size(Size::exact(520.0))
                        .vertical(|mut strip| {
                            strip.strip(|builder| {
                                builder
                                    .size(Size::relative(0.62))
                                    .size(Size::remainder())
                                    .horizontal(|mut strip| {
                                        strip.cell(|ui| {
                                            self.chart_area(ui);
                                        });
                                        strip.cell(|ui| {
                                            self.side_column(ui);
                                        });
                                    });
                            });
                        });

                    ui.separator();
                    self.extra_charts(ui);

                    ui.separator();
                    self.diagnostics(ui);
                });
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.chart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_chart_kinds_with_distinct_labels() {
        let labels: std::collections::BTreeSet<_> =
            ChartKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels.len(), 5);
        assert!(labels.contains("파이 차트"));
    }

    #[test]
    fn chart_kind_round_trips_through_serde() {
        for kind in ChartKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: ChartKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
        }
    }

    #[test]
    fn default_chart_is_first_selectbox_entry() {
        assert_eq!(ChartKind::default(), ChartKind::ALL[0]);
    }
}
