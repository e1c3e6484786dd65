//! 차트 구성: 선택된 차트 한 종류 + 하단 보조 차트 두 종류.
//!
//! 모든 함수는 (데이터, RenderConfig)만으로 그리는 순수 표시 로직이다.

use eframe::egui::{self, Align2, Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::data::{self, Region};
use crate::fonts::RenderConfig;
use crate::stats;

/// 지역별 고정 색상 팔레트.
pub const PALETTE: [Color32; 8] = [
    Color32::from_rgb(0xFF, 0x6B, 0x6B),
    Color32::from_rgb(0x4E, 0xCD, 0xC4),
    Color32::from_rgb(0x45, 0xB7, 0xD1),
    Color32::from_rgb(0x96, 0xCE, 0xB4),
    Color32::from_rgb(0xFF, 0xEA, 0xA7),
    Color32::from_rgb(0xDD, 0xA0, 0xDD),
    Color32::from_rgb(0x98, 0xD8, 0xC8),
    Color32::from_rgb(0xF7, 0xDC, 0x6F),
];

/// 히트맵 축에 쓰이는 수치 열 이름.
pub const CORR_LABELS: [&str; 3] = ["인구수", "면적", "인구밀도"];

const MAIN_CHART_HEIGHT: f32 = 430.0;
const SUB_CHART_HEIGHT: f32 = 280.0;

/// 파이/도넛 차트의 부채꼴 한 조각.
#[derive(Clone, Debug, PartialEq)]
pub struct Wedge {
    pub name: &'static str,
    pub value: f64,
    /// 라디안, 12시 방향(π/2)에서 시작해 반시계 방향으로 진행.
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Wedge {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// 인구수 비율을 부채꼴 각도로 변환한다.
pub fn pie_wedges(regions: &[Region]) -> Vec<Wedge> {
    let total = data::total_population(regions) as f64;
    if total == 0.0 {
        return Vec::new();
    }
    let mut angle = std::f64::consts::FRAC_PI_2;
    regions
        .iter()
        .map(|region| {
            let value = region.population as f64;
            let sweep = value / total * std::f64::consts::TAU;
            let wedge = Wedge {
                name: region.name,
                value,
                start_angle: angle,
                end_angle: angle + sweep,
            };
            angle += sweep;
            wedge
        })
        .collect()
}

/// 상관계수 [-1, 1] → 파랑-흰색-빨강 발산 색상.
pub fn diverging_color(r: f64) -> Color32 {
    const COOL: (u8, u8, u8) = (59, 76, 192);
    const NEUTRAL: (u8, u8, u8) = (242, 242, 242);
    const WARM: (u8, u8, u8) = (180, 4, 38);

    let r = r.clamp(-1.0, 1.0);
    let (from, to, t) = if r < 0.0 {
        (NEUTRAL, COOL, -r)
    } else {
        (NEUTRAL, WARM, r)
    };
    Color32::from_rgb(
        lerp_channel(from.0, to.0, t),
        lerp_channel(from.1, to.1, t),
        lerp_channel(from.2, to.2, t),
    )
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * t).round() as u8
}

/// 정수 눈금을 천 단위 구분 기호로, 그 외에는 소수 한 자리로 표시한다.
fn tick_label(config: &RenderConfig, value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 {
        return config.fmt_number(value, 1);
    }
    let text = data::format_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("{}{}", config.minus_sign(), text)
    } else {
        text
    }
}

fn category_label(names: &[String], mark: GridMark) -> String {
    let index = mark.value.round();
    if (mark.value - index).abs() > 0.05 || index < 0.0 {
        return String::new();
    }
    names.get(index as usize).cloned().unwrap_or_default()
}

fn region_names(regions: &[Region]) -> Vec<String> {
    regions.iter().map(|r| r.name.to_owned()).collect()
}

/// 막대 차트: 지역별 인구수, 막대 위에 천 단위 값 표기.
pub fn population_bar(ui: &mut egui::Ui, regions: &[Region], config: &RenderConfig) {
    ui.label(RichText::new("지역별 인구수").strong());

    let bars: Vec<Bar> = regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            Bar::new(i as f64, region.population as f64)
                .width(0.6)
                .fill(PALETTE[i % PALETTE.len()])
                .name(region.name)
        })
        .collect();
    let chart = BarChart::new("지역별 인구수", bars);

    let names = region_names(regions);
    let y_config = config.clone();
    let max_population = regions.iter().map(|r| r.population).max().unwrap_or(0) as f64;

    Plot::new("population_bar")
        .height(MAIN_CHART_HEIGHT)
        .show_grid([false, true])
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("지역")
        .y_axis_label("인구수 (명)")
        .x_axis_formatter(move |mark, _range| category_label(&names, mark))
        .y_axis_formatter(move |mark, _range| tick_label(&y_config, mark.value))
        .include_x(-0.6)
        .include_x(regions.len() as f64 - 0.4)
        .include_y(0.0)
        .include_y(max_population * 1.12)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            for (i, region) in regions.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        format!("{}_값", region.name),
                        PlotPoint::new(i as f64, region.population as f64),
                        RichText::new(data::format_thousands(region.population)).size(11.0),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

/// 선 그래프: 지역별 인구밀도, 원형 마커 포함.
pub fn density_line(ui: &mut egui::Ui, regions: &[Region], config: &RenderConfig) {
    ui.label(RichText::new("지역별 인구밀도").strong());

    let points: Vec<[f64; 2]> = regions
        .iter()
        .enumerate()
        .map(|(i, region)| [i as f64, region.density as f64])
        .collect();

    let names = region_names(regions);
    let y_config = config.clone();

    Plot::new("density_line")
        .height(MAIN_CHART_HEIGHT)
        .show_grid(true)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("지역")
        .y_axis_label("인구밀도 (명/㎢)")
        .x_axis_formatter(move |mark, _range| category_label(&names, mark))
        .y_axis_formatter(move |mark, _range| tick_label(&y_config, mark.value))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("지역별 인구밀도", PlotPoints::new(points.clone()))
                    .color(PALETTE[0])
                    .width(2.0),
            );
            plot_ui.points(
                Points::new("인구밀도", PlotPoints::new(points))
                    .shape(MarkerShape::Circle)
                    .radius(4.0)
                    .filled(true)
                    .color(PALETTE[0]),
            );
        });
}

/// 파이 차트: 지역별 인구 비율. 조각마다 지역명과 백분율을 표기한다.
pub fn population_pie(ui: &mut egui::Ui, regions: &[Region], _config: &RenderConfig) {
    ui.label(RichText::new("지역별 인구 비율").strong());

    let wedges = pie_wedges(regions);
    let total = data::total_population(regions) as f64;

    Plot::new("population_pie")
        .height(MAIN_CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.7)
        .include_x(1.7)
        .include_y(-1.7)
        .include_y(1.7)
        .show(ui, |plot_ui| {
            for (i, wedge) in wedges.iter().enumerate() {
                plot_ui.polygon(
                    Polygon::new(wedge.name, PlotPoints::new(wedge_polygon(wedge, 1.0)))
                        .fill_color(PALETTE[i % PALETTE.len()])
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                let mid = wedge.mid_angle();
                let percent = wedge.value / total * 100.0;
                plot_ui.text(
                    Text::new(
                        format!("{}_비율", wedge.name),
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{percent:.1}%"))
                            .color(Color32::WHITE)
                            .strong()
                            .size(11.0),
                    ),
                );
                plot_ui.text(Text::new(
                    format!("{}_이름", wedge.name),
                    PlotPoint::new(1.18 * mid.cos(), 1.18 * mid.sin()),
                    RichText::new(wedge.name).size(12.0),
                ));
            }
        });
}

/// 히트맵: 인구수·면적·인구밀도의 상관관계 행렬.
pub fn correlation_heatmap(ui: &mut egui::Ui, regions: &[Region], config: &RenderConfig) {
    ui.label(RichText::new("인구수, 면적, 인구밀도 상관관계").strong());

    let population: Vec<f64> = regions.iter().map(|r| r.population as f64).collect();
    let area: Vec<f64> = regions.iter().map(|r| r.area_km2).collect();
    let density: Vec<f64> = regions.iter().map(|r| r.density as f64).collect();
    let matrix = stats::correlation_matrix(&[&population, &area, &density]);

    let x_labels: Vec<String> = CORR_LABELS.iter().map(|s| s.to_string()).collect();
    // 위에서 아래로 인구수, 면적, 인구밀도 순이 되도록 y축을 뒤집는다.
    let y_labels: Vec<String> = CORR_LABELS.iter().rev().map(|s| s.to_string()).collect();

    Plot::new("correlation_heatmap")
        .height(MAIN_CHART_HEIGHT)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .x_axis_formatter(move |mark, _range| category_label(&x_labels, mark))
        .y_axis_formatter(move |mark, _range| category_label(&y_labels, mark))
        .include_x(-0.7)
        .include_x(2.7)
        .include_y(-0.7)
        .include_y(2.7)
        .show(ui, |plot_ui| {
            for (i, row) in matrix.iter().enumerate() {
                for (j, &value) in row.iter().enumerate() {
                    let x = j as f64;
                    let y = (matrix.len() - 1 - i) as f64;
                    let half = 0.48;
                    let cell = vec![
                        [x - half, y - half],
                        [x + half, y - half],
                        [x + half, y + half],
                        [x - half, y + half],
                    ];
                    plot_ui.polygon(
                        Polygon::new(format!("셀_{i}_{j}"), PlotPoints::new(cell))
                            .fill_color(diverging_color(value))
                            .stroke(Stroke::new(0.5, Color32::WHITE)),
                    );
                    let text_color = if value.abs() > 0.65 {
                        Color32::WHITE
                    } else {
                        Color32::from_gray(40)
                    };
                    plot_ui.text(Text::new(
                        format!("값_{i}_{j}"),
                        PlotPoint::new(x, y),
                        RichText::new(config.fmt_number(value, 2))
                            .color(text_color)
                            .size(13.0),
                    ));
                }
            }
        });
}

/// 산점도: 면적 대 인구수, 버블 크기는 인구밀도.
pub fn area_population_scatter(ui: &mut egui::Ui, regions: &[Region], config: &RenderConfig) {
    ui.label(RichText::new("면적 vs 인구수 (버블 크기: 인구밀도)").strong());

    let y_config = config.clone();

    Plot::new("area_population_scatter")
        .height(MAIN_CHART_HEIGHT)
        .show_grid(true)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("면적 (㎢)")
        .y_axis_label("인구수 (명)")
        .y_axis_formatter(move |mark, _range| tick_label(&y_config, mark.value))
        .set_margin_fraction(egui::Vec2::new(0.12, 0.12))
        .show(ui, |plot_ui| {
            for (i, region) in regions.iter().enumerate() {
                let radius = ((region.density as f32 / 30.0).sqrt()).max(3.0);
                plot_ui.points(
                    Points::new(
                        region.name,
                        PlotPoints::new(vec![[region.area_km2, region.population as f64]]),
                    )
                    .shape(MarkerShape::Circle)
                    .radius(radius)
                    .filled(true)
                    .color(PALETTE[i % PALETTE.len()].gamma_multiply(0.8)),
                );
                plot_ui.text(
                    Text::new(
                        format!("{}_이름", region.name),
                        PlotPoint::new(region.area_km2, region.population as f64),
                        RichText::new(region.name).size(11.0),
                    )
                    .anchor(Align2::LEFT_BOTTOM),
                );
            }
        });
}

/// 보조 차트: 가로형 인구수 막대.
pub fn population_hbar(ui: &mut egui::Ui, regions: &[Region], config: &RenderConfig) {
    ui.label(RichText::new("지역별 인구수 (가로형)").strong());

    let bars: Vec<Bar> = regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            Bar::new(i as f64, region.population as f64)
                .width(0.6)
                .fill(PALETTE[i % PALETTE.len()])
                .name(region.name)
        })
        .collect();
    let chart = BarChart::new("인구수", bars).horizontal();

    let names = region_names(regions);
    let x_config = config.clone();

    Plot::new("population_hbar")
        .height(SUB_CHART_HEIGHT)
        .show_grid([true, false])
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| tick_label(&x_config, mark.value))
        .y_axis_formatter(move |mark, _range| category_label(&names, mark))
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// 보조 차트: 인구 비율 도넛. 가운데 구멍은 배경색 원으로 덮는다.
pub fn population_donut(ui: &mut egui::Ui, regions: &[Region], _config: &RenderConfig) {
    ui.label(RichText::new("지역별 인구 비율 (도넛 차트)").strong());

    let wedges = pie_wedges(regions);
    let hole_color = ui.visuals().panel_fill;

    Plot::new("population_donut")
        .height(SUB_CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .legend(Legend::default())
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.4)
        .include_y(1.4)
        .show(ui, |plot_ui| {
            for (i, wedge) in wedges.iter().enumerate() {
                plot_ui.polygon(
                    Polygon::new(wedge.name, PlotPoints::new(wedge_polygon(wedge, 1.0)))
                        .fill_color(PALETTE[i % PALETTE.len()])
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
            plot_ui.polygon(
                Polygon::new("", PlotPoints::new(circle_polygon(0.3)))
                    .fill_color(hole_color)
                    .stroke(Stroke::NONE),
            );
        });
}

/// 부채꼴 다각형 (중심 → 호). 한 조각이 반원을 넘지 않아야 올바르게 칠해진다.
fn wedge_polygon(wedge: &Wedge, radius: f64) -> Vec<[f64; 2]> {
    const ARC_STEPS: usize = 64;
    let mut points = Vec::with_capacity(ARC_STEPS + 2);
    points.push([0.0, 0.0]);
    for step in 0..=ARC_STEPS {
        let t = step as f64 / ARC_STEPS as f64;
        let angle = wedge.start_angle + wedge.sweep() * t;
        points.push([radius * angle.cos(), radius * angle.sin()]);
    }
    points
}

fn circle_polygon(radius: f64) -> Vec<[f64; 2]> {
    const STEPS: usize = 72;
    (0..STEPS)
        .map(|step| {
            let angle = step as f64 / STEPS as f64 * std::f64::consts::TAU;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::REGIONS;

    #[test]
    fn wedge_values_sum_to_total_population() {
        let wedges = pie_wedges(&REGIONS);
        assert_eq!(wedges.len(), 8);
        let sum: f64 = wedges.iter().map(|w| w.value).sum();
        assert_eq!(sum as u64, 24_860_013);
    }

    #[test]
    fn wedges_tile_the_full_circle() {
        let wedges = pie_wedges(&REGIONS);
        let total_sweep: f64 = wedges.iter().map(Wedge::sweep).sum();
        assert!((total_sweep - std::f64::consts::TAU).abs() < 1e-9);
        for pair in wedges.windows(2) {
            assert!((pair[0].end_angle - pair[1].start_angle).abs() < 1e-12);
        }
    }

    #[test]
    fn wedges_stay_convex() {
        // 폴리곤 채우기는 볼록 도형을 전제한다. 어떤 지역도 전체 인구의
        // 절반을 넘지 않으므로 모든 조각의 중심각이 π 미만이어야 한다.
        for wedge in pie_wedges(&REGIONS) {
            assert!(wedge.sweep() < std::f64::consts::PI, "{} 조각이 반원을 넘는다", wedge.name);
        }
    }

    #[test]
    fn empty_dataset_yields_no_wedges() {
        assert!(pie_wedges(&[]).is_empty());
    }

    #[test]
    fn diverging_color_endpoints() {
        assert_eq!(diverging_color(0.0), Color32::from_rgb(242, 242, 242));
        assert_eq!(diverging_color(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(diverging_color(-1.0), Color32::from_rgb(59, 76, 192));
        // 범위를 벗어난 값은 잘라낸다.
        assert_eq!(diverging_color(5.0), diverging_color(1.0));
    }

    #[test]
    fn tick_labels_honor_minus_setting() {
        let ascii = RenderConfig { family: Some("Malgun Gothic".into()), ascii_minus: true };
        let unicode = RenderConfig::default();
        assert_eq!(tick_label(&ascii, 16154.0), "16,154");
        assert_eq!(tick_label(&ascii, -2000.0), "-2,000");
        assert_eq!(tick_label(&unicode, -2000.0), "\u{2212}2,000");
        assert_eq!(tick_label(&ascii, 0.5), "0.5");
    }

    #[test]
    fn category_labels_skip_between_ticks() {
        let names = vec!["서울".to_string(), "부산".to_string()];
        let mark = |value: f64| GridMark { value, step_size: 1.0 };
        assert_eq!(category_label(&names, mark(0.0)), "서울");
        assert_eq!(category_label(&names, mark(1.0)), "부산");
        assert_eq!(category_label(&names, mark(0.5)), "");
        assert_eq!(category_label(&names, mark(-1.0)), "");
        assert_eq!(category_label(&names, mark(7.0)), "");
    }
}
