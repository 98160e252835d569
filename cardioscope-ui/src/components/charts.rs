//! Chart Components
//!
//! Minimal drawing for the dashboard: the ECG waveform on a canvas, and
//! SVG pie, radial gauge and bar charts.

use leptos::*;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use cardioscope::clinician::{gauge_color, gauge_fraction, history_color};
use cardioscope::dashboard::ImportanceSlice;
use cardioscope::model::{EcgSample, ScoreHistoryEntry};

const WAVE_COLOR: &str = "#ef4444";

/// ECG voltage over time
#[component]
pub fn WaveformChart(samples: Vec<EcgSample>, ticks: Vec<f64>) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_waveform(&canvas, &samples, &ticks);
        }
    });

    view! {
        <canvas
            node_ref=canvas_ref
            width="900"
            height="260"
            class="w-full h-64 rounded-lg bg-white"
        />
    }
}

fn draw_waveform(canvas: &HtmlCanvasElement, samples: &[EcgSample], ticks: &[f64]) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 50.0;
    let margin_right = 15.0;
    let margin_top = 15.0;
    let margin_bottom = 30.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if samples.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No signal", width / 2.0 - 35.0, height / 2.0);
        return;
    }

    let max_time = samples.iter().map(|s| s.time).fold(0.0_f64, f64::max).max(1.0);
    let mut v_min = samples.iter().map(|s| s.voltage).fold(f64::INFINITY, f64::min);
    let mut v_max = samples.iter().map(|s| s.voltage).fold(f64::NEG_INFINITY, f64::max);
    if v_min == v_max {
        v_min -= 1.0;
        v_max += 1.0;
    }

    let x_of = |t: f64| margin_left + (t / max_time) * chart_width;
    let y_of = |v: f64| margin_top + ((v_max - v) / (v_max - v_min)) * chart_height;

    // Vertical grid line and label at each whole second
    ctx.set_stroke_style(&"#fecaca".into()); // red-200
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for &tick in ticks {
        let x = x_of(tick);
        ctx.begin_path();
        ctx.move_to(x, margin_top);
        ctx.line_to(x, margin_top + chart_height);
        ctx.stroke();

        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&format!("{}s", tick), x - 6.0, height - 10.0);
    }

    // Voltage labels
    for i in 0..=4 {
        let value = v_max - (i as f64 / 4.0) * (v_max - v_min);
        let y = margin_top + (i as f64 / 4.0) * chart_height;
        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&format!("{:.2}", value), 5.0, y + 4.0);
    }

    ctx.set_stroke_style(&WAVE_COLOR.into());
    ctx.set_line_width(1.5);
    ctx.begin_path();
    for (i, sample) in samples.iter().enumerate() {
        let (x, y) = (x_of(sample.time), y_of(sample.voltage));
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();
}

fn polar(cx: f64, cy: f64, r: f64, fraction: f64) -> (f64, f64) {
    let angle = fraction * 2.0 * PI - PI / 2.0;
    (cx + r * angle.cos(), cy + r * angle.sin())
}

/// SVG path for one pie wedge spanning `start..end` (fractions of a turn)
fn wedge_path(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> String {
    let (x1, y1) = polar(cx, cy, r, start);
    let (x2, y2) = polar(cx, cy, r, end);
    let large_arc = if end - start > 0.5 { 1 } else { 0 };
    format!(
        "M {cx} {cy} L {x1:.3} {y1:.3} A {r} {r} 0 {large_arc} 1 {x2:.3} {y2:.3} Z"
    )
}

/// Feature importance pie with legend
#[component]
pub fn ImportancePie(slices: Vec<ImportanceSlice>) -> impl IntoView {
    let total: f64 = slices.iter().map(|s| s.percent.max(0.0)).sum();
    let (cx, cy, r) = (100.0, 100.0, 90.0);

    let mut start = 0.0;
    let wedges = slices
        .iter()
        .filter(|s| s.percent > 0.0 && total > 0.0)
        .map(|slice| {
            let span = slice.percent / total;
            let shape = if span >= 0.9999 {
                view! { <circle cx=cx cy=cy r=r fill=slice.color /> }.into_view()
            } else {
                let d = wedge_path(cx, cy, r, start, start + span);
                view! { <path d=d fill=slice.color /> }.into_view()
            };
            start += span;
            shape
        })
        .collect_view();

    let legend = slices
        .iter()
        .map(|slice| {
            view! {
                <li class="flex items-center gap-2 text-sm">
                    <span class="w-3 h-3 rounded-full" style=format!("background-color: {}", slice.color) />
                    <span class="text-gray-700">{slice.name}</span>
                    <span class="ml-auto font-medium">{format!("{:.1}%", slice.percent)}</span>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="flex flex-col md:flex-row items-center gap-6">
            <svg viewBox="0 0 200 200" class="w-48 h-48">{wedges}</svg>
            <ul class="space-y-1 w-full max-w-xs">{legend}</ul>
        </div>
    }
}

/// Radial gauge for a 0–100 total score
#[component]
pub fn ScoreGauge(score: f64, #[prop(into)] caption: String) -> impl IntoView {
    let r = 70.0;
    let circumference = 2.0 * PI * r;
    let filled = gauge_fraction(score) * circumference;
    let color = gauge_color(score).hex();

    view! {
        <div class="flex flex-col items-center">
            <svg viewBox="0 0 180 180" class="w-44 h-44">
                <circle cx="90" cy="90" r=r fill="none" stroke="#e5e7eb" stroke-width="14" />
                <circle
                    cx="90"
                    cy="90"
                    r=r
                    fill="none"
                    stroke=color
                    stroke-width="14"
                    stroke-linecap="round"
                    stroke-dasharray=format!("{:.2} {:.2}", filled, circumference)
                    transform="rotate(-90 90 90)"
                />
                <text x="90" y="90" text-anchor="middle" dominant-baseline="middle" class="text-3xl font-bold" fill="#111827">
                    {format!("{:.0}", score)}
                </text>
                <text x="90" y="118" text-anchor="middle" class="text-xs" fill="#6b7280">"points"</text>
            </svg>
            <span class="text-sm text-gray-600 mt-1">{caption}</span>
        </div>
    }
}

/// Score history bars, oldest first
#[component]
pub fn HistoryChart(entries: Vec<ScoreHistoryEntry>) -> impl IntoView {
    if entries.is_empty() {
        return view! { <p class="text-sm text-gray-500">"No score history."</p> }.into_view();
    }

    let (width, height, bottom) = (400.0, 200.0, 24.0);
    let slot = width / entries.len() as f64;
    let bar_width = (slot * 0.6).min(40.0);

    let bars = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let bar_height = (entry.score.clamp(0.0, 100.0) / 100.0) * (height - bottom - 16.0);
            let x = i as f64 * slot + (slot - bar_width) / 2.0;
            let y = height - bottom - bar_height;
            let label_x = x + bar_width / 2.0;
            view! {
                <g>
                    <rect x=x y=y width=bar_width height=bar_height rx="4" fill=history_color(entry.score).hex() />
                    <text x=label_x y={y - 4.0} text-anchor="middle" class="text-[10px]" fill="#374151">
                        {format!("{:.0}", entry.score)}
                    </text>
                    <text x=label_x y={height - 6.0} text-anchor="middle" class="text-[10px]" fill="#6b7280">
                        {entry.short_date()}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <svg viewBox=format!("0 0 {} {}", width, height) class="w-full h-52">{bars}</svg>
    }
    .into_view()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedge_large_arc_flag() {
        assert!(wedge_path(100.0, 100.0, 90.0, 0.0, 0.6).contains(" 0 1 1 "));
        assert!(wedge_path(100.0, 100.0, 90.0, 0.0, 0.25).contains(" 0 0 1 "));
    }

    #[test]
    fn test_polar_starts_at_top() {
        let (x, y) = polar(100.0, 100.0, 90.0, 0.0);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);
    }
}
