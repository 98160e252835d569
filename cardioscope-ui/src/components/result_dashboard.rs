//! Result Dashboard
//!
//! Renders one analysis result. The heatmap toggle only changes local view
//! state; nothing here touches the network.

use leptos::*;

use cardioscope::dashboard::{png_data_url, DashboardView, RiskNarrative, VascularCard};
use cardioscope::model::AnalysisResult;

use crate::components::charts::{ImportancePie, WaveformChart};

#[component]
pub fn ResultDashboard(result: AnalysisResult) -> impl IntoView {
    let view_model = create_rw_signal(DashboardView::new(result));
    let snapshot = view_model.get_untracked();

    let narrative = snapshot.narrative();
    let narrative_class = match narrative {
        RiskNarrative::Reassurance => "bg-green-50 border-green-300 text-green-800",
        RiskNarrative::ModerateWarning => "bg-amber-50 border-amber-300 text-amber-800",
        RiskNarrative::UrgentWarning => "bg-red-50 border-red-300 text-red-800",
    };
    let heatmap_src = png_data_url(&snapshot.result().heatmap);

    view! {
        <section class="space-y-6">
            <div class="grid md:grid-cols-3 gap-4">
                <SummaryCard title="Result" value=snapshot.verdict().to_string() />
                <SummaryCard title="Abnormal probability" value=snapshot.probability_text() />
                <div class=format!("rounded-xl border p-4 {}", narrative_class)>
                    <p class="text-sm">{narrative.message()}</p>
                </div>
            </div>

            <div class="bg-white rounded-xl shadow p-6">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="text-lg font-semibold">"ECG signal"</h3>
                    <button
                        class="text-sm px-3 py-1 rounded-lg border hover:bg-gray-100"
                        on:click=move |_| view_model.update(DashboardView::toggle_heatmap)
                    >
                        {move || view_model.with(|v| v.heatmap_button_label())}
                    </button>
                </div>
                <div class="relative">
                    <WaveformChart samples=snapshot.result().ecg_signal.clone() ticks=snapshot.time_ticks() />
                    <Show when=move || view_model.with(|v| v.show_heatmap())>
                        <img
                            src=heatmap_src.clone()
                            alt="Grad-CAM key regions"
                            class="absolute inset-0 w-full h-full object-fill opacity-60 pointer-events-none rounded-lg"
                        />
                    </Show>
                </div>
            </div>

            <div class="bg-white rounded-xl shadow p-6 space-y-4">
                <h3 class="text-lg font-semibold">"What drove this result"</h3>
                <ImportancePie slices=snapshot.importance_slices() />
                <p class="text-sm text-gray-600">{snapshot.importance_note()}</p>
            </div>

            <div class="grid md:grid-cols-2 gap-4">
                {snapshot
                    .waveform_sections()
                    .into_iter()
                    .map(|(title, text)| view! {
                        <div class="bg-white rounded-xl shadow p-4">
                            <h4 class="font-medium mb-1">{title}</h4>
                            <p class="text-sm text-gray-700 whitespace-pre-line">{text}</p>
                        </div>
                    })
                    .collect_view()}
            </div>

            <div class="bg-blue-50 border border-blue-200 rounded-xl p-4">
                <h4 class="font-medium mb-1">"Recommendation"</h4>
                <p class="text-sm whitespace-pre-line">{snapshot.recommendation()}</p>
            </div>

            {snapshot.vascular_card().map(|card| view! { <VascularRiskCard card=card /> })}
        </section>
    }
}

#[component]
fn SummaryCard(title: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl shadow p-4">
            <div class="text-sm text-gray-500">{title}</div>
            <div class="text-2xl font-bold mt-1">{value}</div>
        </div>
    }
}

#[component]
fn VascularRiskCard(card: VascularCard) -> impl IntoView {
    let split = card.report_is_split();

    view! {
        <div class="bg-white rounded-xl shadow p-6 space-y-4">
            <h3 class="text-lg font-semibold">"Vascular risk"</h3>
            {card.high_risk_percent.map(|percent| view! {
                <p>
                    "High-risk probability: "
                    <span class="font-bold">{format!("{:.1}%", percent)}</span>
                </p>
            })}
            {card.chart_base64.as_deref().map(|b64| view! {
                <img src=png_data_url(b64) alt="Vascular risk factors" class="w-full max-w-xl" />
            })}
            {card
                .sections
                .into_iter()
                .enumerate()
                .map(|(idx, text)| {
                    let class = if split && idx > 0 {
                        "text-sm text-gray-700 whitespace-pre-line border-t pt-3"
                    } else {
                        "text-sm text-gray-700 whitespace-pre-line"
                    };
                    view! { <p class=class>{text}</p> }
                })
                .collect_view()}
        </div>
    }
}
