//! Clinician Panel
//!
//! Patient list on the left, score breakdown and history for the selected
//! patient on the right. State transitions live in
//! [`cardioscope::clinician::ClinicianPanel`]; this component only runs the
//! fetches it asks for.

use leptos::*;

use cardioscope::clinician::{ClinicianPanel, ListRefresh, PanelCommand, PanelState};
use cardioscope::model::{PatientDetail, PatientStatus, PatientSummary};

use crate::api;
use crate::components::charts::{HistoryChart, ScoreGauge};
use crate::components::loading::{Loading, ListSkeleton};
use crate::state::{FetchScope, SessionHandle};

fn execute(panel: RwSignal<ClinicianPanel>, scope: FetchScope, commands: Vec<PanelCommand>) {
    for command in commands {
        let next_scope = scope.clone();
        match command {
            PanelCommand::FetchPatients => scope.run(
                move |signal| async move { api::fetch_patients(signal.as_ref()).await },
                move |response| {
                    let next = panel.try_update(|p| p.on_patients(response)).unwrap_or_default();
                    execute(panel, next_scope, next);
                },
            ),
            PanelCommand::FetchDetail(id) => scope.run(
                move |signal| async move { api::fetch_patient_info(id, signal.as_ref()).await },
                move |response| panel.update(|p| p.on_detail(id, response)),
            ),
            PanelCommand::FetchHistory(id) => scope.run(
                move |signal| async move { api::fetch_score_history(id, signal.as_ref()).await },
                move |response| panel.update(|p| p.on_history(id, response)),
            ),
        }
    }
}

fn status_badge(status: PatientStatus) -> &'static str {
    match status {
        PatientStatus::Normal => "bg-green-100 text-green-800",
        PatientStatus::AtRisk => "bg-amber-100 text-amber-800",
        PatientStatus::HighRisk => "bg-red-100 text-red-800",
        PatientStatus::Unclassified => "bg-gray-100 text-gray-700",
    }
}

#[component]
pub fn ClinicianPanelView(session: SessionHandle) -> impl IntoView {
    let panel = create_rw_signal(ClinicianPanel::new(ListRefresh::default()));
    let scope = FetchScope::new();

    // Enter once the session admits us; denial is rendered by the route gate.
    let entry_scope = scope.clone();
    create_effect(move |_| {
        let current = session.current();
        if panel.with_untracked(|p| p.state()) != PanelState::Unauthorized {
            return;
        }
        if let Some(Ok(commands)) = panel.try_update(|p| p.enter(current.as_ref())) {
            execute(panel, entry_scope.clone(), commands);
        }
    });

    let on_select = Callback::new(move |id: u64| {
        let commands = panel.try_update(|p| p.select(id)).unwrap_or_default();
        execute(panel, scope.clone(), commands);
    });

    view! {
        <div class="grid lg:grid-cols-3 gap-6">
            <section class="bg-white rounded-xl shadow p-4">
                <h2 class="text-lg font-semibold mb-3">"Patients"</h2>
                {move || match panel.with(|p| p.state()) {
                    PanelState::Loaded => {
                        let patients = panel.with(|p| p.patients().to_vec());
                        view! {
                            <PatientList
                                patients=patients
                                selected=Signal::derive(move || panel.with(|p| p.selected()))
                                on_select=on_select
                            />
                        }
                        .into_view()
                    }
                    _ => view! { <ListSkeleton count=5 /> }.into_view(),
                }}
            </section>

            <section class="lg:col-span-2 space-y-6">
                {move || panel.with(|p| p.error().map(str::to_string)).map(|msg| view! {
                    <div class="bg-red-50 border border-red-200 text-red-700 rounded-lg p-3 text-sm">{msg}</div>
                })}

                {move || {
                    let (busy, detail) = panel.with(|p| (p.is_detail_busy(), p.detail().cloned()));
                    match (busy, detail) {
                        (true, _) => view! { <Loading label="Loading patient..." /> }.into_view(),
                        (false, Some(detail)) => view! { <PatientScore detail=detail /> }.into_view(),
                        (false, None) => view! {
                            <p class="text-gray-500">"Select a patient to see their score."</p>
                        }
                        .into_view(),
                    }
                }}

                <div class="bg-white rounded-xl shadow p-6">
                    <h3 class="text-lg font-semibold mb-3">"Score history"</h3>
                    {move || view! { <HistoryChart entries=panel.with(|p| p.history().to_vec()) /> }}
                </div>
            </section>
        </div>
    }
}

#[component]
fn PatientList(
    patients: Vec<PatientSummary>,
    selected: Signal<Option<u64>>,
    #[prop(into)] on_select: Callback<u64>,
) -> impl IntoView {
    if patients.is_empty() {
        return view! { <p class="text-sm text-gray-500">"No patients yet."</p> }.into_view();
    }

    view! {
        <ul class="divide-y">
            {patients
                .into_iter()
                .map(|patient| {
                    let id = patient.id;
                    view! {
                        <li
                            class="flex items-center justify-between py-2 px-2 rounded cursor-pointer hover:bg-gray-50"
                            class:bg-blue-50=move || selected.get() == Some(id)
                            on:click=move |_| on_select.call(id)
                        >
                            <span>{patient.name}</span>
                            <span class=format!("text-xs px-2 py-0.5 rounded-full {}", status_badge(patient.status))>
                                {patient.status.label()}
                            </span>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_view()
}

#[component]
fn PatientScore(detail: PatientDetail) -> impl IntoView {
    let rows = detail.rubric();

    view! {
        <div class="bg-white rounded-xl shadow p-6 grid md:grid-cols-2 gap-6 items-center">
            <ScoreGauge score=detail.total_score caption=detail.risk_class.clone() />
            <table class="w-full text-sm">
                <thead>
                    <tr class="text-left text-gray-500 border-b">
                        <th class="py-1">"Risk factor"</th>
                        <th class="py-1 text-right">"Points"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| view! {
                            <tr class="border-b last:border-0">
                                <td class="py-1">{row.label}</td>
                                <td class="py-1 text-right font-medium">
                                    {row.points.map(|p| format!("{:.0}", p)).unwrap_or_else(|| "-".to_string())}
                                </td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}
