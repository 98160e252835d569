//! ECG Upload Form
//!
//! Questionnaire plus ECG image (and optional checkup image). Validation and
//! request building come from [`cardioscope::upload`].

use leptos::*;
use wasm_bindgen::JsCast;

use cardioscope::model::AnalysisResult;
use cardioscope::questionnaire::{fields_in, Field, FieldGroup, FieldKind};
use cardioscope::upload::{Attachment, UploadForm as FormState};

use crate::api;
use crate::components::loading::InlineLoading;
use crate::state::FetchScope;

type Form = FormState<web_sys::File>;

const GROUPS: [(FieldGroup, &str); 4] = [
    (FieldGroup::Basics, "Basic information"),
    (FieldGroup::History, "Medical history"),
    (FieldGroup::FamilyHistory, "Family history"),
    (FieldGroup::Lifestyle, "Lifestyle"),
];

#[derive(Clone, Copy, PartialEq)]
enum Slot {
    Ecg,
    Checkup,
}

/// Upload form. `on_success` receives the parsed analysis result.
#[component]
pub fn UploadForm(#[prop(into)] on_success: Callback<AnalysisResult>) -> impl IntoView {
    let form = create_rw_signal(Form::new());
    let (file_error, set_file_error) = create_signal(None::<String>);
    let scope = FetchScope::new();

    let on_file = move |slot: Slot, ev: ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let clear = move || {
            form.update(|f| match slot {
                Slot::Ecg => f.clear_ecg(),
                Slot::Checkup => f.clear_checkup(),
            })
        };

        // A cancelled picker leaves the input empty; the form follows it.
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            clear();
            return;
        };

        let (name, mime) = (file.name(), file.type_());
        match Attachment::new(file, name, mime) {
            Ok(attachment) => {
                set_file_error.set(None);
                form.update(|f| match slot {
                    Slot::Ecg => f.attach_ecg(attachment),
                    Slot::Checkup => f.attach_checkup(attachment),
                });
            }
            Err(blocked) => {
                input.set_value("");
                clear();
                set_file_error.set(Some(blocked.to_string()));
            }
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let request = match form.try_update(|f| f.begin_submit()) {
            Some(Ok(request)) => request,
            _ => return,
        };

        scope.run(
            move |signal| async move { api::upload(&request, signal.as_ref()).await },
            move |outcome| {
                if let Some(result) = form.try_update(|f| f.finish(outcome)).flatten() {
                    on_success.call(result);
                }
            },
        );
    };

    let in_flight = move || form.with(|f| f.is_in_flight());

    view! {
        <form on:submit=on_submit class="bg-white rounded-xl shadow p-6 space-y-6">
            <h2 class="text-xl font-semibold">"ECG analysis"</h2>

            <div class="grid md:grid-cols-2 gap-4">
                <FileInput
                    label="ECG image (lead II)"
                    required=true
                    file_name=Signal::derive(move || form.with(|f| f.ecg().map(|a| a.name.clone())))
                    on_change=move |ev| on_file(Slot::Ecg, ev)
                />
                <FileInput
                    label="Health checkup image (optional)"
                    required=false
                    file_name=Signal::derive(move || form.with(|f| f.checkup().map(|a| a.name.clone())))
                    on_change=move |ev| on_file(Slot::Checkup, ev)
                />
            </div>
            {move || file_error.get().map(|msg| view! { <p class="text-sm text-red-600">{msg}</p> })}

            {GROUPS
                .into_iter()
                .map(|(group, title)| view! {
                    <fieldset class="space-y-3">
                        <legend class="font-medium text-gray-800 mb-2">{title}</legend>
                        <div class="grid md:grid-cols-3 gap-3">
                            {fields_in(group).map(|field| view! { <QuestionInput form=form field=*field /> }).collect_view()}
                        </div>
                    </fieldset>
                })
                .collect_view()}

            <div class="flex items-center gap-4">
                <button
                    type="submit"
                    disabled=in_flight
                    class="px-6 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400 text-white font-semibold flex items-center gap-2"
                >
                    {move || if in_flight() {
                        view! { <InlineLoading /> <span>"Analyzing..."</span> }.into_view()
                    } else {
                        view! { <span>"Analyze"</span> }.into_view()
                    }}
                </button>
                <span class="text-sm text-gray-600">
                    {move || form.with(|f| f.status().map(str::to_string))}
                </span>
            </div>
        </form>
    }
}

#[component]
fn FileInput(
    label: &'static str,
    required: bool,
    file_name: Signal<Option<String>>,
    #[prop(into)]
    on_change: Callback<ev::Event>,
) -> impl IntoView {
    view! {
        <label class="block border-2 border-dashed border-gray-300 rounded-lg p-4 cursor-pointer hover:border-blue-400">
            <span class="block text-sm font-medium text-gray-700">
                {label}
                {required.then_some(" *")}
            </span>
            <span class="block text-xs text-gray-500 mt-1">
                {move || file_name.get().unwrap_or_else(|| "JPEG or PNG".to_string())}
            </span>
            <input
                type="file"
                accept="image/jpeg,image/png"
                class="hidden"
                on:change=move |ev| on_change.call(ev)
            />
        </label>
    }
}

#[component]
fn QuestionInput(form: RwSignal<Form>, field: Field) -> impl IntoView {
    let key = field.key;

    match field.kind {
        FieldKind::Number { placeholder } => view! {
            <label class="block">
                <span class="text-sm text-gray-700">{field.label}</span>
                <input
                    type="number"
                    min="0"
                    placeholder=placeholder
                    class="mt-1 w-full border rounded-lg px-3 py-2"
                    prop:value=move || form.with(|f| f.questionnaire.get(key).to_string())
                    on:input=move |ev| form.update(|f| f.questionnaire.set(key, event_target_value(&ev)))
                />
            </label>
        }
        .into_view(),

        FieldKind::Radio { options } => view! {
            <div>
                <span class="text-sm text-gray-700">{field.label}</span>
                <div class="mt-1 flex flex-wrap gap-3">
                    {options
                        .iter()
                        .map(|&(value, label)| view! {
                            <label class="flex items-center gap-1 text-sm cursor-pointer">
                                <input
                                    type="radio"
                                    name=key
                                    value=value
                                    prop:checked=move || form.with(|f| f.questionnaire.get(key) == value)
                                    on:change=move |_| form.update(|f| f.questionnaire.set(key, value))
                                />
                                {label}
                            </label>
                        })
                        .collect_view()}
                </div>
            </div>
        }
        .into_view(),

        FieldKind::Checkbox { .. } => view! {
            <label class="flex items-center gap-2 text-sm cursor-pointer">
                <input
                    type="checkbox"
                    prop:checked=move || form.with(|f| f.questionnaire.is_checked(key))
                    on:change=move |ev| form.update(|f| f.questionnaire.set_checked(key, event_target_checked(&ev)))
                />
                {field.label}
            </label>
        }
        .into_view(),
    }
}
