//! General user page: upload, then the result dashboard

use leptos::*;

use cardioscope::model::AnalysisResult;

use crate::components::{ResultDashboard, UploadForm};

#[component]
pub fn User() -> impl IntoView {
    let (result, set_result) = create_signal(None::<AnalysisResult>);

    view! {
        <div class="max-w-5xl mx-auto space-y-8">
            <UploadForm on_success=move |r| set_result.set(Some(r)) />

            // A new upload replaces the previous dashboard outright.
            {move || result.get().map(|r| view! { <ResultDashboard result=r /> })}
        </div>
    }
}
