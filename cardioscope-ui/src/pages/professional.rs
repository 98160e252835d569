//! Clinician page, behind the route gate

use leptos::*;

use cardioscope::routes::Route;

use crate::components::{ClinicianPanelView, RoleGate};
use crate::state::SessionHandle;

#[component]
pub fn Professional(session: SessionHandle) -> impl IntoView {
    view! {
        <div class="max-w-6xl mx-auto">
            <h1 class="text-2xl font-bold mb-6">"Clinician dashboard"</h1>
            <RoleGate session=session route=Route::Professional>
                <ClinicianPanelView session=session />
            </RoleGate>
        </div>
    }
}
