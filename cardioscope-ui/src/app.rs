//! App Root Component
//!
//! Session bootstrap and routing.

use leptos::*;
use leptos_router::*;

use cardioscope::routes::Route as Page;

use crate::components::Shell;
use crate::pages::{Intro, Professional, User};
use crate::state::session::load_identity;
use crate::state::SessionHandle;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let session = SessionHandle::new();
    load_identity(session);

    view! {
        <Router>
            <Shell session=session>
                <Routes>
                    <Route path=Page::Intro.path() view=move || view! { <Intro session=session /> } />
                    <Route path=Page::User.path() view=User />
                    <Route path=Page::Professional.path() view=move || view! { <Professional session=session /> } />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </Shell>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium transition-colors"
            >
                "Back to home"
            </A>
        </div>
    }
}
