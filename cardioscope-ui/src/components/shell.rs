//! Application Shell
//!
//! Header and collapsible sidebar wrapping the routed content.

use leptos::*;
use leptos_router::*;

use cardioscope::routes::Route;

use crate::components::nav_user::NavUser;
use crate::state::SessionHandle;

#[component]
pub fn Shell(session: SessionHandle, children: Children) -> impl IntoView {
    let (sidebar_open, set_sidebar_open) = create_signal(true);

    view! {
        <div class="min-h-screen bg-gray-50 text-gray-900 flex flex-col">
            <Header on_toggle=move |_| set_sidebar_open.update(|open| *open = !*open) />

            <div class="flex flex-1">
                <Show when=move || sidebar_open.get()>
                    <Sidebar session=session />
                </Show>

                <main class="flex-1 px-6 py-8 overflow-x-hidden">
                    {children()}
                </main>
            </div>
        </div>
    }
}

#[component]
fn Header(#[prop(into)] on_toggle: Callback<()>) -> impl IntoView {
    view! {
        <header class="sticky top-0 z-40 bg-white border-b border-gray-200">
            <div class="flex items-center h-14 px-4 gap-3">
                <button
                    class="w-8 h-8 rounded-lg hover:bg-gray-100"
                    title="Toggle sidebar"
                    on:click=move |_| on_toggle.call(())
                >
                    "☰"
                </button>
                <A href="/" class="flex items-center gap-2 font-bold">
                    <span class="text-red-500">"♥"</span>
                    <span>"Cardioscope"</span>
                </A>
                <nav class="ml-auto text-sm">
                    <A href="/" class="hover:text-blue-600">"Home"</A>
                </nav>
            </div>
        </header>
    }
}

#[component]
fn Sidebar(session: SessionHandle) -> impl IntoView {
    view! {
        <aside class="w-60 shrink-0 bg-white border-r border-gray-200 flex flex-col">
            <nav class="flex-1 p-3 space-y-1">
                {Route::ALL
                    .into_iter()
                    .filter_map(|route| route.nav_label().map(|label| (route.path(), label)))
                    .map(|(href, label)| view! {
                        <A
                            href=href
                            class="block px-3 py-2 rounded-lg text-gray-700 hover:bg-gray-100"
                            active_class="bg-gray-100 font-medium"
                        >
                            {label}
                        </A>
                    })
                    .collect_view()}
            </nav>
            <NavUser session=session />
        </aside>
    }
}
