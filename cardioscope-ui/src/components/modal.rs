//! Modal Dialog

use leptos::*;

/// Centered dialog over a dimmed backdrop. Clicking the backdrop calls
/// `on_close` when one is given.
#[component]
pub fn Modal(
    #[prop(optional, into)]
    on_close: Option<Callback<()>>,
    children: Children,
) -> impl IntoView {
    let on_backdrop = move |_| {
        if let Some(on_close) = on_close {
            on_close.call(());
        }
    };

    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center">
            <div class="absolute inset-0 bg-black/50" on:click=on_backdrop />
            <div class="relative bg-white text-gray-900 rounded-xl shadow-xl p-6 w-full max-w-md">
                {children()}
            </div>
        </div>
    }
}
