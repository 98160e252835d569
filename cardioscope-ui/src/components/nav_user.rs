//! Sidebar user menu
//!
//! Signed out: a button opening the login modal. Signed in: the username,
//! role and a logout button.

use leptos::*;

use crate::api;
use crate::components::login_form::LoginForm;
use crate::components::modal::Modal;
use crate::state::SessionHandle;

#[component]
pub fn NavUser(session: SessionHandle) -> impl IntoView {
    let (login_open, set_login_open) = create_signal(false);

    let on_logout = move |_| {
        spawn_local(async move {
            if let Err(e) = api::logout().await {
                web_sys::console::warn_1(&format!("Logout failed: {}", e).into());
            }
            session.set(None);
        });
    };

    view! {
        <div class="border-t border-gray-200 p-4">
            {move || match session.current() {
                Some(user) => view! {
                    <div class="flex items-center justify-between gap-2">
                        <div>
                            <div class="font-medium">{user.username.clone()}</div>
                            <div class="text-xs text-gray-500">
                                {if user.is_professional() { "Clinician" } else { "General user" }}
                            </div>
                        </div>
                        <button
                            class="text-sm px-3 py-1 rounded-lg border hover:bg-gray-100"
                            on:click=on_logout
                        >
                            "Log out"
                        </button>
                    </div>
                }.into_view(),
                None => view! {
                    <button
                        class="w-full text-sm px-3 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white"
                        on:click=move |_| set_login_open.set(true)
                    >
                        "Sign in"
                    </button>
                }.into_view(),
            }}

            <Show when=move || login_open.get()>
                <Modal on_close=move |_| set_login_open.set(false)>
                    <LoginForm session=session on_signed_in=move |_| set_login_open.set(false) />
                </Modal>
            </Show>
        </div>
    }
}
