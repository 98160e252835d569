//! Login / Signup Form

use leptos::*;

use cardioscope::auth::{AuthForm, AuthMode, AuthOutcome, MemberType};

use crate::api;
use crate::state::{FetchScope, SessionHandle};

/// Sign in or create an account. `on_signed_in` fires after a successful
/// login has replaced the session.
#[component]
pub fn LoginForm(
    session: SessionHandle,
    #[prop(into)]
    on_signed_in: Callback<()>,
) -> impl IntoView {
    let form = create_rw_signal(AuthForm::new());
    let (error, set_error) = create_signal(None::<String>);
    let (notice, set_notice) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);
    let scope = FetchScope::new();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let request = match form.with_untracked(|f| f.prepare()) {
            Ok(request) => request,
            Err(blocked) => {
                set_error.set(Some(blocked.to_string()));
                return;
            }
        };

        set_error.set(None);
        set_notice.set(None);
        set_submitting.set(true);

        let body = request.clone();
        scope.run(
            move |signal| async move { api::authenticate(&body, signal.as_ref()).await },
            move |response| {
                set_submitting.set(false);
                match request.outcome(response) {
                    AuthOutcome::SignedIn(user) => {
                        session.set(Some(user));
                        on_signed_in.call(());
                    }
                    AuthOutcome::Registered(message) => {
                        set_notice.set(Some(message));
                        form.update(|f| f.mode = AuthMode::Login);
                    }
                    AuthOutcome::Failed(message) => set_error.set(Some(message)),
                }
            },
        );
    };

    let is_register = move || form.with(|f| f.mode == AuthMode::Register);

    view! {
        <form on:submit=on_submit class="space-y-4">
            <h2 class="text-xl font-semibold">{move || form.with(|f| f.mode.title())}</h2>

            <input
                type="text"
                placeholder="ID"
                class="w-full border rounded-lg px-3 py-2"
                prop:value=move || form.with(|f| f.username.clone())
                on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
            />
            <input
                type="password"
                placeholder="Password"
                class="w-full border rounded-lg px-3 py-2"
                prop:value=move || form.with(|f| f.password.clone())
                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
            />

            <Show when=is_register>
                <div class="flex gap-4">
                    {[MemberType::User, MemberType::Pro]
                        .into_iter()
                        .map(|member| {
                            view! {
                                <label class="flex items-center gap-2 cursor-pointer">
                                    <input
                                        type="radio"
                                        name="member-type"
                                        value=member.token()
                                        prop:checked=move || form.with(|f| f.member_type == Some(member))
                                        on:change=move |ev| {
                                            let token = event_target_value(&ev);
                                            form.update(|f| f.member_type = MemberType::from_token(&token));
                                        }
                                    />
                                    <span>{member.label()}</span>
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>

            {move || error.get().map(|msg| view! { <p class="text-sm text-red-600">{msg}</p> })}
            {move || notice.get().map(|msg| view! { <p class="text-sm text-green-600">{msg}</p> })}

            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400 text-white rounded-lg py-2 font-semibold"
            >
                {move || if is_register() { "Sign up" } else { "Sign in" }}
            </button>

            <button
                type="button"
                class="w-full text-sm text-blue-600 hover:underline"
                on:click=move |_| {
                    set_error.set(None);
                    form.update(|f| f.toggle_mode());
                }
            >
                {move || if is_register() { "Already have an account? Sign in" } else { "New here? Create an account" }}
            </button>
        </form>
    }
}
