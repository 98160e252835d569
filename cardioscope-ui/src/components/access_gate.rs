//! Access Gate Components
//!
//! Rendering of [`cardioscope::gate`]: the denial modal, and a route guard
//! that shows its children only to admitted sessions.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};
use std::cell::RefCell;
use std::rc::Rc;

use cardioscope::gate::{Denial, GateDecision, Redirect};
use cardioscope::routes::Route;

use crate::components::modal::Modal;
use crate::state::SessionHandle;

/// Fixed-copy denial dialog
#[component]
pub fn DenialModal(denial: Denial) -> impl IntoView {
    view! {
        <Modal>
            <h2 class="text-lg font-semibold mb-2">{denial.title}</h2>
            <p class="text-gray-600">{denial.body}</p>
            {denial.note.map(|note| view! { <p class="text-sm text-gray-400 mt-4">{note}</p> })}
        </Modal>
    }
}

fn history_len() -> u32 {
    web_sys::window()
        .and_then(|w| w.history().ok())
        .and_then(|h| h.length().ok())
        .unwrap_or(0)
}

/// Protect a routed view with its route's gate. A denied visitor sees the
/// modal and is sent away once the delay elapses, even if the session
/// resolves differently in the meantime. Leaving the view first cancels the timer.
#[component]
pub fn RoleGate(session: SessionHandle, route: Route, children: ChildrenFn) -> impl IntoView {
    let gate = route.gate();
    let navigate = use_navigate();
    let (denial, set_denial) = create_signal(None::<Denial>);
    let timer: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    let pending = Rc::clone(&timer);
    create_effect(move |_| {
        let Some(gate) = gate else {
            return;
        };
        let GateDecision::Deny(found) = gate.check(session.current().as_ref()) else {
            return;
        };
        if pending.borrow().is_some() {
            return;
        }

        let redirect = found.redirect(history_len());
        let navigate = navigate.clone();
        let delay_ms = found.delay.as_millis() as u32;
        *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || match redirect {
            Redirect::Back => {
                if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                    let _ = history.back();
                }
            }
            Redirect::Home => navigate(
                "/",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            ),
            Redirect::Stay => {}
        }));
        set_denial.set(Some(found));
    });

    on_cleanup(move || {
        timer.borrow_mut().take();
    });

    move || match denial.get() {
        Some(denial) => view! { <DenialModal denial=denial /> }.into_view(),
        None => children().into_view(),
    }
}
