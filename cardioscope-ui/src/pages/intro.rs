//! Landing page
//!
//! Rotating headline and the two entry tiles. The clinician tile checks the
//! role in place: a denied visitor sees the modal briefly and stays here.

use gloo_timers::callback::{Interval, Timeout};
use leptos::*;
use leptos_router::use_navigate;
use std::cell::RefCell;
use std::rc::Rc;

use cardioscope::gate::{Denial, GateDecision};
use cardioscope::landing::{next_headline, Tile, HEADLINES, HEADLINE_INTERVAL, TILES};

use crate::components::DenialModal;
use crate::state::SessionHandle;

#[component]
pub fn Intro(session: SessionHandle) -> impl IntoView {
    let (headline, set_headline) = create_signal(0usize);
    let (denial, set_denial) = create_signal(None::<Denial>);

    let interval = Interval::new(HEADLINE_INTERVAL.as_millis() as u32, move || {
        set_headline.update(|i| *i = next_headline(*i));
    });
    let dismiss: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    let pending = Rc::clone(&dismiss);
    on_cleanup(move || {
        drop(interval);
        pending.borrow_mut().take();
    });

    let navigate = use_navigate();
    let on_tile = move |tile: Tile| {
        if let Some(gate) = tile.gate() {
            if let GateDecision::Deny(found) = gate.check(session.current_untracked().as_ref()) {
                let delay_ms = found.delay.as_millis() as u32;
                *dismiss.borrow_mut() = Some(Timeout::new(delay_ms, move || set_denial.set(None)));
                set_denial.set(Some(found));
                return;
            }
        }
        navigate(tile.route.path(), Default::default());
    };

    view! {
        <div class="max-w-5xl mx-auto space-y-12">
            <section class="text-center py-12">
                {move || {
                    let (lead, rest) = HEADLINES[headline.get()];
                    view! {
                        <h1 class="text-4xl font-bold">
                            <span class="text-blue-600">{lead}</span>
                            " "
                            {rest}
                        </h1>
                    }
                }}
                <p class="text-gray-600 mt-4">
                    "ECG screening and risk scoring, backed by AI analysis."
                </p>
            </section>

            <section class="grid md:grid-cols-2 gap-6">
                {TILES
                    .into_iter()
                    .map(|tile| {
                        let on_tile = on_tile.clone();
                        view! {
                            <button
                                class="text-left bg-white rounded-xl shadow p-6 hover:shadow-lg transition-shadow"
                                on:click=move |_| on_tile(tile)
                            >
                                <h2 class="text-xl font-semibold mb-2">{tile.title}</h2>
                                <p class="text-gray-600 mb-4">{tile.blurb}</p>
                                <ul class="space-y-1 text-sm text-gray-700">
                                    {tile
                                        .features
                                        .iter()
                                        .map(|feature| view! { <li>"• " {*feature}</li> })
                                        .collect_view()}
                                </ul>
                            </button>
                        }
                    })
                    .collect_view()}
            </section>

            {move || denial.get().map(|denial| view! { <DenialModal denial=denial /> })}
        </div>
    }
}
