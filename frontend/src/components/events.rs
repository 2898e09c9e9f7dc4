use crate::auth::use_auth;
use crate::messages::describe;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rencontre::View;
use rencontre_shared::Event;
use rencontre_shared::date::{format_date, parse_api_datetime, time_until_event};

/// 日期行：绝对日期 + 倒计时
pub fn event_when(event: &Event) -> Option<(String, String)> {
    let date = parse_api_datetime(event.date_evenement.as_deref()?)?;
    let now = chrono::Local::now().naive_local();
    Some((format_date(&date), time_until_event(&date, &now)))
}

#[component]
pub fn EventsPage() -> impl IntoView {
    let auth = use_auth();

    let (events, set_events) = signal(Vec::<Event>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let api = auth.api();
    spawn_local(async move {
        match api.allowed_events().await {
            Ok(list) => set_events.set(list),
            Err(e) => set_error_msg.set(Some(describe(&e))),
        }
        set_loading.set(false);
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"Événements"</h1>
        <Show when=move || !loading.get() fallback=|| view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || error_msg.get().map(|msg| view! { <div role="alert" class="alert alert-error">{msg}</div> })}
            <Show when=move || events.with(Vec::is_empty) && error_msg.get().is_none()>
                <p class="text-base-content/70">"Aucun événement pour le moment."</p>
            </Show>
            <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">
                <For
                    each=move || events.get()
                    key=|event| event.id
                    children=move |event| {
                        let href = auth.link(View::EventDetail, &[&event.id.to_string()]);
                        let when = event_when(&event);
                        view! {
                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <h2 class="card-title">{event.titre.clone()}</h2>
                                    {when.map(|(date, countdown)| view! {
                                        <p class="text-sm">{date}</p>
                                        <span class="badge badge-accent">{countdown}</span>
                                    })}
                                    {event.lieu.clone().map(|lieu| view! { <p class="text-sm text-base-content/70">{lieu}</p> })}
                                    <p class="line-clamp-3">{event.description.clone()}</p>
                                    <div class="card-actions justify-end">
                                        <Link to=href class="btn btn-primary btn-sm">"Détails"</Link>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}
