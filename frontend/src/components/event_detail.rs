use crate::auth::use_auth;
use crate::components::events::event_when;
use crate::components::feedback::{Comments, Reactions};
use crate::messages::describe;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rencontre_shared::date::format_base64_image;
use rencontre_shared::{CommentTarget, Event, ReactionTarget};

#[component]
pub fn EventDetailPage(id: i64) -> impl IntoView {
    let auth = use_auth();

    let (event, set_event) = signal(Option::<Event>::None);
    let (image, set_image) = signal(Option::<String>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let api = auth.api();
    spawn_local(async move {
        match api.event(id).await {
            Ok(e) => {
                let _ = set_event.try_set(Some(e));
            }
            Err(e) => {
                let _ = set_error_msg.try_set(Some(describe(&e)));
                return;
            }
        }
        // 图片可选，失败时不显示
        if let Ok(Some(data)) = api.event_image(id).await {
            let _ = set_image.try_set(Some(format_base64_image(&data)));
        }
    });

    view! {
        <Link to="/evenement" class="btn btn-ghost btn-sm mb-4">"← Retour aux événements"</Link>
        {move || error_msg.get().map(|msg| view! { <div role="alert" class="alert alert-error">{msg}</div> })}
        {move || event.get().map(|event| {
            let when = event_when(&event);
            view! {
                <article class="card bg-base-100 shadow">
                    {move || image.get().map(|src| view! { <figure><img src=src alt="Image de l'événement" /></figure> })}
                    <div class="card-body">
                        <h1 class="card-title text-3xl">{event.titre.clone()}</h1>
                        {when.map(|(date, countdown)| view! {
                            <p>{date}" · "<span class="badge badge-accent">{countdown}</span></p>
                        })}
                        {event.lieu.clone().map(|lieu| view! { <p class="text-base-content/70">{lieu}</p> })}
                        <p class="whitespace-pre-line">{event.description.clone()}</p>
                        <Reactions target=ReactionTarget::Event(id) />
                        <Comments target=CommentTarget::Event(id) />
                    </div>
                </article>
            }
        })}
    }
}
