use crate::auth::use_auth;
use crate::components::feedback::{Comments, Reactions};
use crate::messages::describe;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rencontre::FormPart;
use rencontre_shared::date::{format_base64_image, format_relative_time, parse_api_datetime};
use rencontre_shared::{CommentTarget, Publication, ReactionTarget};
use wasm_bindgen_futures::JsFuture;

/// 读取文件输入框中选中的第一个文件
pub(crate) async fn selected_file(input: &web_sys::HtmlInputElement) -> Option<FormPart> {
    let file = input.files()?.get(0)?;
    let buffer = JsFuture::from(file.array_buffer()).await.ok()?;
    Some(FormPart::File {
        file_name: file.name(),
        mime: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

#[component]
fn PublicationCard(publication: Publication) -> impl IntoView {
    let now = chrono::Local::now().naive_local();
    let when = publication
        .date_creation
        .as_deref()
        .and_then(parse_api_datetime)
        .map(|dt| format_relative_time(&dt, &now));
    let image = publication
        .image
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(format_base64_image);

    view! {
        <article class="card bg-base-100 shadow">
            {image.map(|src| view! { <figure><img src=src alt="Image de la publication" /></figure> })}
            <div class="card-body">
                {when.map(|w| view! { <span class="text-xs text-base-content/60">{w}</span> })}
                <p class="whitespace-pre-line">{publication.contenu.clone()}</p>
                <Reactions target=ReactionTarget::Publication(publication.id) />
                <Comments target=CommentTarget::Publication(publication.id) />
            </div>
        </article>
    }
}

#[component]
pub fn PublicationsPage() -> impl IntoView {
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in();

    let (publications, set_publications) = signal(Vec::<Publication>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错
    let (draft, set_draft) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let file_input = NodeRef::<Input>::new();

    let load_publications = move || {
        let api = auth.api();
        set_loading.set(true);
        spawn_local(async move {
            match api.publications().await {
                Ok(mut list) => {
                    list.reverse();
                    let _ = set_publications.try_set(list);
                }
                Err(e) => {
                    let _ = set_notification.try_set(Some((describe(&e), true)));
                }
            }
            let _ = set_loading.try_set(false);
        });
    };

    // 初始加载
    load_publications();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let contenu = draft.get().trim().to_string();
        if contenu.is_empty() {
            set_notification.set(Some(("La publication est vide.".to_string(), true)));
            return;
        }
        set_is_submitting.set(true);
        let api = auth.api();
        let input = file_input.get();
        spawn_local(async move {
            let image = match input {
                Some(input) => selected_file(&input).await,
                None => None,
            };
            match api.create_publication(&contenu, image).await {
                Ok(_) => {
                    set_draft.set(String::new());
                    set_notification.set(Some(("Publication ajoutée".to_string(), false)));
                    load_publications();
                }
                Err(e) => set_notification.set(Some((describe(&e), true))),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <h1 class="text-3xl font-bold mb-6">"Publications"</h1>

        {move || notification.get().map(|(msg, is_error)| {
            let class = if is_error { "alert alert-error mb-4" } else { "alert alert-success mb-4" };
            view! { <div role="alert" class=class><span>{msg}</span></div> }
        })}

        <Show when=move || is_logged_in.get()>
            <form class="card bg-base-100 shadow mb-6" on:submit=on_submit>
                <div class="card-body gap-2">
                    <textarea
                        class="textarea textarea-bordered"
                        placeholder="Quoi de neuf ?"
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                        prop:value=draft
                    ></textarea>
                    <input type="file" accept="image/*" class="file-input file-input-bordered file-input-sm" node_ref=file_input />
                    <div class="card-actions justify-end">
                        <button class="btn btn-primary btn-sm" disabled=move || is_submitting.get()>"Publier"</button>
                    </div>
                </div>
            </form>
        </Show>

        <Show when=move || !loading.get() fallback=|| view! { <span class="loading loading-spinner loading-lg"></span> }>
            <div class="space-y-4">
                <For
                    each=move || publications.get()
                    key=|publication| publication.id
                    children=move |publication| view! { <PublicationCard publication=publication /> }
                />
            </div>
        </Show>
    }
}
