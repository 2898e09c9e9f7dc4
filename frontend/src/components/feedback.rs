//! 表态与评论小部件
//!
//! 计数来自核心库的状态容器，通过 `subscribe` 桥接到信号。

use std::collections::HashMap;
use std::rc::Rc;

use crate::auth::use_auth;
use crate::messages::describe;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rencontre::{CommentCountStore, ReactionCountStore};
use rencontre_shared::date::{format_relative_time, parse_api_datetime};
use rencontre_shared::{Comment, CommentTarget, ReactionKind, ReactionTarget};
use tracing::warn;

const REACTIONS: [(ReactionKind, &str, &str); 6] = [
    (ReactionKind::Like, "like", "👍"),
    (ReactionKind::Love, "love", "❤️"),
    (ReactionKind::Haha, "haha", "😂"),
    (ReactionKind::Wow, "wow", "😮"),
    (ReactionKind::Sad, "sad", "😢"),
    (ReactionKind::Angry, "angry", "😠"),
];

#[component]
pub fn Reactions(target: ReactionTarget) -> impl IntoView {
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in();

    let (total, set_total) = signal(0u64);
    let (by_type, set_by_type) = signal(HashMap::<String, u64>::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let store = Rc::new(ReactionCountStore::new(auth.api(), target));
    // 组件卸载后信号失效，用 try_set 忽略迟到的结果
    store.total_remote().subscribe(move |v| {
        let _ = set_total.try_set(*v);
    });
    store.by_type_remote().subscribe(move |v| {
        let _ = set_by_type.try_set(v.clone());
    });

    if is_logged_in.get_untracked() {
        let store = store.clone();
        spawn_local(async move { store.fetch().await });
    }

    let store = StoredValue::new_local(store);
    let react = move |kind: ReactionKind| {
        let store = store.get_value();
        spawn_local(async move {
            match store.react(kind).await {
                Ok(()) => set_error_msg.set(None),
                Err(e) => set_error_msg.set(Some(describe(&e))),
            }
        });
    };

    view! {
        <div class="flex flex-wrap items-center gap-2">
            {REACTIONS
                .iter()
                .map(|(kind, key, emoji)| {
                    let kind = *kind;
                    let key = *key;
                    view! {
                        <button
                            class="btn btn-ghost btn-sm"
                            disabled=move || !is_logged_in.get()
                            on:click=move |_| react(kind)
                        >
                            {*emoji}
                            " "
                            {move || by_type.with(|m| m.get(key).copied().unwrap_or(0))}
                        </button>
                    }
                })
                .collect_view()}
            <span class="text-sm text-base-content/70">
                {move || format!("{} réaction(s)", total.get())}
            </span>
            {move || error_msg.get().map(|msg| view! { <span class="text-error text-sm">{msg}</span> })}
        </div>
    }
}

#[component]
pub fn Comments(target: CommentTarget) -> impl IntoView {
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in();

    let (count, set_count) = signal(0u64);
    let (comments, set_comments) = signal(Vec::<Comment>::new());
    let (draft, set_draft) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let store = Rc::new(CommentCountStore::new(auth.api(), target));
    store.remote().subscribe(move |v| {
        let _ = set_count.try_set(*v);
    });

    let load_comments = move || {
        let api = auth.api();
        spawn_local(async move {
            match api.comments_for(target).await {
                Ok(list) => {
                    let _ = set_comments.try_set(list);
                }
                Err(e) => warn!(error = %e, "comments unavailable"),
            }
        });
    };

    if is_logged_in.get_untracked() {
        let store = store.clone();
        spawn_local(async move {
            store.fetch().await;
        });
        load_comments();
    }

    let store = StoredValue::new_local(store);
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let contenu = draft.get().trim().to_string();
        if contenu.is_empty() {
            return;
        }
        let store = store.get_value();
        spawn_local(async move {
            match store.comment(&contenu).await {
                Ok(()) => {
                    set_draft.set(String::new());
                    set_error_msg.set(None);
                    load_comments();
                }
                Err(e) => set_error_msg.set(Some(describe(&e))),
            }
        });
    };

    view! {
        <div class="mt-4">
            <h3 class="font-semibold mb-2">{move || format!("Commentaires ({})", count.get())}</h3>
            <ul class="space-y-2">
                <For
                    each=move || comments.get()
                    key=|comment| comment.id
                    children=move |comment| {
                        let now = chrono::Local::now().naive_local();
                        let when = comment
                            .date_creation
                            .as_deref()
                            .and_then(parse_api_datetime)
                            .map(|dt| format_relative_time(&dt, &now));
                        view! {
                            <li class="bg-base-200 rounded-box p-2">
                                <p>{comment.contenu.clone()}</p>
                                {when.map(|w| view! { <span class="text-xs text-base-content/60">{w}</span> })}
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || is_logged_in.get()>
                <form class="flex gap-2 mt-2" on:submit=on_submit>
                    <input
                        type="text"
                        class="input input-bordered input-sm flex-1"
                        placeholder="Votre commentaire"
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                        prop:value=draft
                    />
                    <button class="btn btn-primary btn-sm">"Publier"</button>
                </form>
            </Show>
            {move || error_msg.get().map(|msg| view! { <p class="text-error text-sm">{msg}</p> })}
        </div>
    }
}
