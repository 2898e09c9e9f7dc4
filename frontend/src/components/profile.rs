use std::rc::Rc;

use crate::auth::use_auth;
use crate::components::publications::selected_file;
use crate::messages::describe;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rencontre::{CurrentUserStore, FollowStore};
use rencontre_shared::CurrentUser;
use tracing::warn;

/// 关注数据（当前用户自己的主页）
#[component]
fn FollowCounts(user_id: i64) -> impl IntoView {
    let auth = use_auth();
    let (followers, set_followers) = signal(0u64);
    let (following, set_following) = signal(0u64);

    let store = Rc::new(FollowStore::new(auth.api(), user_id));
    store.followers_remote().subscribe(move |v| {
        let _ = set_followers.try_set(*v);
    });
    store.following_remote().subscribe(move |v| {
        let _ = set_following.try_set(*v);
    });
    spawn_local(async move { store.fetch_counts().await });

    view! {
        <div class="stats shadow">
            <div class="stat">
                <div class="stat-title">"Abonnés"</div>
                <div class="stat-value">{move || followers.get()}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Abonnements"</div>
                <div class="stat-value">{move || following.get()}</div>
            </div>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let photo = auth.photo();

    let (user, set_user) = signal(Option::<CurrentUser>::None);
    let (activity, set_activity) = signal((0u64, 0u64)); // 评论数, 表态数
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错
    let photo_input = NodeRef::<Input>::new();

    let store = Rc::new(CurrentUserStore::new(auth.api()));
    store.remote().subscribe(move |v| {
        let _ = set_user.try_set(v.clone());
    });
    spawn_local(async move {
        if let Some(error) = store.fetch().await.error() {
            let _ = set_notification.try_set(Some((describe(error), true)));
        }
    });

    let api = auth.api();
    spawn_local(async move {
        let (comments, reactions) = activity_counts(&api).await;
        let _ = set_activity.try_set((comments, reactions));
    });

    let on_upload = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = auth.api();
        let input = photo_input.get();
        spawn_local(async move {
            let Some(file) = (match input {
                Some(input) => selected_file(&input).await,
                None => None,
            }) else {
                set_notification.set(Some(("Choisissez une image.".to_string(), true)));
                return;
            };
            match api.update_profile_photo(file).await {
                Ok(_) => {
                    auth.reload_profile_photo().await;
                    set_notification.set(Some(("Photo mise à jour".to_string(), false)));
                }
                Err(e) => set_notification.set(Some((describe(&e), true))),
            }
        });
    };

    let on_delete_photo = move |_: leptos::ev::MouseEvent| {
        let api = auth.api();
        spawn_local(async move {
            match api.delete_profile_photo().await {
                Ok(_) => {
                    auth.reload_profile_photo().await;
                    set_notification.set(Some(("Photo supprimée".to_string(), false)));
                }
                Err(e) => set_notification.set(Some((describe(&e), true))),
            }
        });
    };

    view! {
        {move || notification.get().map(|(msg, is_error)| {
            let class = if is_error { "alert alert-error mb-4" } else { "alert alert-success mb-4" };
            view! { <div role="alert" class=class><span>{msg}</span></div> }
        })}

        <div class="card bg-base-100 shadow">
            <div class="card-body items-center text-center gap-4">
                <div class="avatar">
                    <div class="w-32 rounded-full">
                        <img alt="Photo de profil" src=move || photo.get() />
                    </div>
                </div>
                {move || user.get().map(|u| view! {
                    <h1 class="text-2xl font-bold">{u.username.clone()}</h1>
                    <p class="text-base-content/70">{u.email.clone()}</p>
                    <FollowCounts user_id=u.id />
                })}
                <p class="text-sm">
                    {move || {
                        let (comments, reactions) = activity.get();
                        format!("{} commentaire(s) · {} réaction(s)", comments, reactions)
                    }}
                </p>
                <form class="flex flex-wrap gap-2 justify-center" on:submit=on_upload>
                    <input type="file" accept="image/*" class="file-input file-input-bordered file-input-sm" node_ref=photo_input />
                    <button class="btn btn-primary btn-sm">"Changer la photo"</button>
                    <button type="button" class="btn btn-ghost btn-sm" on:click=on_delete_photo>"Supprimer"</button>
                </form>
            </div>
        </div>
    }
}

/// 当前用户的评论数与表态数；失败时记为 0
async fn activity_counts(api: &crate::auth::Api) -> (u64, u64) {
    let comments = api.my_comment_count().await.unwrap_or_else(|e| {
        warn!(error = %e, "comment count unavailable");
        0
    });
    let reactions = api.my_reaction_count().await.unwrap_or_else(|e| {
        warn!(error = %e, "reaction count unavailable");
        0
    });
    (comments, reactions)
}
