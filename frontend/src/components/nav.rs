use crate::auth::use_auth;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in();
    let photo = auth.photo();

    view! {
        <div class="navbar bg-base-100 shadow-sm">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl">"Rencontre"</Link>
            </div>
            <div class="flex-none gap-2">
                <ul class="menu menu-horizontal px-1">
                    <li><Link to="/evenement">"Événements"</Link></li>
                    <li><Link to="/publication">"Publications"</Link></li>
                    <li><Link to="/boutique">"Boutique"</Link></li>
                    <li><Link to="/apropos">"À propos"</Link></li>
                </ul>
                <Show
                    when=move || is_logged_in.get()
                    fallback=|| view! { <Link to="/login" class="btn btn-primary btn-sm">"Connexion"</Link> }
                >
                    <Link to="/profil" class="btn btn-ghost btn-circle avatar">
                        <div class="w-10 rounded-full">
                            <img alt="Photo de profil" src=move || photo.get() />
                        </div>
                    </Link>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| auth.logout()>
                        "Déconnexion"
                    </button>
                </Show>
            </div>
        </div>
    }
}
