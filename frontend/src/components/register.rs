use crate::auth::use_auth;
use crate::messages::describe;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rencontre_shared::RegisterRequest;

fn text_field(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                on:input=move |ev| set.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
            />
        </div>
    }
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (nom, set_nom) = signal(String::new());
    let (prenom, set_prenom) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = RegisterRequest {
            username: username.get().trim().to_string(),
            email: email.get().trim().to_string(),
            password: password.get(),
            nom: optional(nom.get()),
            prenom: optional(prenom.get()),
        };
        if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
            set_notice.set(Some(("Veuillez remplir les champs obligatoires.".to_string(), true)));
            return;
        }

        set_is_submitting.set(true);
        set_notice.set(None);

        spawn_local(async move {
            match auth.register(&payload).await {
                Ok(_) => {
                    set_notice.set(Some((
                        "Compte créé. Vous pouvez maintenant vous connecter.".to_string(),
                        false,
                    )));
                }
                Err(e) => set_notice.set(Some((describe(&e), true))),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Créer un compte"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || notice.get().map(|(msg, is_error)| {
                            let class = if is_error { "alert alert-error text-sm py-2" } else { "alert alert-success text-sm py-2" };
                            view! { <div role="alert" class=class><span>{msg}</span></div> }
                        })}

                        {text_field("username", "Nom d'utilisateur *", "text", username, set_username)}
                        {text_field("email", "E-mail *", "email", email, set_email)}
                        {text_field("password", "Mot de passe *", "password", password, set_password)}
                        {text_field("prenom", "Prénom", "text", prenom, set_prenom)}
                        {text_field("nom", "Nom", "text", nom, set_nom)}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Inscription..." } else { "S'inscrire" }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Déjà inscrit ? "
                            <Link to="/login" class="link link-primary">"Se connecter"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
