use crate::auth::use_auth;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use tracing::warn;

/// 从 "关于我们"/"章程" 等自由格式响应中提取可显示的文本
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(display_text).collect();
            (!parts.is_empty()).then(|| parts.join("\n\n"))
        }
        Value::Object(map) => ["contenu", "description", "texte", "content"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

#[component]
fn Section(
    id: &'static str,
    title: &'static str,
    body: ReadSignal<Option<String>>,
) -> impl IntoView {
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in();

    view! {
        <section id=id class="py-10 border-b border-base-200">
            <h2 class="text-2xl font-bold mb-4">{title}</h2>
            {move || match (body.get(), is_logged_in.get()) {
                (Some(text), _) => view! { <p class="whitespace-pre-line">{text}</p> }.into_any(),
                (None, false) => view! {
                    <p class="text-base-content/70">
                        <Link to="/login" class="link link-primary">"Connectez-vous"</Link>
                        " pour lire cette section."
                    </p>
                }
                .into_any(),
                (None, true) => view! { <p class="text-base-content/50">"Contenu indisponible."</p> }.into_any(),
            }}
        </section>
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = use_auth();
    let is_logged_in = auth.is_logged_in();

    let (about, set_about) = signal(Option::<String>::None);
    let (charter, set_charter) = signal(Option::<String>::None);

    // 登录状态变化时重新加载
    Effect::new(move |_| {
        if !is_logged_in.get() {
            set_about.set(None);
            set_charter.set(None);
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.about().await {
                Ok(v) => set_about.set(display_text(&v)),
                Err(e) => warn!(error = %e, "about section unavailable"),
            }
            match api.charter().await {
                Ok(v) => set_charter.set(display_text(&v)),
                Err(e) => warn!(error = %e, "charter unavailable"),
            }
        });
    });

    view! {
        <section id="home" class="hero min-h-[50vh] bg-base-200 rounded-box">
            <div class="hero-content text-center">
                <div class="max-w-xl">
                    <h1 class="text-5xl font-bold">"Rencontre"</h1>
                    <p class="py-6">
                        "Événements, publications et échanges au sein de la communauté."
                    </p>
                    <Link to="/evenement" class="btn btn-primary">"Voir les événements"</Link>
                </div>
            </div>
        </section>
        <Section id="apropos" title="À propos" body=about />
        <Section id="chartes" title="Notre charte" body=charter />
        <section id="contacts" class="py-10">
            <h2 class="text-2xl font-bold mb-4">"Contact"</h2>
            <p>"Une question ? Écrivez-nous à "<a class="link" href="mailto:contact@rencontre.fr">"contact@rencontre.fr"</a></p>
        </section>
    }
}
