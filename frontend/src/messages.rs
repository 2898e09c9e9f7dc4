//! 面向用户的错误提示

use rencontre::{ApiError, PreconditionError};

pub fn describe(error: &ApiError) -> String {
    match error {
        ApiError::NotAuthenticated => "Veuillez vous connecter.".to_string(),
        ApiError::Status { status: 401 | 403, .. } => {
            "Session expirée ou accès refusé.".to_string()
        }
        ApiError::Status { status: 409, .. } => "Ce compte existe déjà.".to_string(),
        ApiError::Status { status, .. } => format!("Erreur du serveur ({}).", status),
        ApiError::Transport(_) => "Impossible de joindre le serveur.".to_string(),
        ApiError::Decode(_) | ApiError::Encode(_) => {
            "Réponse inattendue du serveur.".to_string()
        }
        ApiError::Precondition(PreconditionError::SelfFollow) => {
            "Vous ne pouvez pas vous suivre vous-même.".to_string()
        }
        ApiError::Precondition(PreconditionError::MissingCurrentUser) => {
            "Utilisateur courant introuvable.".to_string()
        }
        ApiError::Precondition(PreconditionError::PathParams { .. }) => {
            "Requête invalide.".to_string()
        }
    }
}
