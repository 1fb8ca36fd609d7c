// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::LazyLock;

pub const DEFAULT_LANG: &str = "pt";

static GLOBAL: LazyLock<I18nStore> = LazyLock::new(I18nStore::new);

// Catálogo de mensagens de erro por idioma
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

const PT: &[(&str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos."),
    ("bad_request", "Requisição inválida."),
    ("email_already_exists", "Este e-mail já está em uso."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("organization_not_found", "ONG não encontrada."),
    ("resource_not_found", "Recurso não encontrado."),
    ("request_not_found", "Pedido de doação não encontrado."),
    ("organization_not_verified", "Sua ONG ainda está aguardando aprovação."),
    ("not_resource_owner", "Apenas a ONG dona pode alterar este recurso."),
    ("not_donor", "Apenas a ONG doadora pode aprovar ou recusar este pedido."),
    ("own_resource_request", "Você não pode solicitar um item da sua própria ONG."),
    ("resource_unavailable", "Este item não está mais disponível para doação."),
    ("duplicate_request", "Você já tem um pedido pendente para este item."),
    ("request_already_decided", "Este pedido já foi aprovado ou recusado."),
    ("invalid_decision", "A decisão deve ser APPROVED ou REJECTED."),
    ("resource_status_locked", "O status do item é controlado pelos pedidos de doação."),
    ("store_unavailable", "Serviço temporariamente indisponível. Tente novamente."),
    ("internal", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("bad_request", "Invalid request."),
    ("email_already_exists", "This e-mail is already in use."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("organization_not_found", "Organization not found."),
    ("resource_not_found", "Resource not found."),
    ("request_not_found", "Donation request not found."),
    ("organization_not_verified", "Your organization is still awaiting approval."),
    ("not_resource_owner", "Only the owning organization can change this resource."),
    ("not_donor", "Only the donating organization can approve or reject this request."),
    ("own_resource_request", "You cannot request an item from your own organization."),
    ("resource_unavailable", "This item is no longer available for donation."),
    ("duplicate_request", "You already have a pending request for this item."),
    ("request_already_decided", "This request has already been approved or rejected."),
    ("invalid_decision", "The decision must be APPROVED or REJECTED."),
    ("resource_status_locked", "The item status is driven by donation requests."),
    ("store_unavailable", "Service temporarily unavailable. Please try again."),
    ("internal", "An unexpected error occurred."),
];

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages }
    }

    pub fn global() -> &'static I18nStore {
        &GLOBAL
    }

    /// Idioma desconhecido cai no português; chave desconhecida cai na mensagem genérica.
    pub fn translate(&self, lang: &str, key: &str) -> &'static str {
        let table = self
            .messages
            .get(lang)
            .or_else(|| self.messages.get(DEFAULT_LANG));
        table
            .and_then(|t| t.get(key).or_else(|| t.get("internal")))
            .copied()
            .unwrap_or("Ocorreu um erro inesperado.")
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "invalid_credentials"), "Invalid e-mail or password.");
        assert_eq!(store.translate("fr", "invalid_credentials"), "E-mail ou senha inválidos.");
        assert_eq!(store.translate("pt", "nope"), "Ocorreu um erro inesperado.");
    }
}
