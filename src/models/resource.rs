// src/models/resource.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

// Fotos chegam como data URL (data:image/...;base64,...)
pub const MAX_PHOTO_LEN: usize = 2 * 1024 * 1024;

// ---
// 1. Tipo do recurso (a "coleção" onde ele vive)
// ---
// Os ids não são globalmente únicos entre as três coleções, então toda busca
// carrega o tipo junto com o id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "resource_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Medicines,
    Rations,
    Articles,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Medicines => "medicines",
            ResourceKind::Rations => "rations",
            ResourceKind::Articles => "articles",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medicines" => Ok(ResourceKind::Medicines),
            "rations" => Ok(ResourceKind::Rations),
            "articles" => Ok(ResourceKind::Articles),
            other => Err(format!("tipo de recurso desconhecido: {other}")),
        }
    }
}

// ---
// 2. Status do recurso
// ---
// REQUESTED existe no banco mas nenhuma transição leva até ele.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "resource_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Available,
    Requested,
    Donated,
}

impl ResourceStatus {
    /// Só um recurso AVAILABLE pode ser pedido ou doado. DONATED é final.
    pub fn is_requestable(self) -> bool {
        self == ResourceStatus::Available
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "article_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleCategory {
    CollarsAndLeashes,
    Accessories,
    Hygiene,
    Others,
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 4] = [
        ArticleCategory::CollarsAndLeashes,
        ArticleCategory::Accessories,
        ArticleCategory::Hygiene,
        ArticleCategory::Others,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ArticleCategory::CollarsAndLeashes => "COLLARS_AND_LEASHES",
            ArticleCategory::Accessories => "ACCESSORIES",
            ArticleCategory::Hygiene => "HYGIENE",
            ArticleCategory::Others => "OTHERS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArticleCategory::CollarsAndLeashes => "Coleiras e Guias",
            ArticleCategory::Accessories => "Acessórios e Abrigo",
            ArticleCategory::Hygiene => "Higiene e Limpeza",
            ArticleCategory::Others => "Outros",
        }
    }
}

impl FromStr for ArticleCategory {
    type Err = String;

    // Aceita tanto o código ("HYGIENE") quanto o rótulo exibido ("Higiene e Limpeza")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleCategory::ALL
            .into_iter()
            .find(|c| c.code() == s || c.label() == s)
            .ok_or_else(|| format!("categoria desconhecida: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "article_condition", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleCondition {
    New,
    Used,
}

// ---
// 3. Campos comuns a todos os recursos
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBase {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub organization_id: Uuid,
    pub status: ResourceStatus,
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub photo_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub base: ResourceBase,
    pub name: String,
    pub active_ingredient: String,
    #[schema(example = "2 caixas")]
    pub quantity: String, // texto livre
    pub expiration_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ration {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub base: ResourceBase,
    pub brand: String,
    #[schema(value_type = f64, example = 15.5)]
    pub quantity_kg: Decimal,
    pub expiration_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub base: ResourceBase,
    pub name: String,
    pub category: ArticleCategory,
    pub quantity: i32,
    pub condition: ArticleCondition,
    pub size_specification: Option<String>,
    pub notes: Option<String>,
}

// ---
// 4. O recurso "polimórfico"
// ---
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(tag = "kind")]
pub enum Resource {
    #[serde(rename = "medicines")]
    Medicine(Medicine),
    #[serde(rename = "rations")]
    Ration(Ration),
    #[serde(rename = "articles")]
    Article(Article),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Medicine(_) => ResourceKind::Medicines,
            Resource::Ration(_) => ResourceKind::Rations,
            Resource::Article(_) => ResourceKind::Articles,
        }
    }

    pub fn base(&self) -> &ResourceBase {
        match self {
            Resource::Medicine(m) => &m.base,
            Resource::Ration(r) => &r.base,
            Resource::Article(a) => &a.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ResourceBase {
        match self {
            Resource::Medicine(m) => &mut m.base,
            Resource::Ration(r) => &mut r.base,
            Resource::Article(a) => &mut a.base,
        }
    }

    pub fn id(&self) -> Uuid {
        self.base().id
    }

    pub fn organization_id(&self) -> Uuid {
        self.base().organization_id
    }

    pub fn status(&self) -> ResourceStatus {
        self.base().status
    }

    /// Nome usado na busca: `name` para medicamentos e artigos, `brand` para rações.
    pub fn display_name(&self) -> &str {
        match self {
            Resource::Medicine(m) => &m.name,
            Resource::Ration(r) => &r.brand,
            Resource::Article(a) => &a.name,
        }
    }

    /// Artigos não têm validade.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        match self {
            Resource::Medicine(m) => Some(m.expiration_date),
            Resource::Ration(r) => Some(r.expiration_date),
            Resource::Article(_) => None,
        }
    }

    pub fn article_category(&self) -> Option<ArticleCategory> {
        match self {
            Resource::Article(a) => Some(a.category),
            _ => None,
        }
    }
}

// ---
// 5. Rascunhos (o "formulário" de criação/edição)
// ---
fn validate_photo(photo: &String) -> Result<(), ValidationError> {
    if !photo.starts_with("data:image/") {
        let mut err = ValidationError::new("photo_format");
        err.message = Some("A foto deve ser uma imagem em base64 (data URL).".into());
        return Err(err);
    }
    if photo.len() > MAX_PHOTO_LEN {
        let mut err = ValidationError::new("photo_size");
        err.message = Some("A foto excede o tamanho máximo permitido.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDraft {
    #[validate(length(min = 1, message = "O nome do medicamento é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O princípio ativo é obrigatório."))]
    pub active_ingredient: String,
    #[validate(length(min = 1, message = "A quantidade é obrigatória."))]
    pub quantity: String,
    pub expiration_date: NaiveDate,
    pub notes: Option<String>,
    #[validate(custom(function = "validate_photo"))]
    pub photo_base64: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RationDraft {
    #[validate(length(min = 1, message = "A marca é obrigatória."))]
    pub brand: String,
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 15.5)]
    pub quantity_kg: Decimal,
    pub expiration_date: NaiveDate,
    pub notes: Option<String>,
    #[validate(custom(function = "validate_photo"))]
    pub photo_base64: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    #[validate(length(min = 1, message = "O nome do artigo é obrigatório."))]
    pub name: String,
    pub category: ArticleCategory,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
    pub condition: ArticleCondition,
    pub size_specification: Option<String>,
    pub notes: Option<String>,
    #[validate(custom(function = "validate_photo"))]
    pub photo_base64: Option<String>,
}

/// O `status` que veio junto com o formulário, se veio. Os rascunhos ignoram
/// esse campo; quem decide se ele é aceitável é a camada de serviço.
pub fn submitted_status(body: &serde_json::Value) -> Result<Option<ResourceStatus>, serde_json::Error> {
    match body.get("status") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => ResourceStatus::deserialize(value).map(Some),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ResourceDraft {
    Medicine(MedicineDraft),
    Ration(RationDraft),
    Article(ArticleDraft),
}

impl ResourceDraft {
    /// O tipo vem da rota, o corpo é interpretado de acordo.
    pub fn from_json(kind: ResourceKind, body: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ResourceKind::Medicines => ResourceDraft::Medicine(serde_json::from_value(body)?),
            ResourceKind::Rations => ResourceDraft::Ration(serde_json::from_value(body)?),
            ResourceKind::Articles => ResourceDraft::Article(serde_json::from_value(body)?),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceDraft::Medicine(_) => ResourceKind::Medicines,
            ResourceDraft::Ration(_) => ResourceKind::Rations,
            ResourceDraft::Article(_) => ResourceKind::Articles,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            ResourceDraft::Medicine(d) => d.validate(),
            ResourceDraft::Ration(d) => d.validate(),
            ResourceDraft::Article(d) => d.validate(),
        }
    }

    pub fn photo_base64(&self) -> Option<&str> {
        match self {
            ResourceDraft::Medicine(d) => d.photo_base64.as_deref(),
            ResourceDraft::Ration(d) => d.photo_base64.as_deref(),
            ResourceDraft::Article(d) => d.photo_base64.as_deref(),
        }
    }

    /// Monta o registro completo a partir da base (id, dono, status) já decidida.
    /// A foto da base é sempre a do rascunho.
    pub fn into_resource(self, mut base: ResourceBase) -> Resource {
        base.photo_base64 = self.photo_base64().map(str::to_owned);
        match self {
            ResourceDraft::Medicine(d) => Resource::Medicine(Medicine {
                base,
                name: d.name,
                active_ingredient: d.active_ingredient,
                quantity: d.quantity,
                expiration_date: d.expiration_date,
                notes: d.notes,
            }),
            ResourceDraft::Ration(d) => Resource::Ration(Ration {
                base,
                brand: d.brand,
                quantity_kg: d.quantity_kg,
                expiration_date: d.expiration_date,
                notes: d.notes,
            }),
            ResourceDraft::Article(d) => Resource::Article(Article {
                base,
                name: d.name,
                category: d.category,
                quantity: d.quantity,
                condition: d.condition,
                size_specification: d.size_specification,
                notes: d.notes,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_available_resources_can_be_requested() {
        assert!(ResourceStatus::Available.is_requestable());
        assert!(!ResourceStatus::Requested.is_requestable());
        assert!(!ResourceStatus::Donated.is_requestable());
    }

    #[test]
    fn submitted_status_is_optional() {
        assert_eq!(submitted_status(&json!({ "name": "x" })).unwrap(), None);
        assert_eq!(
            submitted_status(&json!({ "status": "DONATED" })).unwrap(),
            Some(ResourceStatus::Donated)
        );
        assert!(submitted_status(&json!({ "status": "GONE" })).is_err());
    }

    #[test]
    fn article_category_parses_code_and_label() {
        assert_eq!("HYGIENE".parse::<ArticleCategory>(), Ok(ArticleCategory::Hygiene));
        assert_eq!(
            "Acessórios e Abrigo".parse::<ArticleCategory>(),
            Ok(ArticleCategory::Accessories)
        );
        assert!("medicines".parse::<ArticleCategory>().is_err());
    }

    #[test]
    fn draft_is_parsed_according_to_route_kind() {
        let body = json!({
            "brand": "Golden Power Training",
            "quantityKg": 15.0,
            "expirationDate": "2025-08-01"
        });
        let draft = ResourceDraft::from_json(ResourceKind::Rations, body.clone()).unwrap();
        assert_eq!(draft.kind(), ResourceKind::Rations);
        assert!(draft.validate().is_ok());

        // o mesmo corpo não serve como medicamento
        assert!(ResourceDraft::from_json(ResourceKind::Medicines, body).is_err());
    }

    #[test]
    fn draft_rejects_non_positive_quantities_and_bad_photos() {
        let ration = ResourceDraft::Ration(RationDraft {
            brand: "Premier".into(),
            quantity_kg: Decimal::ZERO,
            expiration_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            notes: None,
            photo_base64: None,
        });
        assert!(ration.validate().is_err());

        let article = ResourceDraft::Article(ArticleDraft {
            name: "Caminha".into(),
            category: ArticleCategory::Accessories,
            quantity: 1,
            condition: ArticleCondition::Used,
            size_specification: None,
            notes: None,
            photo_base64: Some("not-a-data-url".into()),
        });
        let errors = article.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("photo_base64"));
    }
}
