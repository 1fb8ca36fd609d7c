// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Organizations ---
        handlers::organizations::list_organizations,
        handlers::organizations::get_organization,

        // --- Catalog ---
        handlers::catalog::get_catalog,

        // --- Resources ---
        handlers::resources::list_resources,
        handlers::resources::get_resource,
        handlers::resources::create_resource,
        handlers::resources::update_resource,
        handlers::resources::get_inventory,

        // --- Donations ---
        handlers::donations::get_donation_board,

        // --- Requests ---
        handlers::requests::create_request,
        handlers::requests::list_received,
        handlers::requests::list_sent,
        handlers::requests::decide_request,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- AUTH ---
            models::auth::RegisterNgoPayload,
            models::auth::LoginPayload,
            models::auth::Session,

            // --- ORGANIZATIONS ---
            models::organization::OrganizationStatus,
            models::organization::Organization,
            models::organization::NewOrganization,

            // --- RESOURCES ---
            models::resource::ResourceKind,
            models::resource::ResourceStatus,
            models::resource::ArticleCategory,
            models::resource::ArticleCondition,
            models::resource::ResourceBase,
            models::resource::Medicine,
            models::resource::Ration,
            models::resource::Article,
            models::resource::Resource,
            models::resource::MedicineDraft,
            models::resource::RationDraft,
            models::resource::ArticleDraft,
            models::resource::ResourceDraft,

            // --- REQUESTS ---
            models::request::RequestStatus,
            models::request::ResourceRequest,
            handlers::requests::CreateRequestPayload,
            handlers::requests::DecisionPayload,

            // --- CATALOG ---
            models::catalog::CatalogSnapshot,
            models::catalog::DonationItem,
            models::catalog::DonationBoard,
            models::catalog::OrganizationStats,
            models::catalog::RequestDetail,
            handlers::catalog::CatalogResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, login e sessão da ONG"),
        (name = "Organizations", description = "ONGs cadastradas"),
        (name = "Catalog", description = "Snapshot das cinco coleções"),
        (name = "Resources", description = "Medicamentos, rações e artigos"),
        (name = "Donations", description = "Mural de doações entre ONGs"),
        (name = "Requests", description = "Pedidos de doação e decisão do doador"),
        (name = "Dashboard", description = "Indicadores da ONG")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
