// src/services/board.rs
//
// Mural de doações: o que uma ONG vê ao procurar itens de outras ONGs.
// Função pura sobre o snapshot; não altera nada.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    catalog::{CatalogSnapshot, DonationBoard, DonationItem},
    resource::{ArticleCategory, Resource, ResourceKind, ResourceStatus},
};

/// Janela do filtro "validade próxima", em dias, inclusiva nas duas pontas.
pub const URGENT_WINDOW_DAYS: i64 = 90;

/// Vence entre hoje e daqui a 90 dias. Já vencido não é urgente.
pub fn is_urgent(expiration_date: NaiveDate, today: NaiveDate) -> bool {
    let days_left = (expiration_date - today).num_days();
    (0..=URGENT_WINDOW_DAYS).contains(&days_left)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Kind(ResourceKind),
    Article(ArticleCategory),
}

impl CategoryFilter {
    fn matches(&self, resource: &Resource) -> bool {
        match self {
            CategoryFilter::Kind(kind) => resource.kind() == *kind,
            CategoryFilter::Article(category) => resource.article_category() == Some(*category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(kind) = s.parse::<ResourceKind>() {
            return Ok(CategoryFilter::Kind(kind));
        }
        s.parse::<ArticleCategory>().map(CategoryFilter::Article)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardFilter {
    /// Trecho do nome (ou marca), sem diferenciar maiúsculas. Vazio casa com tudo.
    pub query: String,
    pub category: Option<CategoryFilter>,
    /// UF exata da ONG doadora
    pub state: Option<String>,
    pub urgent_only: bool,
}

impl BoardFilter {
    fn matches(&self, item: &DonationItem) -> bool {
        let matches_query = self.query.is_empty()
            || item
                .resource
                .display_name()
                .to_lowercase()
                .contains(&self.query.to_lowercase());

        let matches_category = self
            .category
            .is_none_or(|category| category.matches(&item.resource));

        let matches_state = self
            .state
            .as_ref()
            .is_none_or(|state| &item.organization.state == state);

        let matches_urgent = !self.urgent_only || item.urgent;

        matches_query && matches_category && matches_state && matches_urgent
    }
}

/// Doações visíveis para `viewer_id`: recursos AVAILABLE de outras ONGs, com a
/// ONG dona anexada. Recursos cuja ONG não está no snapshot são ignorados.
pub fn donation_board(
    snapshot: &CatalogSnapshot,
    viewer_id: Uuid,
    filter: &BoardFilter,
    today: NaiveDate,
) -> DonationBoard {
    let organizations: HashMap<Uuid, _> = snapshot
        .organizations
        .iter()
        .map(|org| (org.id, org))
        .collect();

    let eligible: Vec<DonationItem> = snapshot
        .resources()
        .filter(|r| r.status() == ResourceStatus::Available && r.organization_id() != viewer_id)
        .filter_map(|resource| {
            let organization = (*organizations.get(&resource.organization_id())?).clone();
            let urgent = resource
                .expiration_date()
                .is_some_and(|date| is_urgent(date, today));
            Some(DonationItem { resource, organization, urgent })
        })
        .collect();

    // As UFs vêm de todas as doações elegíveis, antes dos filtros
    let states: BTreeSet<String> = eligible
        .iter()
        .map(|item| item.organization.state.clone())
        .collect();

    DonationBoard {
        items: eligible.into_iter().filter(|item| filter.matches(item)).collect(),
        states: states.into_iter().collect(),
    }
}
