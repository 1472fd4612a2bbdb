// src/services/catalog_query.rs
//
// Filtros, ordenação e paginação da vitrine. Lógica pura sobre a lista
// completa do catálogo; a busca no store fica no CatalogService.

use std::{cmp::Ordering, str::FromStr};

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::catalog::{ProductPage, ProductQuery, ProductWithCategory},
};

pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    // Ordem de cadastro (como o store devolve)
    #[default]
    Catalogue,
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortKey::Newest),
            "price_asc" => Ok(SortKey::PriceAsc),
            "price_desc" => Ok(SortKey::PriceDesc),
            "name_asc" => Ok(SortKey::NameAsc),
            "name_desc" => Ok(SortKey::NameDesc),
            other => Err(AppError::BadRequest(format!(
                "Unknown sort key '{}'. Use newest, price_asc, price_desc, name_asc or name_desc.",
                other
            ))),
        }
    }
}

/// Faixa de preço inclusiva. `max = None` é aberta ("50-").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::BadRequest(format!("Invalid price range '{}'.", s));

        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min: Decimal = min.trim().parse().map_err(|_| invalid())?;
        let max = match max.trim() {
            "" => None,
            value => Some(value.parse::<Decimal>().map_err(|_| invalid())?),
        };

        if min.is_sign_negative() || max.is_some_and(|max| max < min) {
            return Err(invalid());
        }
        Ok(PriceRange { min, max })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    search: Option<String>,
    category: Option<String>,
    price_ranges: Vec<PriceRange>,
    dietary: Vec<String>,
    featured: Option<bool>,
    bestseller: Option<bool>,
    new: Option<bool>,
    popular: Option<bool>,
    sort: SortKey,
    limit: Option<usize>,
    offset: usize,
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn flag_matches(wanted: Option<bool>, actual: bool) -> bool {
    wanted.is_none_or(|wanted| wanted == actual)
}

impl CatalogFilter {
    /// Converte a query crua, rejeitando faixas de preço, ordenação
    /// ou limite inválidos.
    pub fn from_query(query: &ProductQuery) -> Result<Self, AppError> {
        let search = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let price_ranges = match query.price.as_deref() {
            Some(raw) => split_list(raw)
                .map(str::parse::<PriceRange>)
                .collect::<Result<Vec<PriceRange>, _>>()?,
            None => Vec::new(),
        };

        let dietary = query
            .dietary
            .as_deref()
            .map(|raw| split_list(raw).map(str::to_string).collect())
            .unwrap_or_default();

        let sort = match query.sort.as_deref().map(str::trim) {
            None | Some("") => SortKey::Catalogue,
            Some(key) => key.parse()?,
        };

        if let Some(limit) = query.limit {
            if !(1..=MAX_PAGE_SIZE).contains(&limit) {
                return Err(AppError::BadRequest(format!(
                    "limit must be between 1 and {}.",
                    MAX_PAGE_SIZE
                )));
            }
        }

        Ok(CatalogFilter {
            search,
            category,
            price_ranges,
            dietary,
            featured: query.featured,
            bestseller: query.bestseller,
            new: query.new,
            popular: query.popular,
            sort,
            limit: query.limit,
            offset: query.offset.unwrap_or(0),
        })
    }

    pub fn matches(&self, item: &ProductWithCategory) -> bool {
        let product = &item.product;

        if let Some(slug) = &self.category {
            if &item.category.slug != slug {
                return false;
            }
        }

        if let Some(term) = &self.search {
            if !product.name.to_lowercase().contains(term)
                && !product.description.to_lowercase().contains(term)
            {
                return false;
            }
        }

        // Qualquer faixa serve
        if !self.price_ranges.is_empty()
            && !self.price_ranges.iter().any(|r| r.contains(product.price))
        {
            return false;
        }

        // Todas as tags pedidas
        if !self
            .dietary
            .iter()
            .all(|tag| product.dietary_options.iter().any(|d| d == tag))
        {
            return false;
        }

        flag_matches(self.featured, product.featured)
            && flag_matches(self.bestseller, product.is_bestseller)
            && flag_matches(self.new, product.is_new)
            && flag_matches(self.popular, product.is_popular)
    }

    fn compare(&self, a: &ProductWithCategory, b: &ProductWithCategory) -> Ordering {
        let (a, b) = (&a.product, &b.product);
        match self.sort {
            SortKey::Catalogue => Ordering::Equal,
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
        }
    }

    /// Filtra, ordena (sort estável: empates mantêm a ordem do catálogo)
    /// e recorta a página. `total` conta todos os resultados.
    pub fn apply(&self, catalogue: Vec<ProductWithCategory>) -> ProductPage {
        let mut matched: Vec<ProductWithCategory> =
            catalogue.into_iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let total = matched.len();
        let page = matched.into_iter().skip(self.offset);
        let products = match self.limit {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        };

        ProductPage {
            products,
            total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
