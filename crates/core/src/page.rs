//! Sorting and pagination of list results
//!
//! Pages are zero-based. A page past the end of the collection is empty,
//! not an error.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::patient::Patient;

/// Page size used when only `page` is supplied
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound for `size`; larger requests are clamped
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// Patient properties a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    GivenName,
    FamilyName,
    BirthDate,
    Email,
}

impl SortField {
    /// JSON property name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::GivenName => "givenName",
            SortField::FamilyName => "familyName",
            SortField::BirthDate => "birthDate",
            SortField::Email => "email",
        }
    }

    /// Database column name
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::GivenName => "given_name",
            SortField::FamilyName => "family_name",
            SortField::BirthDate => "birth_date",
            SortField::Email => "email",
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "givenName" => Ok(SortField::GivenName),
            "familyName" => Ok(SortField::FamilyName),
            "birthDate" => Ok(SortField::BirthDate),
            "email" => Ok(SortField::Email),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort order parsed from `field[,direction]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Reorder records in place. Ties fall back to ascending id.
    pub fn apply(&self, patients: &mut [Patient]) {
        patients.sort_by(|a, b| {
            let ord = a.cmp_by(b, self.field);
            let ord = match self.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });
    }
}

impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s, None),
        };
        if field.trim().is_empty() {
            return Err(QueryError::EmptySort);
        }

        let field = field.parse()?;
        let direction = match direction {
            Some(d) if !d.trim().is_empty() => d.parse()?,
            _ => Direction::default(),
        };
        Ok(Sort { field, direction })
    }
}

/// A requested page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Build a request; `size` must be positive and is clamped to [`MAX_PAGE_SIZE`]
    pub fn new(page: u32, size: u32) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// Parsed list parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<PageRequest>,
    pub sort: Option<Sort>,
}

impl ListQuery {
    /// Combine raw `page`, `size` and `sort` values
    pub fn from_parts(
        page: Option<u32>,
        size: Option<u32>,
        sort: Option<&str>,
    ) -> Result<Self, QueryError> {
        let page = match (page, size) {
            (None, None) => None,
            (page, size) => Some(PageRequest::new(
                page.unwrap_or(0),
                size.unwrap_or(DEFAULT_PAGE_SIZE),
            )?),
        };
        let sort = sort.map(str::parse::<Sort>).transpose()?;
        Ok(Self { page, sort })
    }

    /// Whether the response should carry pagination metadata
    pub fn is_pageable(&self) -> bool {
        self.page.is_some() || self.sort.is_some()
    }
}

/// One window of a (possibly sorted) collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Cut the requested window out of the full collection.
    /// Without a request the whole collection is one page.
    pub fn window(items: Vec<T>, request: Option<PageRequest>) -> Self {
        let total_elements = items.len() as u64;
        match request {
            Some(req) => {
                let offset = usize::try_from(req.offset()).unwrap_or(usize::MAX);
                let items = items
                    .into_iter()
                    .skip(offset)
                    .take(req.size as usize)
                    .collect();
                Self {
                    items,
                    total_elements,
                    page: req.page,
                    size: req.size,
                }
            }
            None => Self::unpaged(items),
        }
    }

    /// Whole collection as page zero
    pub fn unpaged(items: Vec<T>) -> Self {
        let total_elements = items.len() as u64;
        Self {
            items,
            total_elements,
            page: 0,
            size: u32::try_from(total_elements).unwrap_or(u32::MAX),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(u64::from(self.size))
        }
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta {
            total_elements: self.total_elements,
            total_pages: self.total_pages(),
            page: self.page,
            size: self.size,
        }
    }
}

/// Pagination metadata sent out-of-band in a response header
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_elements: u64,
    pub total_pages: u64,
    pub page: u32,
    pub size: u32,
}
