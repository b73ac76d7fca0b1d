//! Pagination and sorting shared by every list operation.
//!
//! Callers hand over whatever the client sent in a [`PageParams`]; it is
//! normalized into a [`PageRequest`] against the entity's orderable columns
//! before reaching a repository.

use sea_orm::Order;

pub const DEFAULT_LIMIT: u64 = 30;
pub const DEFAULT_ORDER_BY: &str = "id";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `ASC`/`DESC` (case-insensitive) falls back to `DESC`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

impl From<SortDirection> for Order {
    fn from(value: SortDirection) -> Self {
        match value {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Raw pagination parameters as received from a client.
#[derive(Clone, Debug, Default)]
pub struct PageParams {
    pub start: i64,
    pub limit: i64,
    pub order_by: String,
    pub sort: String,
}

/// Sanitized pagination handed to repositories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
    pub order_by: &'static str,
    pub direction: SortDirection,
}

impl PageParams {
    pub fn normalize(&self, orderable: &'static [&'static str]) -> PageRequest {
        let offset = u64::try_from(self.start).unwrap_or(0);
        let limit = match u64::try_from(self.limit) {
            Ok(limit) if limit > 0 => limit,
            _ => DEFAULT_LIMIT,
        };
        let wanted = self.order_by.trim().to_ascii_lowercase();
        let order_by = orderable
            .iter()
            .copied()
            .find(|column| *column == wanted)
            .unwrap_or(DEFAULT_ORDER_BY);

        PageRequest {
            offset,
            limit,
            order_by,
            direction: SortDirection::parse(&self.sort),
        }
    }
}

/// One page of results plus the number of rows matching the filters.
#[derive(Clone, Debug, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub count: u64,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}
