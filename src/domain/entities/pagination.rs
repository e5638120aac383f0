use serde::{Deserialize, Serialize};

pub const PUBLIC_PER_PAGE: u32 = 12;
pub const ADMIN_PER_PAGE: u32 = 15;

/// `?page=` as sent by list pages. Anything unparsable falls back to page 1.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        PageRequest {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// The first `limit` rows, for "latest N" style queries.
    pub fn first(limit: u32) -> Self {
        PageRequest::new(1, limit)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * (self.per_page as i64)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        let per_page = request.per_page as i64;
        let last_page = ((total + per_page - 1) / per_page).max(1) as u32;
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + data.len() as i64 - 1))
        };

        Paginated {
            data,
            current_page: request.page,
            last_page,
            per_page: request.per_page,
            total,
            from,
            to,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
            from: self.from,
            to: self.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 15).offset(), 0);
        assert_eq!(PageRequest::new(3, 12).offset(), 24);
        assert_eq!(PageRequest::new(0, 12).page, 1);
    }

    #[test]
    fn metadata_for_a_middle_page() {
        let page = Paginated::new(vec![1; 12], 30, PageRequest::new(2, 12));
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, Some(13));
        assert_eq!(page.to, Some(24));
    }

    #[test]
    fn empty_result_has_one_page_and_no_range() {
        let page: Paginated<i32> = Paginated::new(vec![], 0, PageRequest::new(1, 15));
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
    }

    #[test]
    fn garbage_page_query_falls_back_to_first_page() {
        let query = PageQuery { page: Some("abc".into()) };
        assert_eq!(query.page(), 1);
        let query = PageQuery { page: Some("4".into()) };
        assert_eq!(query.page(), 4);
    }
}
