use serde::{Deserialize, Serialize};

/// A page of results, whatever shape the upstream answered with
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> Paginated<T> {
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            results: self.results.into_iter().map(mapper).collect(),
            count: self.count,
            next: self.next,
            previous: self.previous,
        }
    }
}

/// Some list endpoints paginate, some return a plain array
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Envelope {
        results: Vec<T>,
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
    Bare(Vec<T>),
}

impl<T> From<ListResponse<T>> for Paginated<T> {
    fn from(response: ListResponse<T>) -> Self {
        match response {
            ListResponse::Envelope {
                results,
                count,
                next,
                previous,
            } => Paginated {
                count: count.unwrap_or(results.len()),
                results,
                next,
                previous,
            },
            ListResponse::Bare(results) => Paginated {
                count: results.len(),
                results,
                next: None,
                previous: None,
            },
        }
    }
}
