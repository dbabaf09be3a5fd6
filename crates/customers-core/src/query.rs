//! Score-ranked fuzzy search and pagination over the customer collection.
//!
//! All filtering and ranking of customers lives here. The engine is pure:
//! it reads a slice and returns owned snapshots.

use std::cmp::Ordering;

use crate::customer::Customer;

/// Ranks `customers` against `query` and returns the page
/// `[start, start + count)`.
///
/// An empty query returns every customer ordered by last name. A non-empty
/// query keeps only customers with a positive [`match_score`], best first.
/// Both orderings are stable, so ties keep their collection order.
pub fn get_items(customers: &[Customer], start: usize, count: usize, query: &str) -> Vec<Customer> {
    rank(customers, query)
        .into_iter()
        .skip(start)
        .take(count)
        .cloned()
        .collect()
}

/// Orders (and for non-empty queries, filters) `customers` without paging.
pub fn rank<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    if query.is_empty() {
        let mut sorted: Vec<&Customer> = customers.iter().collect();
        sorted.sort_by(|a, b| compare_last_names(&a.last_name, &b.last_name));
        return sorted;
    }

    let query = query.to_lowercase();
    let mut scored: Vec<(usize, &Customer)> = customers
        .iter()
        .map(|customer| (match_score(customer, &query), customer))
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by is stable: equal scores stay in collection order
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, customer)| customer).collect()
}

/// Sum of the per-field scores over the full name, email and company.
///
/// `query` must already be lowercase.
pub fn match_score(customer: &Customer, query: &str) -> usize {
    let full_name = format!("{} {}", customer.first_name, customer.last_name);
    [full_name.as_str(), customer.email.as_str(), customer.company.as_str()]
        .into_iter()
        .map(|field| field_score(field, query))
        .sum()
}

/// Scores a single field against a lowercase query.
///
/// - `0` when the field is empty or does not contain the query
/// - `len + 2` on an exact match
/// - `len + 1` when the field starts with the query
/// - `len` when the query appears elsewhere
fn field_score(field: &str, query: &str) -> usize {
    if field.is_empty() {
        return 0;
    }

    let field = field.to_lowercase();
    if !field.contains(query) {
        return 0;
    }

    let base = query.chars().count();
    if field == query {
        base + 2
    } else if field.starts_with(query) {
        base + 1
    } else {
        base
    }
}

fn compare_last_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
