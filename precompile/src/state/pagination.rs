use bridge_common::{
    config::DEFAULT_PAGE_LIMIT,
    pagination::{PageRequest, PageResponse},
};

use super::{Direction, KvStore, StateError};

pub fn strip_prefix<'k>(key: &'k [u8], prefix: &[u8]) -> &'k [u8] {
    key.strip_prefix(prefix).unwrap_or(key)
}

/// Page over every entry under `prefix`.
///
/// `accept` turns a (key suffix, value) pair into an item, or `None` to
/// filter it out. Cursors are key suffixes: the returned `next_key` is the
/// suffix of the first accepted entry past the page, and a request key
/// resumes from that entry. The offset only applies without a key.
pub fn paginate<T, E, F>(
    store: &dyn KvStore,
    prefix: &[u8],
    page: &PageRequest,
    mut accept: F,
) -> Result<(Vec<T>, PageResponse), E>
where
    E: From<StateError>,
    F: FnMut(&[u8], &[u8]) -> Result<Option<T>, E>,
{
    let direction = if page.reverse {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    let limit = if page.limit == 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        page.limit
    };

    let entries = store.iter_prefix(prefix, direction)?;

    let mut items = Vec::new();
    let mut next_key = Vec::new();
    let mut total = 0u64;
    let mut skipped = 0u64;

    for (key, value) in entries.iter() {
        let suffix = strip_prefix(key, prefix);
        let before_start = !page.key.is_empty()
            && match direction {
                Direction::Forward => suffix < page.key.as_slice(),
                Direction::Reverse => suffix > page.key.as_slice(),
            };
        let page_full = !next_key.is_empty();

        // Without a total to report we can stop early
        if !page.count_total {
            if page_full {
                break;
            }
            if before_start {
                continue;
            }
        }

        let Some(item) = accept(suffix, value)? else {
            continue;
        };
        total += 1;

        if before_start || page_full {
            continue;
        }
        if page.key.is_empty() && skipped < page.offset {
            skipped += 1;
            continue;
        }

        if (items.len() as u64) < limit {
            items.push(item);
        } else {
            next_key = suffix.to_vec();
        }
    }

    let response = PageResponse {
        next_key,
        total: if page.count_total { total } else { 0 },
    };
    Ok((items, response))
}
