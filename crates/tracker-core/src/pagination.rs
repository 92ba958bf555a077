use crate::error::Result;

/// Largest page size the supported trackers accept
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Collect every page of a resource.
///
/// `fetch_page` receives a 1-based page number and the page size. The first
/// page shorter than `page_size` (an empty one included) is the last one.
/// Any error aborts the whole fetch.
pub fn fetch_all_pages<T, F>(mut fetch_page: F, page_size: usize) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    let mut items = Vec::new();

    for page in 1.. {
        let batch = fetch_page(page, page_size)?;
        let last = batch.is_empty() || batch.len() < page_size;
        items.extend(batch);
        if last {
            break;
        }
    }

    Ok(items)
}
