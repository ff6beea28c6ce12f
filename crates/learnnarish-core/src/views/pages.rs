use std::collections::HashMap;

use crate::collation::sort_by_ascending_key;
use crate::models::Page;

/// Pages that have a display order, in that order.
pub fn ordered_pages(pages: &[Page]) -> Vec<Page> {
    let mut ordered: Vec<Page> = pages
        .iter()
        .filter(|page| page.display_order.is_some())
        .cloned()
        .collect();
    sort_by_ascending_key(&mut ordered, |page| page.display_order);
    ordered
}

/// Link to page. A page without a link is keyed by the empty string (the
/// site root); when links collide the later page wins.
pub fn link_map(pages: &[Page]) -> HashMap<String, Page> {
    pages
        .iter()
        .map(|page| (page.link.clone().unwrap_or_default(), page.clone()))
        .collect()
}
