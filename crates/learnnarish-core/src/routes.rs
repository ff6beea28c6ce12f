//! Resolve a site path to what should be shown there.
//!
//! Static routes come from page links; `dictionary`, `dictionary/word/<id>`
//! and `lesson/<number>` are built in and replace any page routes of the
//! same name. A path that goes deeper than the tree falls back to the
//! deepest matching node that has a target of its own.

use std::collections::{BTreeMap, HashMap};

use crate::models::Page;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Page(Page),
    Dictionary,
    Word(i64),
    Lesson(i64),
    NotFound(Vec<String>),
}

#[derive(Debug, Clone)]
enum Target {
    Page(Page),
    Dictionary,
    Word,
    Lesson,
}

#[derive(Debug, Clone, Default)]
struct RouteNode {
    target: Option<Target>,
    children: BTreeMap<String, RouteNode>,
}

impl RouteNode {
    fn with_target(target: Target) -> Self {
        Self {
            target: Some(target),
            children: BTreeMap::new(),
        }
    }

    fn child(mut self, segment: &str, node: RouteNode) -> Self {
        self.children.insert(segment.to_string(), node);
        self
    }
}

fn build_routes(link_map: &HashMap<String, Page>) -> BTreeMap<String, RouteNode> {
    let mut root = BTreeMap::new();
    for (link, page) in link_map {
        let mut segments = link.split('/');
        let Some(first) = segments.next() else {
            continue;
        };
        let mut node: &mut RouteNode = root.entry(first.to_string()).or_default();
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.target = Some(Target::Page(page.clone()));
    }

    root.insert(
        "dictionary".to_string(),
        RouteNode::with_target(Target::Dictionary).child(
            "word",
            RouteNode::default().child(WILDCARD, RouteNode::with_target(Target::Word)),
        ),
    );
    root.insert(
        "lesson".to_string(),
        RouteNode::default().child(WILDCARD, RouteNode::with_target(Target::Lesson)),
    );
    root
}

/// `None` when nothing at this level matches `path`'s first segment.
fn match_path(nodes: &BTreeMap<String, RouteNode>, path: &[&str], full: &[&str]) -> Option<Route> {
    let Some((head, tail)) = path.split_first() else {
        return Some(not_found(full));
    };
    let node = nodes.get(*head).or_else(|| nodes.get(WILDCARD))?;

    if !tail.is_empty() {
        if let Some(route) = match_path(&node.children, tail, full) {
            return Some(route);
        }
    }

    let route = match &node.target {
        Some(Target::Page(page)) => Route::Page(page.clone()),
        Some(Target::Dictionary) => Route::Dictionary,
        Some(Target::Word) => head.parse().map(Route::Word).unwrap_or_else(|_| not_found(full)),
        Some(Target::Lesson) => head.parse().map(Route::Lesson).unwrap_or_else(|_| not_found(full)),
        None => not_found(full),
    };
    Some(route)
}

fn not_found(path: &[&str]) -> Route {
    Route::NotFound(path.iter().map(|s| s.to_string()).collect())
}

/// Resolve a URL path such as `/dictionary/word/12`. The site root `/` maps
/// to the page whose link is empty.
pub fn resolve(path: &str, link_map: &HashMap<String, Page>) -> Route {
    let path = path.strip_prefix('/').unwrap_or(path);
    let segments: Vec<&str> = path.split('/').collect();
    let routes = build_routes(link_map);
    match_path(&routes, &segments, &segments).unwrap_or_else(|| not_found(&segments))
}
