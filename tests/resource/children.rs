use std::sync::Arc;

use sparse_bridge::{
    content::{Content, InMemoryRepository},
    resource::{CallerIdentity, ResourceProvider, SparseResourceProvider},
};

#[test]
fn list_children_is_empty_even_when_descendants_exist() {
    let repository = InMemoryRepository::new();
    repository.insert(Content::new("/test/site"));
    repository.insert(Content::new("/test/site/page-1"));
    repository.insert(Content::new("/test/site/page-2"));
    let provider = SparseResourceProvider::new(Arc::new(repository), Vec::new());

    let parent = provider
        .resolve(&CallerIdentity::new("alice"), "/test/site")
        .expect("parent should resolve");
    let children = provider.list_children(&parent);

    assert_eq!(children.len(), 0);
    assert_eq!(children.clone().count(), 0);
    assert_eq!(children.count(), 0, "restarting yields the same empty sequence");
}

#[test]
fn list_children_is_terminal() {
    let repository = InMemoryRepository::new();
    repository.insert(Content::new("/test/a"));
    let provider = SparseResourceProvider::new(Arc::new(repository), Vec::new());
    let parent = provider
        .resolve(&CallerIdentity::new("alice"), "/test/a")
        .expect("parent should resolve");

    let mut children = provider.list_children(&parent);
    assert!(children.next().is_none());
    assert!(children.next().is_none());
}
