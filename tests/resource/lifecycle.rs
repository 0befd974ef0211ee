use std::{sync::Arc, thread};

use sparse_bridge::{
    content::{Content, InMemoryRepository},
    resource::{CallerIdentity, ResourceProvider, SparseResourceProvider},
};

use crate::{Failure, ScriptedRepository};

fn resolve_with(repository: ScriptedRepository, path: &str) -> (Arc<ScriptedRepository>, bool) {
    let repository = Arc::new(repository);
    let provider = SparseResourceProvider::new(repository.clone(), Vec::new());
    let resolved = provider
        .resolve(&CallerIdentity::new("alice"), path)
        .is_some();
    (repository, resolved)
}

#[test]
fn session_is_released_once_on_every_exit_path() {
    let cases = [
        ("found", ScriptedRepository::default().with_content(Content::new("/test/a"))),
        ("not found", ScriptedRepository::default()),
        (
            "storage failure",
            ScriptedRepository::default().failing_get(Failure::Storage),
        ),
        (
            "access denied",
            ScriptedRepository::default().failing_get(Failure::AccessDenied),
        ),
    ];

    for (label, repository) in cases {
        let (repository, _) = resolve_with(repository, "/test/a");
        assert_eq!(repository.count("login:"), 1, "{label}: one login");
        assert_eq!(repository.count("logout:"), 1, "{label}: one logout");
        assert_eq!(
            repository.journal().last().map(String::as_str),
            Some("logout:alice"),
            "{label}: logout is the last store call"
        );
    }
}

#[test]
fn failed_login_never_attempts_release() {
    let (repository, resolved) =
        resolve_with(ScriptedRepository::default().failing_login(), "/test/a");

    assert!(!resolved);
    assert_eq!(repository.count("logout:"), 0);
}

#[test]
fn release_failure_does_not_mask_the_result() {
    let (repository, resolved) = resolve_with(
        ScriptedRepository::default()
            .with_content(Content::new("/test/a"))
            .failing_logout(),
        "/test/a",
    );

    assert!(resolved, "entity should still resolve");
    assert_eq!(repository.count("logout:"), 1);
}

#[test]
fn concurrent_resolutions_each_balance_their_sessions() {
    let repository = InMemoryRepository::new();
    repository.insert(Content::new("/test/shared"));
    let provider = Arc::new(SparseResourceProvider::new(
        Arc::new(repository.clone()),
        Vec::new(),
    ));

    let workers: Vec<_> = (0..8)
        .map(|index| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || {
                let caller = CallerIdentity::new(format!("user-{index}"));
                (0..25)
                    .filter(|_| provider.resolve(&caller, "/test/shared").is_some())
                    .count()
            })
        })
        .collect();

    let resolved: usize = workers
        .into_iter()
        .map(|worker| worker.join().expect("worker should finish"))
        .sum();

    assert_eq!(resolved, 200);
    let stats = repository.session_stats();
    assert_eq!(stats.opened, 200);
    assert_eq!(stats.released, 200);
    assert_eq!(stats.open_sessions(), 0);
}

#[test]
fn unavailable_store_resolves_nothing_and_opens_nothing() {
    let repository = InMemoryRepository::new();
    repository.insert(Content::new("/test/a"));
    repository.set_available(false);
    let provider = SparseResourceProvider::new(Arc::new(repository.clone()), Vec::new());

    assert!(provider.resolve(&CallerIdentity::new("alice"), "/test/a").is_none());
    assert_eq!(repository.session_stats().opened, 0);
}
